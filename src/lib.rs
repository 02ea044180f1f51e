//! pieces-gateway — an OpenAI-compatible HTTP front for the Pieces OS
//! inference services.
//!
//! Accepts `/v1/chat/completions` requests, re-expresses them as gRPC calls
//! against the GPT- or Vertex-family service, and translates the reply
//! (unary JSON or an SSE chunk stream) back into the OpenAI wire format.

use std::sync::Arc;

pub mod api;
pub mod backend;
pub mod config;
pub mod errors;
pub mod openai;
pub mod proxy;

use backend::InferenceBackend;
use config::Config;

/// Shared application state: immutable configuration plus the backend
/// client, both read-only across requests.
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn InferenceBackend>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn InferenceBackend>) -> Self {
        Self { config, backend }
    }
}
