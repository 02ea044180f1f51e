//! Builders for the OpenAI-shaped reply objects.
//!
//! The `model` field always carries the public alias, never the canonical
//! backend id. The backend reports no token usage, so completions carry an
//! all-zero `usage` block.

use chrono::Utc;
use uuid::Uuid;

use crate::backend::BackendReply;
use crate::errors::AppError;
use crate::openai::{
    AssistantMessage, ChatCompletion, ChatCompletionChunk, Choice, ChunkChoice, Delta, Usage,
};

pub fn new_completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4().simple())
}

/// Build the non-streaming completion from a single 200 reply.
///
/// A reply that passed the retry loop but lacks the nested message field is
/// permanently malformed, not transient — it surfaces immediately instead of
/// being retried.
pub fn completion(alias: &str, reply: &BackendReply) -> Result<ChatCompletion, AppError> {
    let text = reply.message_text().ok_or(AppError::MalformedReply)?;

    Ok(ChatCompletion {
        id: new_completion_id(),
        object: "chat.completion",
        created: Utc::now().timestamp(),
        model: alias.to_string(),
        usage: Usage::default(),
        choices: vec![Choice {
            index: 0,
            message: AssistantMessage {
                role: "assistant",
                content: text.to_string(),
            },
        }],
    })
}

/// Build one streaming delta chunk. `id` and `created` are fixed per stream
/// so every chunk of a response carries the same identity.
pub fn completion_chunk(id: &str, created: i64, alias: &str, text: &str) -> ChatCompletionChunk {
    ChatCompletionChunk {
        id: id.to_string(),
        object: "chat.completion.chunk",
        created,
        model: alias.to_string(),
        choices: vec![ChunkChoice {
            index: 0,
            delta: Delta {
                content: text.to_string(),
            },
            finish_reason: None,
        }],
    }
}
