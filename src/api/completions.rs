use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::errors::AppError;
use crate::openai::ChatCompletionRequest;
use crate::proxy::stream::{sse_body, StreamTranslator};
use crate::proxy::{alias, normalize, retry, selector, translate};
use crate::AppState;

/// `POST {prefix}/v1/chat/completions`.
///
/// The request's model name is resolved to its canonical backend id for the
/// call and restored to the public alias in everything sent back.
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatCompletionRequest>,
) -> Result<Response, AppError> {
    let canonical = alias::to_canonical(&req.model);
    let normalized = normalize::normalize(&req.messages);
    let routed = selector::route(
        &state.config,
        &canonical,
        &normalized,
        req.temperature,
        req.top_p,
    )?;
    let public_model = alias::to_alias(&canonical);

    debug!(
        model = %canonical,
        family = %routed.family,
        stream = req.stream,
        "dispatching chat completion",
    );

    if req.stream {
        let replies =
            retry::open_stream_with_retry(state.backend.as_ref(), state.config.retry, &routed)
                .await?;
        let translator = StreamTranslator::new(public_model);

        Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .body(sse_body(replies, translator))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("response build failed: {e}")))
    } else {
        let reply =
            retry::predict_with_retry(state.backend.as_ref(), state.config.retry, &routed).await?;
        let completion = translate::completion(&public_model, &reply)?;
        Ok(Json(completion).into_response())
    }
}
