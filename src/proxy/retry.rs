//! Bounded retry over the backend call.
//!
//! Policy: a fixed number of sequential attempts with a fixed inter-attempt
//! delay. No backoff, no jitter. Every failed attempt is followed by the
//! delay, including the last one, after which the terminal failure
//! surfaces — so exhaustion costs `max_attempts` calls and `max_attempts`
//! delays.
//!
//! For streaming calls the retry window closes at the first delivered
//! chunk: a stream that fails before its first chunk (transport error,
//! early close, or an error response code) is a failed attempt; a stream
//! that has started delivering is never retried, so the client can never
//! receive duplicated or partial-then-restarted output.

use std::time::Duration;

use futures::{stream, StreamExt};
use tracing::{debug, warn};

use crate::backend::{BackendReply, InferenceBackend, ReplyStream};
use crate::errors::AppError;
use crate::proxy::selector::RoutedRequest;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(5000),
        }
    }
}

/// Execute a unary call under the retry policy. Success is a reply with
/// response code 200; anything else (transport failure included) burns an
/// attempt.
pub async fn predict_with_retry(
    backend: &dyn InferenceBackend,
    policy: RetryPolicy,
    routed: &RoutedRequest,
) -> Result<BackendReply, AppError> {
    for attempt in 1..=policy.max_attempts {
        match backend.predict(routed).await {
            Ok(reply) if reply.response_code() == 200 => {
                if attempt > 1 {
                    debug!(attempt, "backend call succeeded after retry");
                }
                return Ok(reply);
            }
            Ok(reply) => warn!(
                attempt,
                max = policy.max_attempts,
                code = reply.response_code(),
                endpoint = %routed.endpoint,
                "backend replied with unexpected response code, retrying in {:?}",
                policy.delay,
            ),
            Err(e) => warn!(
                attempt,
                max = policy.max_attempts,
                endpoint = %routed.endpoint,
                "backend call failed: {e}, retrying in {:?}",
                policy.delay,
            ),
        }
        tokio::time::sleep(policy.delay).await;
    }

    Err(AppError::RetryExhausted)
}

/// Open a streaming call under the retry policy.
///
/// Each attempt opens the stream and inspects the first item. A first item
/// with code 200 or 204 means the stream has begun: it is stitched back in
/// front of the remainder and returned, and no further retry can happen.
pub async fn open_stream_with_retry(
    backend: &dyn InferenceBackend,
    policy: RetryPolicy,
    routed: &RoutedRequest,
) -> Result<ReplyStream, AppError> {
    for attempt in 1..=policy.max_attempts {
        match backend.predict_with_stream(routed).await {
            Ok(mut replies) => match replies.next().await {
                Some(Ok(first)) if matches!(first.response_code(), 200 | 204) => {
                    if attempt > 1 {
                        debug!(attempt, "backend stream opened after retry");
                    }
                    return Ok(Box::pin(stream::iter([Ok(first)]).chain(replies)));
                }
                Some(Ok(first)) => warn!(
                    attempt,
                    max = policy.max_attempts,
                    code = first.response_code(),
                    endpoint = %routed.endpoint,
                    "stream opened with an error code, retrying in {:?}",
                    policy.delay,
                ),
                Some(Err(e)) => warn!(
                    attempt,
                    max = policy.max_attempts,
                    endpoint = %routed.endpoint,
                    "stream failed before the first chunk: {e}, retrying in {:?}",
                    policy.delay,
                ),
                None => warn!(
                    attempt,
                    max = policy.max_attempts,
                    endpoint = %routed.endpoint,
                    "stream closed before the first chunk, retrying in {:?}",
                    policy.delay,
                ),
            },
            Err(e) => warn!(
                attempt,
                max = policy.max_attempts,
                endpoint = %routed.endpoint,
                "failed to open backend stream: {e}, retrying in {:?}",
                policy.delay,
            ),
        }
        tokio::time::sleep(policy.delay).await;
    }

    Err(AppError::RetryExhausted)
}
