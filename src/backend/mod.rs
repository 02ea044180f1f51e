//! Backend seam: the `InferenceBackend` trait, reply wrappers, and the
//! gRPC client implementation.
//!
//! The rest of the gateway only ever sees [`BackendReply`] and
//! [`InferenceBackend`]; the transport lives behind the trait so the retry
//! loop and stream translator are testable with a scripted backend.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

use crate::proxy::selector::RoutedRequest;

pub mod grpc;
pub mod proto;

/// A server-push stream of backend replies. Dropping it cancels the
/// underlying call.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<BackendReply, BackendError>> + Send>>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend transport failure: {0}")]
    Transport(String),
}

impl From<tonic::Status> for BackendError {
    fn from(status: tonic::Status) -> Self {
        Self::Transport(status.to_string())
    }
}

impl From<tonic::transport::Error> for BackendError {
    fn from(err: tonic::transport::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// One backend reply, unary or a single stream chunk, tagged by family.
#[derive(Debug, Clone)]
pub enum BackendReply {
    Gpt(proto::GptReply),
    Vertex(proto::VertexReply),
}

impl BackendReply {
    /// 200 = data, 204 = end of stream, anything else is an error.
    pub fn response_code(&self) -> i32 {
        match self {
            Self::Gpt(r) => r.response_code,
            Self::Vertex(r) => r.response_code,
        }
    }

    /// Message text at the family-specific nested path. `None` when the
    /// reply does not carry the expected payload.
    pub fn message_text(&self) -> Option<&str> {
        match self {
            Self::Gpt(r) => r
                .body
                .as_ref()?
                .message_wrapper
                .as_ref()?
                .message
                .as_ref()
                .map(|m| m.message.as_str()),
            Self::Vertex(r) => r
                .args
                .as_ref()?
                .args
                .as_ref()?
                .args
                .as_ref()
                .map(|a| a.message.as_str()),
        }
    }
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn predict(&self, routed: &RoutedRequest) -> Result<BackendReply, BackendError>;

    async fn predict_with_stream(
        &self,
        routed: &RoutedRequest,
    ) -> Result<ReplyStream, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpt_reply(code: i32, text: Option<&str>) -> BackendReply {
        BackendReply::Gpt(proto::GptReply {
            response_code: code,
            body: text.map(|t| proto::GptReplyBody {
                message_wrapper: Some(proto::GptMessageWrapper {
                    message: Some(proto::GptInnerMessage {
                        message: t.to_string(),
                    }),
                }),
            }),
        })
    }

    fn vertex_reply(code: i32, text: Option<&str>) -> BackendReply {
        BackendReply::Vertex(proto::VertexReply {
            response_code: code,
            args: text.map(|t| proto::VertexReplyArgs {
                args: Some(proto::VertexReplyInner {
                    args: Some(proto::VertexReplyMessage {
                        message: t.to_string(),
                    }),
                }),
            }),
        })
    }

    #[test]
    fn message_text_follows_gpt_path() {
        assert_eq!(gpt_reply(200, Some("Hello!")).message_text(), Some("Hello!"));
        assert_eq!(gpt_reply(200, None).message_text(), None);
    }

    #[test]
    fn message_text_follows_vertex_path() {
        assert_eq!(vertex_reply(200, Some("Hi")).message_text(), Some("Hi"));
        assert_eq!(vertex_reply(200, None).message_text(), None);
    }

    #[test]
    fn partially_populated_reply_yields_none() {
        // Wrapper present but inner message missing.
        let reply = BackendReply::Gpt(proto::GptReply {
            response_code: 200,
            body: Some(proto::GptReplyBody {
                message_wrapper: Some(proto::GptMessageWrapper { message: None }),
            }),
        });
        assert_eq!(reply.message_text(), None);
    }
}
