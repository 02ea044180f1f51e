use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidRequest {
        message: String,
        param: Option<String>,
    },

    #[error("Unauthorized: Missing or invalid Authorization header")]
    MissingAuth,

    #[error("Forbidden: Invalid API key")]
    InvalidApiKey,

    #[error("Maximum retry count reached")]
    RetryExhausted,

    #[error("upstream reply did not carry a message payload")]
    MalformedReply,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, param, msg) = match &self {
            AppError::InvalidRequest { message, param } => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_request",
                param.clone(),
                message.clone(),
            ),
            AppError::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "missing_authorization",
                None,
                self.to_string(),
            ),
            AppError::InvalidApiKey => (
                StatusCode::FORBIDDEN,
                "permission_error",
                "invalid_api_key",
                None,
                self.to_string(),
            ),
            AppError::RetryExhausted => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "api_error",
                "retry_exhausted",
                None,
                self.to_string(),
            ),
            AppError::MalformedReply => {
                tracing::error!("backend reply missing the expected message field");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "malformed_reply",
                    None,
                    self.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "api_error",
                    "internal_server_error",
                    None,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "param": param,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
