use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use subtle::ConstantTimeEq;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::AppState;

pub mod completions;
pub mod models;

/// Build the application router. The `/v1` endpoints sit under the
/// configured prefix; auth wraps every route (CORS is layered outside it so
/// preflights pass through).
pub fn router(state: Arc<AppState>) -> Router {
    let prefix = state.config.api_prefix.clone();

    Router::new()
        .route("/", get(banner))
        .route("/ping", get(ping))
        .route(&format!("{prefix}/v1/models"), get(models::list_models))
        .route(
            &format!("{prefix}/v1/chat/completions"),
            post(completions::chat_completions),
        )
        .fallback(not_found)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, bearer_auth))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn banner() -> Json<serde_json::Value> {
    Json(json!({ "message": "pieces-gateway is running" }))
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

async fn not_found(uri: Uri) -> Response {
    let body = Json(json!({
        "error": {
            "message": format!("unknown route: {}", uri.path()),
            "type": "invalid_request_error",
            "param": null,
            "code": "not_found",
        }
    }));
    (StatusCode::NOT_FOUND, body).into_response()
}

/// Middleware: validates `Authorization: Bearer <key>` against the
/// configured shared secret. A missing or malformed header is 401, a wrong
/// key is 403. With no key configured the gateway is open.
async fn bearer_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AppError::MissingAuth)?;

    // Constant-time compare; unequal lengths short-circuit to false inside
    // ct_eq without branching on content.
    if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::InvalidApiKey)
    }
}
