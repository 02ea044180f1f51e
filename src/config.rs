use std::time::Duration;

use crate::proxy::retry::RetryPolicy;

/// Immutable runtime configuration, loaded once at startup and shared
/// read-only through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Route prefix for the `/v1` endpoints. Empty or `/…` with no trailing
    /// slash after normalization.
    pub api_prefix: String,
    /// Shared-secret bearer token. `None` disables authentication.
    pub api_key: Option<String>,
    pub retry: RetryPolicy,
    /// GPT-family backend host.
    pub gpt_grpc: String,
    /// Vertex-family backend host (`COMMON_GRPC` in the deployment env).
    pub common_grpc: String,
    pub port: u16,
}

const DEFAULT_GPT_GRPC: &str =
    "runtime-native-io-gpt-inference-grpc-service-lmuw6mcn3q-ul.a.run.app";
const DEFAULT_COMMON_GRPC: &str =
    "runtime-native-io-vertex-inference-grpc-service-lmuw6mcn3q-ul.a.run.app";

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    Ok(Config {
        api_prefix: normalize_prefix(
            &std::env::var("API_PREFIX").unwrap_or_default(),
        ),
        api_key: std::env::var("API_KEY").ok().filter(|k| !k.is_empty()),
        retry: RetryPolicy {
            max_attempts: std::env::var("MAX_RETRY_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            delay: Duration::from_millis(
                std::env::var("RETRY_DELAY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5000),
            ),
        },
        gpt_grpc: std::env::var("GPT_GRPC").unwrap_or_else(|_| DEFAULT_GPT_GRPC.into()),
        common_grpc: std::env::var("COMMON_GRPC")
            .unwrap_or_else(|_| DEFAULT_COMMON_GRPC.into()),
        port: std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8787),
    })
}

/// Normalize a configured prefix so route paths concatenate cleanly:
/// `""` and `"/"` become empty, anything else gets a single leading slash
/// and no trailing slash.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_normalization() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
    }
}
