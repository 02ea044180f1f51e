//! Backend selection: decide the service family from the canonical model id
//! and build the family-specific request payload.

use std::fmt;

use crate::backend::proto;
use crate::config::Config;
use crate::errors::AppError;
use crate::proxy::normalize::NormalizedRequest;

const DEFAULT_TEMPERATURE: f64 = 0.1;
const DEFAULT_TOP_P: f64 = 1.0;

/// Wire codes for the GPT-family message roles.
const ROLE_RULES: i32 = 0;
const ROLE_CONTENT: i32 = 1;

/// Which of the two inference services handles a model. Computed once here
/// and carried alongside the payload so nothing downstream repeats the
/// string test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFamily {
    Gpt,
    Vertex,
}

impl BackendFamily {
    pub fn of(canonical: &str) -> Self {
        if canonical.contains("gpt") {
            Self::Gpt
        } else {
            Self::Vertex
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gpt => "gpt",
            Self::Vertex => "vertex",
        })
    }
}

/// Family-tagged request payload.
#[derive(Debug, Clone)]
pub enum BackendRequest {
    Gpt(proto::GptRequest),
    Vertex(proto::VertexRequest),
}

/// A fully-routed backend call: the family, the host it goes to, and the
/// payload to send.
#[derive(Debug, Clone)]
pub struct RoutedRequest {
    pub family: BackendFamily,
    pub endpoint: String,
    pub request: BackendRequest,
}

/// Build the backend request for a canonical model id.
///
/// The only rejection is an empty model id; every other model name routes
/// somewhere (unknown names fall through to the Vertex service, which is
/// the one that reports unsupported models).
pub fn route(
    config: &Config,
    canonical: &str,
    normalized: &NormalizedRequest,
    temperature: Option<f64>,
    top_p: Option<f64>,
) -> Result<RoutedRequest, AppError> {
    if canonical.trim().is_empty() {
        return Err(AppError::InvalidRequest {
            message: "you must provide a model parameter".into(),
            param: Some("model".into()),
        });
    }

    let family = BackendFamily::of(canonical);
    let routed = match family {
        BackendFamily::Gpt => RoutedRequest {
            family,
            endpoint: config.gpt_grpc.clone(),
            request: BackendRequest::Gpt(proto::GptRequest {
                models: canonical.to_string(),
                messages: vec![
                    proto::GptMessage {
                        role: ROLE_RULES,
                        message: normalized.rules.clone(),
                    },
                    proto::GptMessage {
                        role: ROLE_CONTENT,
                        message: normalized.content.clone(),
                    },
                ],
                temperature: temperature.unwrap_or(DEFAULT_TEMPERATURE),
                top_p: top_p.unwrap_or(DEFAULT_TOP_P),
            }),
        },
        BackendFamily::Vertex => RoutedRequest {
            family,
            endpoint: config.common_grpc.clone(),
            request: BackendRequest::Vertex(proto::VertexRequest {
                models: canonical.to_string(),
                args: Some(proto::VertexArgs {
                    messages: Some(proto::VertexMessages {
                        unknown: 1,
                        message: normalized.content.clone(),
                    }),
                    rules: normalized.rules.clone(),
                }),
            }),
        },
    };

    Ok(routed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::retry::RetryPolicy;

    fn test_config() -> Config {
        Config {
            api_prefix: String::new(),
            api_key: None,
            retry: RetryPolicy::default(),
            gpt_grpc: "gpt.example.com".into(),
            common_grpc: "vertex.example.com".into(),
            port: 8787,
        }
    }

    fn normalized() -> NormalizedRequest {
        NormalizedRequest {
            rules: "system:You are helpful;\r\n".into(),
            content: "user:Hi;\r\n".into(),
        }
    }

    #[test]
    fn family_dispatch_is_a_substring_test() {
        assert_eq!(BackendFamily::of("gpt-4o"), BackendFamily::Gpt);
        assert_eq!(BackendFamily::of("gpt-3.5-turbo"), BackendFamily::Gpt);
        assert_eq!(
            BackendFamily::of("claude-3-5-sonnet-20240620"),
            BackendFamily::Vertex
        );
        assert_eq!(BackendFamily::of("gemini-1.5-pro"), BackendFamily::Vertex);
        assert_eq!(BackendFamily::of("chat-bison"), BackendFamily::Vertex);
    }

    #[test]
    fn gpt_payload_carries_role_coded_messages_and_defaults() {
        let routed = route(&test_config(), "gpt-4o", &normalized(), None, None).unwrap();

        assert_eq!(routed.family, BackendFamily::Gpt);
        assert_eq!(routed.endpoint, "gpt.example.com");
        let BackendRequest::Gpt(req) = routed.request else {
            panic!("expected a GPT payload");
        };
        assert_eq!(req.models, "gpt-4o");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, 0);
        assert_eq!(req.messages[0].message, "system:You are helpful;\r\n");
        assert_eq!(req.messages[1].role, 1);
        assert_eq!(req.messages[1].message, "user:Hi;\r\n");
        assert_eq!(req.temperature, 0.1);
        assert_eq!(req.top_p, 1.0);
    }

    #[test]
    fn explicit_zero_sampling_params_are_respected() {
        let routed = route(
            &test_config(),
            "gpt-4o",
            &normalized(),
            Some(0.0),
            Some(0.5),
        )
        .unwrap();
        let BackendRequest::Gpt(req) = routed.request else {
            panic!("expected a GPT payload");
        };
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.top_p, 0.5);
    }

    #[test]
    fn vertex_payload_nests_messages_and_rules() {
        let routed = route(
            &test_config(),
            "claude-3-5-sonnet-20240620",
            &normalized(),
            None,
            None,
        )
        .unwrap();

        assert_eq!(routed.family, BackendFamily::Vertex);
        assert_eq!(routed.endpoint, "vertex.example.com");
        let BackendRequest::Vertex(req) = routed.request else {
            panic!("expected a Vertex payload");
        };
        assert_eq!(req.models, "claude-3-5-sonnet-20240620");
        let args = req.args.unwrap();
        assert_eq!(args.rules, "system:You are helpful;\r\n");
        let messages = args.messages.unwrap();
        assert_eq!(messages.unknown, 1);
        assert_eq!(messages.message, "user:Hi;\r\n");
    }

    #[test]
    fn empty_model_is_a_validation_error() {
        let err = route(&test_config(), "", &normalized(), None, None).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidRequest { param: Some(p), .. } if p == "model"
        ));
    }
}
