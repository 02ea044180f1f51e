//! OpenAI chat-completion wire types.
//!
//! Inbound request shapes are deserialized from the client; outbound
//! completion/chunk shapes are what the gateway serializes back. The backend
//! reports no token usage, so `Usage` is always all-zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Message content is either a plain string or an ordered list of parts.
/// Non-text parts (images etc.) deserialize with `text: None` and are
/// skipped during flattening.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageContent {
    /// Resolve the content to a single string: part texts are concatenated
    /// in order with no separator.
    pub fn flatten(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletion {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub usage: Usage,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub index: u32,
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    /// Always serialized, `null` until the stream ends (the terminal event is
    /// the `[DONE]` sentinel, not a finish_reason).
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Delta {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_with_plain_string_content() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{"model":"gpt-4o","messages":[{"role":"user","content":"Hi"}]}"#,
        )
        .unwrap();

        assert_eq!(req.model, "gpt-4o");
        assert!(!req.stream);
        assert_eq!(req.temperature, None);
        assert_eq!(req.messages[0].content.flatten(), "Hi");
    }

    #[test]
    fn request_with_part_list_content() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{
                "model": "gpt-4o",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Hello"},
                        {"type": "image_url", "image_url": {"url": "https://x/y.png"}},
                        {"type": "text", "text": " world"}
                    ]
                }],
                "stream": true
            }"#,
        )
        .unwrap();

        // Non-text parts contribute nothing; text parts concatenate in order.
        assert_eq!(req.messages[0].content.flatten(), "Hello world");
        assert!(req.stream);
    }

    #[test]
    fn usage_serializes_all_zero() {
        let json = serde_json::to_value(Usage::default()).unwrap();
        assert_eq!(json["prompt_tokens"], 0);
        assert_eq!(json["completion_tokens"], 0);
        assert_eq!(json["total_tokens"], 0);
    }

    #[test]
    fn chunk_serializes_null_finish_reason() {
        let chunk = ChatCompletionChunk {
            id: "chatcmpl-test".into(),
            object: "chat.completion.chunk",
            created: 0,
            model: "gpt-4o".into(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: Delta { content: "Hi".into() },
                finish_reason: None,
            }],
        };

        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["choices"][0]["delta"]["content"], "Hi");
        assert!(json["choices"][0]["finish_reason"].is_null());
    }
}
