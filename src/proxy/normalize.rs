//! Flattens an OpenAI message list into the two role-grouped strings the
//! backend services consume.

use std::fmt::Write;

use crate::openai::ChatMessage;

/// The backend request carries the conversation as two strings: all system
/// messages (`rules`) and all user/assistant messages (`content`), each as
/// newline-delimited `role:text;` lines in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub rules: String,
    pub content: String,
}

/// Normalize a message list. Messages with a role outside
/// {system, user, assistant} are silently dropped — that mirrors the API
/// contract, which recognizes exactly those three roles. A recognized
/// message with no extractable text still contributes its (empty) line.
pub fn normalize(messages: &[ChatMessage]) -> NormalizedRequest {
    let mut out = NormalizedRequest::default();

    for msg in messages {
        let text = msg.content.flatten();
        match msg.role.as_str() {
            "system" => {
                let _ = write!(out.rules, "system:{text};\r\n");
            }
            role @ ("user" | "assistant") => {
                let _ = write!(out.content, "{role}:{text};\r\n");
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::{ContentPart, MessageContent};

    fn msg(role: &str, text: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }

    #[test]
    fn splits_rules_from_content() {
        let out = normalize(&[msg("system", "You are helpful"), msg("user", "Hi")]);
        assert_eq!(out.rules, "system:You are helpful;\r\n");
        assert_eq!(out.content, "user:Hi;\r\n");
    }

    #[test]
    fn line_counts_match_message_counts_in_order() {
        let out = normalize(&[
            msg("system", "a"),
            msg("user", "b"),
            msg("assistant", "c"),
            msg("system", "d"),
            msg("user", "e"),
        ]);

        assert_eq!(out.rules.matches("system:").count(), 2);
        assert_eq!(out.content.matches(";\r\n").count(), 3);
        // Original order is preserved within each group.
        assert_eq!(out.rules, "system:a;\r\nsystem:d;\r\n");
        assert_eq!(out.content, "user:b;\r\nassistant:c;\r\nuser:e;\r\n");
    }

    #[test]
    fn unrecognized_roles_are_dropped() {
        let out = normalize(&[msg("tool", "ignored"), msg("user", "kept")]);
        assert_eq!(out.rules, "");
        assert_eq!(out.content, "user:kept;\r\n");
    }

    #[test]
    fn part_lists_flatten_without_separator() {
        let out = normalize(&[ChatMessage {
            role: "user".into(),
            content: MessageContent::Parts(vec![
                ContentPart {
                    text: Some("Hel".into()),
                },
                ContentPart { text: None },
                ContentPart {
                    text: Some("lo".into()),
                },
            ]),
        }]);
        assert_eq!(out.content, "user:Hello;\r\n");
    }

    #[test]
    fn textless_message_still_contributes_a_line() {
        let out = normalize(&[ChatMessage {
            role: "user".into(),
            content: MessageContent::Parts(vec![ContentPart { text: None }]),
        }]);
        assert_eq!(out.content, "user:;\r\n");
    }
}
