use std::error::Error;
use std::fmt::{Display, Formatter};

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One content block of a chat message.
///
/// `ToolUse` is the model requesting a capability invocation; `ToolResult`
/// carries the dispatched outcome back on the next user message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePart {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
    ToolResult { id: String, content: Value, is_error: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// All non-empty text parts, trimmed and newline-joined.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() { None } else { Some(trimmed) }
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_tool_uses(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, MessagePart::ToolUse { .. }))
    }
}

/// A capability offered to the model, with its JSON schema for arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub message: ChatMessage,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    MissingApiKey,
    HttpStatus { status: u16, body: String },
    Transport(String),
    Parse(String),
    EmptyResponse,
}

impl Display for LlmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing ANTHROPIC_API_KEY"),
            Self::HttpStatus { status, body } => {
                write!(f, "provider request failed with status {status}: {body}")
            }
            Self::Transport(msg) => write!(f, "provider transport error: {msg}"),
            Self::Parse(msg) => write!(f, "provider parse error: {msg}"),
            Self::EmptyResponse => write!(f, "provider returned an empty message"),
        }
    }
}

impl Error for LlmError {}

pub type LlmResult<T> = std::result::Result<T, LlmError>;

pub trait LlmProvider {
    fn generate(
        &self,
        request: ProviderRequest,
    ) -> impl std::future::Future<Output = LlmResult<ProviderResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, MessagePart};
    use serde_json::json;

    #[test]
    fn joined_text_skips_blank_and_non_text_parts() {
        let message = ChatMessage {
            role: super::ChatRole::Assistant,
            parts: vec![
                MessagePart::Text {
                    text: "  first  ".to_string(),
                },
                MessagePart::Text {
                    text: "   ".to_string(),
                },
                MessagePart::ToolUse {
                    id: "t1".to_string(),
                    name: "search_listings".to_string(),
                    input: json!({}),
                },
                MessagePart::Text {
                    text: "second".to_string(),
                },
            ],
        };

        assert_eq!(message.joined_text(), "first\nsecond");
        assert!(message.has_tool_uses());
    }

    #[test]
    fn user_text_builds_a_single_part_message() {
        let message = ChatMessage::user_text("hello");
        assert_eq!(message.joined_text(), "hello");
        assert!(!message.has_tool_uses());
    }
}
