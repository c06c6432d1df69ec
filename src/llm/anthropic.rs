use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::provider::{
    ChatMessage, ChatRole, LlmError, LlmProvider, LlmResult, MessagePart, ProviderRequest,
    ProviderResponse,
};
use crate::http::HttpClient;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4_000;

/// Messages API client. One blocking round-trip per `generate` call; retry
/// and timeout policy belong to the caller.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(
        http: HttpClient,
        api_key: Option<String>,
        model: String,
        base_url: String,
    ) -> LlmResult<Self> {
        let api_key = api_key
            .filter(|value| !value.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, request: &ProviderRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            system: request.system.clone(),
            messages: request.messages.iter().map(wire_message).collect(),
            tools: request
                .tools
                .iter()
                .map(|tool| WireTool {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    input_schema: tool.input_schema.clone(),
                })
                .collect(),
        }
    }

    fn parse_response(body: &str) -> LlmResult<ProviderResponse> {
        let parsed: MessagesResponse =
            serde_json::from_str(body).map_err(|err| LlmError::Parse(err.to_string()))?;

        let mut parts = Vec::new();
        for block in parsed.content {
            match block {
                ResponseBlock::Text { text } => {
                    if !text.trim().is_empty() {
                        parts.push(MessagePart::Text { text });
                    }
                }
                ResponseBlock::ToolUse { id, name, input } => {
                    parts.push(MessagePart::ToolUse { id, name, input });
                }
            }
        }

        if parts.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(ProviderResponse {
            message: ChatMessage {
                role: ChatRole::Assistant,
                parts,
            },
            stop_reason: parsed.stop_reason,
        })
    }
}

impl LlmProvider for AnthropicProvider {
    async fn generate(&self, request: ProviderRequest) -> LlmResult<ProviderResponse> {
        let payload = self.build_request(&request);
        let headers = [
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
        ];

        let response = self
            .http
            .post_json(&self.endpoint(), &headers, &payload)
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        if !(200..300).contains(&response.status) {
            let body = response.body.chars().take(400).collect::<String>();
            return Err(LlmError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Self::parse_response(&response.body)
    }
}

fn wire_message(message: &ChatMessage) -> WireMessage {
    WireMessage {
        role: match message.role {
            ChatRole::User => "user".to_string(),
            ChatRole::Assistant => "assistant".to_string(),
        },
        content: message.parts.iter().map(wire_block).collect(),
    }
}

fn wire_block(part: &MessagePart) -> WireBlock {
    match part {
        MessagePart::Text { text } => WireBlock::Text { text: text.clone() },
        MessagePart::ToolUse { id, name, input } => WireBlock::ToolUse {
            id: id.clone(),
            name: name.clone(),
            input: input.clone(),
        },
        MessagePart::ToolResult {
            id,
            content,
            is_error,
        } => WireBlock::ToolResult {
            tool_use_id: id.clone(),
            content: content.to_string(),
            is_error: *is_error,
        },
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: Vec<WireBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

#[derive(Debug, Serialize)]
struct WireTool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
}
