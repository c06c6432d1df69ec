use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;

use crate::agent::dispatch::{ToolCallSpec, dispatch_calls, tool_declarations};
use crate::agent::prompt::{build_tool_system_prompt, extract_final_answer};
use crate::llm::provider::{
    ChatMessage, ChatRole, LlmError, LlmProvider, MessagePart, ProviderRequest,
};
use crate::properties::{Preferences, PropertyCapabilities};
use crate::session::{ConversationTurn, TurnRole};

/// Budgets for one tool-mode turn. The spec of the capability core leaves
/// timeout policy to the caller; this is that policy, applied around every
/// provider round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    pub max_steps: usize,
    pub per_step_timeout_ms: u64,
    pub total_timeout_ms: u64,
    pub invalid_reply_retries: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 6,
            per_step_timeout_ms: 30_000,
            total_timeout_ms: 90_000,
            invalid_reply_retries: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAnswer {
    pub text: String,
    /// True when a budget ran out and the answer is a fallback rather than
    /// the model's own conclusion.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    StepStarted { step: usize },
    ToolRequested { step: usize, id: String, name: String, input: Value },
    ToolCompleted { step: usize, id: String, name: String, result: Value },
}

/// Runs one conversational turn in tool mode.
///
/// Each provider reply is a typed decision: tool-use parts are validated and
/// dispatched with the results fed back, plain text ends the turn. Provider
/// failures surface as `Err` without retry; exhausted budgets produce a
/// degraded answer instead.
pub async fn run_tool_turn<P, C, F>(
    provider: &P,
    capabilities: &C,
    prefs: &Preferences,
    history: &[ConversationTurn],
    question: &str,
    config: &AgentConfig,
    on_event: &mut F,
) -> Result<AgentAnswer, LlmError>
where
    P: LlmProvider,
    C: PropertyCapabilities,
    F: FnMut(AgentEvent),
{
    let system = build_tool_system_prompt(prefs);
    let tools = tool_declarations();
    let mut messages = history_messages(history);
    messages.push(ChatMessage::user_text(question));

    let total_deadline = Instant::now() + Duration::from_millis(config.total_timeout_ms);
    let mut invalid_replies = 0usize;

    for step in 1..=config.max_steps {
        on_event(AgentEvent::StepStarted { step });

        let now = Instant::now();
        if now >= total_deadline {
            return Ok(degraded(
                "The assistant ran out of time while working on your request.",
            ));
        }

        let remaining = total_deadline.duration_since(now);
        let per_step = Duration::from_millis(config.per_step_timeout_ms);
        let budget = per_step.min(remaining);

        let reply = match timeout(
            budget,
            provider.generate(ProviderRequest {
                system: Some(system.clone()),
                messages: messages.clone(),
                tools: tools.clone(),
            }),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                return Ok(degraded(
                    "The assistant timed out waiting for the model on this step.",
                ));
            }
        };

        let calls = tool_calls(&reply.message.parts);
        let text = reply.message.joined_text();
        messages.push(reply.message);

        if calls.is_empty() {
            if !text.is_empty() {
                return Ok(AgentAnswer {
                    text: extract_final_answer(&text).to_string(),
                    degraded: false,
                });
            }

            if invalid_replies >= config.invalid_reply_retries {
                return Ok(degraded(
                    "The assistant kept returning empty replies and could not finish the turn.",
                ));
            }
            invalid_replies += 1;
            messages.push(repair_message());
            continue;
        }

        for call in &calls {
            on_event(AgentEvent::ToolRequested {
                step,
                id: call.id.clone(),
                name: call.name.clone(),
                input: call.input.clone(),
            });
        }

        let results = dispatch_calls(capabilities, &calls);
        for (call, part) in calls.iter().zip(&results) {
            if let MessagePart::ToolResult { id, content, .. } = part {
                on_event(AgentEvent::ToolCompleted {
                    step,
                    id: id.clone(),
                    name: call.name.clone(),
                    result: content.clone(),
                });
            }
        }
        messages.push(ChatMessage {
            role: ChatRole::User,
            parts: results,
        });
    }

    let now = Instant::now();
    if now < total_deadline {
        let remaining = total_deadline.duration_since(now);
        let budget = Duration::from_millis(config.per_step_timeout_ms).min(remaining);
        if !budget.is_zero()
            && let Some(text) = finalize_without_tools(provider, &system, &messages, budget).await
        {
            return Ok(AgentAnswer {
                text: extract_final_answer(&text).to_string(),
                degraded: true,
            });
        }
    }

    Ok(degraded(
        "The assistant hit its step limit before finishing the tool flow.",
    ))
}

fn degraded(message: impl Into<String>) -> AgentAnswer {
    AgentAnswer {
        text: message.into(),
        degraded: true,
    }
}

fn repair_message() -> ChatMessage {
    ChatMessage::user_text(
        "Your previous reply was not usable. Either call one of the declared \
tools or answer with non-empty plain text.",
    )
}

fn history_messages(history: &[ConversationTurn]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|turn| match turn.role {
            TurnRole::Human => ChatMessage::user_text(turn.content.as_str()),
            TurnRole::Assistant => ChatMessage::assistant_text(turn.content.as_str()),
        })
        .collect()
}

fn tool_calls(parts: &[MessagePart]) -> Vec<ToolCallSpec> {
    parts
        .iter()
        .filter_map(|part| match part {
            MessagePart::ToolUse { id, name, input } => Some(ToolCallSpec {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            }),
            _ => None,
        })
        .collect()
}

async fn finalize_without_tools<P: LlmProvider>(
    provider: &P,
    system: &str,
    messages: &[ChatMessage],
    budget: Duration,
) -> Option<String> {
    let reply = timeout(
        budget,
        provider.generate(ProviderRequest {
            system: Some(format!(
                "{system}\n\nThe tool phase is over. Do not call tools. Give the \
best concise plain-text answer from the information gathered so far."
            )),
            messages: messages.to_vec(),
            tools: vec![],
        }),
    )
    .await
    .ok()?
    .ok()?;

    let text = reply.message.joined_text();
    if text.is_empty() { None } else { Some(text) }
}
