use std::time::Duration;

use tokio::time::timeout;

use crate::agent::loop_impl::{AgentAnswer, AgentConfig};
use crate::agent::prompt::{build_direct_prompt, extract_final_answer};
use crate::llm::provider::{ChatMessage, LlmError, LlmProvider, ProviderRequest};
use crate::properties::{Listing, Preferences, render_listings};
use crate::session::{ConversationTurn, render_transcript};

/// Runs one conversational turn in direct mode: the filtered listing table
/// and the transcript are embedded in the prompt and the model is asked once,
/// with no tools declared.
pub async fn run_direct_turn<P: LlmProvider>(
    provider: &P,
    prefs: &Preferences,
    listings: &[Listing],
    history: &[ConversationTurn],
    question: &str,
    config: &AgentConfig,
) -> Result<AgentAnswer, LlmError> {
    let transcript = render_transcript(history);
    let system = build_direct_prompt(prefs, &render_listings(listings), &transcript);
    let request = ProviderRequest {
        system: Some(system),
        messages: vec![ChatMessage::user_text(question)],
        tools: vec![],
    };

    let budget = Duration::from_millis(config.total_timeout_ms);
    match timeout(budget, provider.generate(request)).await {
        Ok(Ok(reply)) => {
            let text = reply.message.joined_text();
            if text.is_empty() {
                return Err(LlmError::EmptyResponse);
            }
            Ok(AgentAnswer {
                text: extract_final_answer(&text).to_string(),
                degraded: false,
            })
        }
        Ok(Err(err)) => Err(err),
        Err(_) => Ok(AgentAnswer {
            text: "The assistant timed out waiting for the model.".to_string(),
            degraded: true,
        }),
    }
}
