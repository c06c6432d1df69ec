/// Conversation state for one chat session.
///
/// The history is an explicit value owned by the caller: created at session
/// start, appended per turn, cleared on demand, and never persisted across
/// restarts. Nothing here is shared or globally mutable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    Human,
    Assistant,
}

impl TurnRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<ConversationTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_human(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn {
            role: TurnRole::Human,
            content: content.into(),
        });
    }

    pub fn record_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn {
            role: TurnRole::Assistant,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Plain-text transcript for prompt interpolation.
    pub fn transcript(&self) -> String {
        render_transcript(&self.turns)
    }
}

/// Renders turns as the `role: content` transcript block the prompt embeds.
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    if turns.is_empty() {
        return "(no previous conversation)".to_string();
    }

    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{ChatSession, TurnRole};

    #[test]
    fn turns_are_recorded_in_order() {
        let mut session = ChatSession::new();
        session.record_human("show me listings");
        session.record_assistant("here are two");
        session.record_human("schedule a visit");

        let roles: Vec<TurnRole> = session.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::Human, TurnRole::Assistant, TurnRole::Human]
        );
    }

    #[test]
    fn transcript_labels_roles_per_line() {
        let mut session = ChatSession::new();
        session.record_human("hello");
        session.record_assistant("hi there");

        assert_eq!(session.transcript(), "human: hello\nassistant: hi there");
    }

    #[test]
    fn empty_transcript_has_a_placeholder() {
        let session = ChatSession::new();
        assert_eq!(session.transcript(), "(no previous conversation)");
    }

    #[test]
    fn clear_resets_the_history() {
        let mut session = ChatSession::new();
        session.record_human("hello");
        session.clear();
        assert!(session.turns().is_empty());
    }
}
