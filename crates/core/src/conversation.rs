//! Conversation snapshot types
//!
//! A `ConversationContext` is a read-only copy of the most recent turns,
//! fetched fresh for every request.

use serde::{Deserialize, Serialize};

use crate::text::truncate_with_ellipsis;

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// User message
    User,
    /// Assistant answer
    Assistant,
    /// System note (ignored when building history)
    System,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
        }
    }
}

/// One prior turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    /// Shortened copy used when the turn is replayed as context
    pub context_content: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            role,
            context_content: content.clone(),
            content,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Set the context copy to a truncated version of the content
    pub fn with_context_limit(mut self, max_chars: usize) -> Self {
        self.context_content = truncate_with_ellipsis(&self.content, max_chars);
        self
    }
}

/// Ordered prior turns of one conversation, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub conversation_id: String,
    pub turns: Vec<ConversationTurn>,
}

impl ConversationContext {
    pub fn new(conversation_id: impl Into<String>, turns: Vec<ConversationTurn>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            turns,
        }
    }

    /// Empty snapshot, used when history is unavailable
    pub fn empty(conversation_id: impl Into<String>) -> Self {
        Self::new(conversation_id, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// History lines for the last `n` turns
    ///
    /// User turns become `Previous question: ...`, assistant turns become
    /// `Previous answer: ...`. When `answer_limit` is set, answers come from
    /// the turn's `context_content`, truncated to that many characters.
    /// Without a limit the full `content` is used.
    pub fn exchange_lines(&self, n: usize, answer_limit: Option<usize>) -> Vec<String> {
        self.recent(n)
            .iter()
            .filter_map(|turn| match turn.role {
                TurnRole::User => Some(format!("Previous question: {}", turn.content)),
                TurnRole::Assistant => {
                    let answer = match answer_limit {
                        Some(limit) => truncate_with_ellipsis(&turn.context_content, limit),
                        None => turn.content.clone(),
                    };
                    Some(format!("Previous answer: {}", answer))
                }
                TurnRole::System => None,
            })
            .collect()
    }
}

/// A message to append to a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub conversation_id: String,
    pub role: TurnRole,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConversationContext {
        ConversationContext::new(
            "conv-1",
            vec![
                ConversationTurn::user("What is ML?"),
                ConversationTurn::assistant("Machine learning is a subset of AI."),
                ConversationTurn::new(TurnRole::System, "note"),
                ConversationTurn::user("How does it learn?"),
                ConversationTurn::assistant("From data. ".repeat(40)),
            ],
        )
    }

    #[test]
    fn test_recent_window() {
        let ctx = sample();
        assert_eq!(ctx.recent(2).len(), 2);
        assert_eq!(ctx.recent(2)[0].content, "How does it learn?");
        assert_eq!(ctx.recent(100).len(), 5);
    }

    #[test]
    fn test_exchange_lines_truncate_answers_only() {
        let ctx = sample();
        let lines = ctx.exchange_lines(6, Some(20));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Previous question: What is ML?");
        assert!(lines[3].starts_with("Previous answer: From data."));
        assert!(lines[3].ends_with("..."));

        let full = ctx.exchange_lines(6, None);
        assert!(!full[3].ends_with("..."));
    }

    #[test]
    fn test_context_limit() {
        let turn = ConversationTurn::assistant("abcdefghij").with_context_limit(4);
        assert_eq!(turn.content, "abcdefghij");
        assert_eq!(turn.context_content, "abcd...");
    }

    #[test]
    fn test_exchange_lines_prefer_context_copy() {
        let ctx = ConversationContext::new(
            "conv-1",
            vec![
                ConversationTurn::user("What is ML?"),
                ConversationTurn::assistant("Machine learning is a subset of AI.")
                    .with_context_limit(7),
            ],
        );

        let limited = ctx.exchange_lines(6, Some(200));
        assert_eq!(limited[1], "Previous answer: Machine...");

        let full = ctx.exchange_lines(6, None);
        assert_eq!(full[1], "Previous answer: Machine learning is a subset of AI.");
    }
}
