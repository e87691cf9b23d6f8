//! Conversation-aware query enhancement
//!
//! In conversational mode a follow-up like "and how does it learn?" retrieves
//! poorly on its own. The enhancer prepends the most recent exchanges so the
//! search engine sees what "it" refers to. The enhanced text only drives
//! retrieval; the model is still shown the user's own question.

use answer_engine_config::PipelineConfig;
use answer_engine_core::{AnswerMode, ConversationContext};

/// Enhancer windows
#[derive(Debug, Clone)]
pub struct EnhancerConfig {
    /// Prior turns considered
    pub history_turns: usize,
    /// Most recent history lines kept in the preamble
    pub preamble_lines: usize,
    /// Characters kept from each previous answer
    pub answer_truncate: usize,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for EnhancerConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            history_turns: config.history_turns,
            preamble_lines: config.history_preamble_lines,
            answer_truncate: config.history_answer_truncate,
        }
    }
}

/// Rewrites the retrieval query from recent conversation turns
#[derive(Debug, Clone, Default)]
pub struct QueryEnhancer {
    config: EnhancerConfig,
}

impl QueryEnhancer {
    pub fn new(config: EnhancerConfig) -> Self {
        Self { config }
    }

    /// Enhanced retrieval query for `question`
    ///
    /// Returns the question unchanged outside conversational mode or when
    /// there is no history.
    pub fn enhance(
        &self,
        question: &str,
        mode: AnswerMode,
        history: &ConversationContext,
    ) -> String {
        if mode != AnswerMode::Conversational || history.is_empty() {
            return question.to_string();
        }

        let lines = history.exchange_lines(
            self.config.history_turns,
            Some(self.config.answer_truncate),
        );
        if lines.is_empty() {
            return question.to_string();
        }

        let start = lines.len().saturating_sub(self.config.preamble_lines);
        let preamble = lines[start..].join("\n");

        tracing::debug!(
            conversation_id = %history.conversation_id,
            history_lines = lines.len(),
            preamble_lines = lines.len() - start,
            "Enhanced query with conversation history"
        );

        format!("Context from conversation:\n{}\n\nCurrent question: {}", preamble, question)
    }
}
