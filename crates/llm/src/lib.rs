//! Generation side of the answer pipeline
//!
//! Features:
//! - Mode-template prompt assembly with a numbered context block
//! - Single-shot answer requests through a model router
//! - OpenAI-compatible HTTP router client with per-token cost accounting

pub mod backend;
pub mod prompt;
pub mod requester;

pub use backend::{HttpModelRouter, HttpRouterConfig};
pub use prompt::{AssembledPrompt, PromptAssembler};
pub use requester::AnswerRequester;

use answer_engine_core::GenerationError;
use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Model router error: {0}")]
    Router(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<LlmError> for answer_engine_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Router(e) => e.into(),
            LlmError::Configuration(msg) => answer_engine_core::Error::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err: answer_engine_core::Error = LlmError::Router(GenerationError::Timeout).into();
        assert_eq!(err.kind(), "llm_service");
        assert!(err.is_fatal());
    }
}
