//! Error types for the answer engine
//!
//! `Error` is the taxonomy surfaced to callers of `ask`. The collaborator
//! error types (`SearchError`, `GenerationError`, `StoreError`) are what the
//! trait implementations return; each converts into the matching `Error`
//! variant.

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Retrieval produced zero usable passages after filtering
    #[error("Insufficient context: {0}")]
    InsufficientContext(String),

    /// Search collaborator failed (timeout, unavailable, malformed response)
    #[error("Search service error: {0}")]
    SearchService(String),

    /// Model-routing collaborator failed
    #[error("LLM service error: {0}")]
    LlmService(String),

    /// Generation succeeded but its output could not be structured
    #[error("Malformed generation output: {0}")]
    MalformedGenerationOutput(String),

    /// Conversation history fetch or append failed
    #[error("Conversation unavailable: {0}")]
    ConversationUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Whether this error ends the request without an answer.
    ///
    /// Malformed output and conversation failures are absorbed by the
    /// pipeline and only lower answer quality.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MalformedGenerationOutput(_) | Error::ConversationUnavailable(_)
        )
    }

    /// Stable tag for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InsufficientContext(_) => "insufficient_context",
            Error::SearchService(_) => "search_service",
            Error::LlmService(_) => "llm_service",
            Error::MalformedGenerationOutput(_) => "malformed_generation_output",
            Error::ConversationUnavailable(_) => "conversation_unavailable",
            Error::Configuration(_) => "configuration",
            Error::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a `SearchBackend`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("search timed out")]
    Timeout,

    #[error("search unavailable: {0}")]
    Unavailable(String),

    #[error("malformed search response: {0}")]
    MalformedResponse(String),

    #[error("search rejected request: {0}")]
    Rejected(String),
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        Error::SearchService(err.to_string())
    }
}

/// Errors raised by a `ModelRouter`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("generation timed out")]
    Timeout,

    #[error("API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no model satisfies requirements: {0}")]
    NoModelAvailable(String),
}

impl From<GenerationError> for Error {
    fn from(err: GenerationError) -> Self {
        Error::LlmService(err.to_string())
    }
}

/// Errors raised by a `ConversationStore` or `EventSink`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("conversation not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store write failed: {0}")]
    Write(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::ConversationUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::InsufficientContext("none".into()).is_fatal());
        assert!(Error::SearchService("down".into()).is_fatal());
        assert!(Error::LlmService("down".into()).is_fatal());
        assert!(!Error::MalformedGenerationOutput("blank".into()).is_fatal());
        assert!(!Error::ConversationUnavailable("down".into()).is_fatal());
    }

    #[test]
    fn test_collaborator_conversions() {
        let err: Error = SearchError::Timeout.into();
        assert_eq!(err.kind(), "search_service");
        assert!(err.to_string().contains("timed out"));

        let err: Error = GenerationError::Timeout.into();
        assert_eq!(err.kind(), "llm_service");

        let err: Error = StoreError::Unavailable("redis".into()).into();
        assert_eq!(err.kind(), "conversation_unavailable");
    }
}
