//! Retrieval side of the answer pipeline
//!
//! Features:
//! - Conversation-aware query enhancement (conversational mode only)
//! - One search call per request, parameterized by the mode profile
//! - Mode post-filters: authority (fact-check), source diversity (research),
//!   per-source balancing (comparison)
//! - HTTP/JSON client for the search collaborator

pub mod filters;
pub mod http_search;
pub mod query_enhancer;
pub mod retriever;

pub use filters::{apply_mode_filter, balance_sources, enforce_diversity, filter_authoritative};
pub use http_search::{HttpSearchBackend, HttpSearchConfig};
pub use query_enhancer::{EnhancerConfig, QueryEnhancer};
pub use retriever::{ContextRetriever, RetrievalOutcome};

use answer_engine_core::{AnswerMode, SearchError};
use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("No usable passages for {mode} query ({candidates} candidates before filtering)")]
    InsufficientContext { mode: AnswerMode, candidates: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<RagError> for answer_engine_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Search(e) => e.into(),
            RagError::InsufficientContext { .. } => {
                answer_engine_core::Error::InsufficientContext(err.to_string())
            }
            RagError::Configuration(msg) => answer_engine_core::Error::Configuration(msg),
        }
    }
}
