//! Search collaborator interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::passage::RetrievedPassage;

/// Restrictions applied by the search engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Only return passages from these sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ids: Option<Vec<String>>,
}

impl SearchFilters {
    pub fn sources(source_ids: Vec<String>) -> Self {
        Self {
            source_ids: Some(source_ids),
        }
    }
}

/// One search call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub tenant_id: String,
    pub user_id: Option<String>,
    pub k: usize,
    pub filters: SearchFilters,
    pub rerank: bool,
    pub diversify: bool,
    pub language: String,
}

/// Hybrid (vector + lexical) search engine
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Ordered candidates, best first
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RetrievedPassage>, SearchError>;

    /// Backend name for logs
    fn name(&self) -> &str {
        "search"
    }
}
