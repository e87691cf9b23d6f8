//! Context Retriever
//!
//! One search call per request, parameterized by the mode profile, followed
//! by the mode post-filter. An empty result after filtering is an error: the
//! pipeline must not generate an ungrounded answer.

use std::sync::Arc;
use std::time::Instant;

use answer_engine_core::{
    ModeProfile, Question, RetrievalMethod, RetrievedPassage, SearchBackend, SearchFilters,
    SearchRequest,
};

use crate::filters::apply_mode_filter;
use crate::RagError;

/// Ordered passages for one request
#[derive(Debug, Clone)]
pub struct RetrievalOutcome {
    /// Filtered passages; position i (1-based) is citation marker [i]
    pub passages: Vec<RetrievedPassage>,
    /// Raw candidates returned by search before filtering
    pub candidates_considered: usize,
    pub method: RetrievalMethod,
    pub elapsed_ms: u64,
}

/// Retriever over a search collaborator
pub struct ContextRetriever {
    backend: Arc<dyn SearchBackend>,
}

impl ContextRetriever {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Build the search call for a question under a mode profile
    pub fn build_request(query: &str, question: &Question, profile: &ModeProfile) -> SearchRequest {
        let filters = match &question.sources {
            Some(sources) if !sources.is_empty() => SearchFilters::sources(sources.clone()),
            _ => SearchFilters::default(),
        };

        SearchRequest {
            query: query.to_string(),
            tenant_id: question.tenant_id.clone(),
            user_id: question.user_id.clone(),
            k: profile.retrieval.breadth_k,
            filters,
            rerank: profile.retrieval.rerank,
            diversify: profile.retrieval.diversify,
            language: question.language.clone(),
        }
    }

    /// Search with the (possibly enhanced) query and apply the mode filter
    pub async fn retrieve(
        &self,
        query: &str,
        question: &Question,
        profile: &ModeProfile,
    ) -> Result<RetrievalOutcome, RagError> {
        let start = Instant::now();
        let request = Self::build_request(query, question, profile);

        let candidates = self.backend.search(&request).await.map_err(|e| {
            tracing::warn!(
                backend = self.backend.name(),
                tenant_id = %question.tenant_id,
                error = %e,
                "Search collaborator failed"
            );
            RagError::Search(e)
        })?;

        let candidates_considered = candidates.len();
        let passages = apply_mode_filter(profile.mode, candidates);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            mode = %profile.mode,
            k = request.k,
            candidates = candidates_considered,
            kept = passages.len(),
            elapsed_ms,
            "Retrieved context"
        );

        if passages.is_empty() {
            return Err(RagError::InsufficientContext {
                mode: profile.mode,
                candidates: candidates_considered,
            });
        }

        Ok(RetrievalOutcome {
            passages,
            candidates_considered,
            method: RetrievalMethod::from(&profile.retrieval),
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_engine_core::{AnswerMode, AskRequest, SearchError};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct FixedSearch {
        result: Result<Vec<RetrievedPassage>, SearchError>,
        last_request: Mutex<Option<SearchRequest>>,
    }

    impl FixedSearch {
        fn new(result: Result<Vec<RetrievedPassage>, SearchError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl SearchBackend for FixedSearch {
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<Vec<RetrievedPassage>, SearchError> {
            *self.last_request.lock() = Some(request.clone());
            self.result.clone()
        }
    }

    fn passages(qualities: &[f32]) -> Vec<RetrievedPassage> {
        qualities
            .iter()
            .enumerate()
            .map(|(i, q)| {
                RetrievedPassage::new(format!("p{i}"), format!("Doc {i}"), format!("s{i}"))
                    .with_scores(0.9, *q)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_request_uses_mode_parameters() {
        let search = FixedSearch::new(Ok(passages(&[0.9])));
        let retriever = ContextRetriever::new(search.clone());
        let request = AskRequest::new("Compare A and B", "tenant-a")
            .with_user("u1")
            .with_language("fr")
            .with_sources(vec!["wiki".into(), "handbook".into()]);
        let profile = ModeProfile::for_mode(AnswerMode::Research);

        let outcome = retriever
            .retrieve("Compare A and B", &request.question, profile)
            .await
            .unwrap();
        assert_eq!(outcome.method, RetrievalMethod::HybridRerankedDiversified);

        let sent = search.last_request.lock().clone().unwrap();
        assert_eq!(sent.k, 25);
        assert!(sent.rerank);
        assert!(sent.diversify);
        assert_eq!(sent.tenant_id, "tenant-a");
        assert_eq!(sent.user_id.as_deref(), Some("u1"));
        assert_eq!(sent.language, "fr");
        assert_eq!(
            sent.filters.source_ids,
            Some(vec!["wiki".to_string(), "handbook".to_string()])
        );
    }

    #[tokio::test]
    async fn test_empty_after_filter_is_insufficient() {
        let search = FixedSearch::new(Ok(passages(&[0.5, 0.3])));
        let retriever = ContextRetriever::new(search);
        let request = AskRequest::new("Is the earth flat?", "t");

        let err = retriever
            .retrieve(
                "Is the earth flat?",
                &request.question,
                ModeProfile::for_mode(AnswerMode::FactCheck),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::InsufficientContext { candidates: 2, .. }));
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let search = FixedSearch::new(Err(SearchError::Timeout));
        let retriever = ContextRetriever::new(search);
        let request = AskRequest::new("q", "t");

        let err = retriever
            .retrieve("q", &request.question, ModeProfile::for_mode(AnswerMode::Standard))
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Search(SearchError::Timeout)));
    }

    #[tokio::test]
    async fn test_counts_raw_candidates() {
        let search = FixedSearch::new(Ok(passages(&[0.9, 0.2, 0.8])));
        let retriever = ContextRetriever::new(search);
        let request = AskRequest::new("q", "t");

        let outcome = retriever
            .retrieve("q", &request.question, ModeProfile::for_mode(AnswerMode::FactCheck))
            .await
            .unwrap();
        assert_eq!(outcome.candidates_considered, 3);
        assert_eq!(outcome.passages.len(), 2);
        assert_eq!(outcome.passages[1].text, "p2");
    }
}
