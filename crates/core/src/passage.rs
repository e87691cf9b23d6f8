//! Retrieved passages
//!
//! The ordered `Vec<RetrievedPassage>` produced by retrieval is the citation
//! index contract: the passage at position *i* (1-based) is what marker `[i]`
//! refers to in the prompt and in the generated answer.

use serde::{Deserialize, Serialize};

/// One candidate returned by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text shown to the model
    #[serde(alias = "content")]
    pub text: String,
    /// Owning document identifier
    #[serde(default)]
    pub document_id: String,
    pub document_title: String,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    /// Source (collection/connector) the document belongs to
    pub source_id: String,
    #[serde(default)]
    pub chunk_id: String,
    /// Query relevance, 0.0 - 1.0
    pub relevance_score: f32,
    /// Source quality/authority, 0.0 - 1.0
    pub quality_score: f32,
}

impl RetrievedPassage {
    /// Minimal passage, mostly useful for tests and fixtures
    pub fn new(
        text: impl Into<String>,
        document_title: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            document_id: String::new(),
            document_title: document_title.into(),
            document_url: None,
            section: None,
            page: None,
            source_id: source_id.into(),
            chunk_id: String::new(),
            relevance_score: 0.0,
            quality_score: 0.0,
        }
    }

    pub fn with_scores(mut self, relevance: f32, quality: f32) -> Self {
        self.relevance_score = relevance;
        self.quality_score = quality;
        self
    }

    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = document_id.into();
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_payload() {
        let json = r#"{
            "text": "Gradient descent minimizes loss.",
            "document_title": "Optimization Notes",
            "document_url": "https://docs.example.com/opt",
            "section": "2.1",
            "page": 14,
            "source_id": "wiki",
            "chunk_id": "c-9",
            "relevance_score": 0.82,
            "quality_score": 0.9
        }"#;

        let passage: RetrievedPassage = serde_json::from_str(json).unwrap();
        assert_eq!(passage.page, Some(14));
        assert_eq!(passage.section.as_deref(), Some("2.1"));
        assert!(passage.document_id.is_empty());
        assert_eq!(passage.source_id, "wiki");
    }
}
