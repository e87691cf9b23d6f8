//! Citation records

use serde::{Deserialize, Serialize};

use crate::passage::RetrievedPassage;

/// Binds one `[n]` marker in the generated answer to the passage it names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Marker number as written by the model (1-based)
    pub citation_number: usize,
    /// Leading excerpt of the passage text
    pub excerpt: String,
    pub document_id: String,
    pub source_id: String,
    pub title: String,
    pub url: Option<String>,
    pub section: Option<String>,
    pub page: Option<u32>,
    pub relevance_score: f32,
}

impl Citation {
    /// Build a citation for marker `number` from the passage it resolves to
    pub fn from_passage(number: usize, passage: &RetrievedPassage, excerpt: String) -> Self {
        Self {
            citation_number: number,
            excerpt,
            document_id: passage.document_id.clone(),
            source_id: passage.source_id.clone(),
            title: passage.document_title.clone(),
            url: passage.document_url.clone(),
            section: passage.section.clone(),
            page: passage.page,
            relevance_score: passage.relevance_score,
        }
    }
}
