//! Citation extraction
//!
//! Resolves `[n]` markers in generated text against the passage list that
//! was shown to the model. Marker `n` names `passages[n - 1]`.

use once_cell::sync::Lazy;
use regex::Regex;

use answer_engine_config::constants::citations::DEFAULT_EXCERPT_CHARS;
use answer_engine_core::text::truncate_with_ellipsis;
use answer_engine_core::{Citation, Error, Result, RetrievedPassage};

static CITATION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").unwrap());

#[derive(Debug, Clone, Copy)]
pub struct CitationExtractor {
    excerpt_chars: usize,
}

impl Default for CitationExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_CHARS)
    }
}

impl CitationExtractor {
    pub fn new(excerpt_chars: usize) -> Self {
        Self { excerpt_chars }
    }

    /// One citation per in-range marker, in the order the markers occur
    ///
    /// Repeated markers yield repeated citations. Markers outside
    /// `1..=passages.len()` (and numbers too large to parse) are skipped.
    /// Blank text cannot be structured and is reported as malformed.
    pub fn extract(&self, text: &str, passages: &[RetrievedPassage]) -> Result<Vec<Citation>> {
        if text.trim().is_empty() {
            return Err(Error::MalformedGenerationOutput(
                "generated answer is empty".to_string(),
            ));
        }

        let mut citations = Vec::new();
        let mut skipped = 0usize;

        for caps in CITATION_MARKER.captures_iter(text) {
            let number = match caps[1].parse::<usize>() {
                Ok(n) if (1..=passages.len()).contains(&n) => n,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            let passage = &passages[number - 1];
            let excerpt = truncate_with_ellipsis(&passage.text, self.excerpt_chars);
            citations.push(Citation::from_passage(number, passage, excerpt));
        }

        if skipped > 0 {
            tracing::debug!(
                skipped,
                passages = passages.len(),
                "Ignored out-of-range citation markers"
            );
        }

        Ok(citations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passages() -> Vec<RetrievedPassage> {
        vec![
            RetrievedPassage::new("ML is a subset of AI.", "A", "src-a").with_scores(0.95, 0.9),
            RetrievedPassage::new("x".repeat(300), "B", "src-b").with_scores(0.9, 0.85),
            RetrievedPassage::new("Data drives learning.", "C", "src-c").with_scores(0.85, 0.8),
        ]
    }

    #[test]
    fn test_markers_resolve_in_order() {
        let text = "ML is AI's subset.[1] It learns from data.[2][3]";
        let citations = CitationExtractor::default().extract(text, &passages()).unwrap();

        let numbers: Vec<_> = citations.iter().map(|c| c.citation_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(citations[0].title, "A");
        assert_eq!(citations[2].source_id, "src-c");
        assert!((citations[0].relevance_score - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_excerpt_truncated() {
        let citations = CitationExtractor::default().extract("see [2]", &passages()).unwrap();
        assert_eq!(citations[0].excerpt, format!("{}...", "x".repeat(200)));
    }

    #[test]
    fn test_out_of_range_skipped() {
        let text = "[0] zero, [4] too far, [99999999999999999999999] overflow, [3] fine";
        let citations = CitationExtractor::default().extract(text, &passages()).unwrap();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].citation_number, 3);
    }

    #[test]
    fn test_duplicates_kept() {
        let citations = CitationExtractor::default()
            .extract("[1] and again [1]", &passages())
            .unwrap();
        assert_eq!(citations.len(), 2);
    }

    #[test]
    fn test_no_markers_is_empty() {
        let citations = CitationExtractor::default()
            .extract("An answer without any markers.", &passages())
            .unwrap();
        assert!(citations.is_empty());
    }

    #[test]
    fn test_blank_text_is_malformed() {
        let err = CitationExtractor::default().extract("  \n", &passages()).unwrap_err();
        assert!(matches!(err, Error::MalformedGenerationOutput(_)));
        assert!(!err.is_fatal());
    }
}
