//! Confidence scoring
//!
//! A weighted composite of six factors, each normalized to [0, 1]:
//!
//! | factor         | weight | value                                   |
//! |----------------|--------|-----------------------------------------|
//! | source quality | 0.25   | mean quality of all retrieved passages  |
//! | relevance      | 0.25   | mean relevance of the first 5 passages  |
//! | coverage       | 0.15   | distinct sources / 3                    |
//! | completeness   | 0.10   | answer words / 100                      |
//! | model          | 0.15   | fixed baseline                          |
//! | citations      | 0.10   | citations / 3                           |
//!
//! Everything here is a pure function of its inputs.

use std::collections::HashSet;

use answer_engine_config::constants::confidence::*;
use answer_engine_core::text::word_count;
use answer_engine_core::{
    ConfidenceAssessment, ConfidenceFactors, ConfidenceLevel, RetrievedPassage,
};

const GENERIC_EXPLANATION: &str = "Standard confidence assessment based on available sources.";
const DEGRADED_NOTE: &str = "Answer could not be structured; score penalized.";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Full assessment for one answer
    pub fn assess(
        &self,
        passages: &[RetrievedPassage],
        answer: &str,
        citation_count: usize,
        degraded: bool,
    ) -> ConfidenceAssessment {
        let factors = factors(passages, answer, citation_count);
        let score = score(&factors, degraded);
        let level = ConfidenceLevel::from_score(score);

        tracing::debug!(score, level = %level, degraded, "Scored answer confidence");

        ConfidenceAssessment {
            score,
            level,
            factors,
            explanation: explain(&factors, degraded),
            degraded,
        }
    }
}

/// Finite values clamped to [0, 1]; anything else counts as 0
fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + unit(v), c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Factor breakdown
pub fn factors(
    passages: &[RetrievedPassage],
    answer: &str,
    citation_count: usize,
) -> ConfidenceFactors {
    let source_quality = mean(passages.iter().map(|p| p.quality_score as f64));

    // Positional: the first passages as ranked, not the best-scoring ones
    let relevance = mean(
        passages
            .iter()
            .take(RELEVANCE_TOP_N)
            .map(|p| p.relevance_score as f64),
    );

    let distinct: HashSet<&str> = passages.iter().map(|p| p.source_id.as_str()).collect();
    let coverage = (distinct.len() as f64 / COVERAGE_TARGET_SOURCES).min(1.0);

    let completeness = (word_count(answer) as f64 / COMPLETENESS_TARGET_WORDS).min(1.0);
    let citations = (citation_count as f64 / CITATION_TARGET).min(1.0);

    ConfidenceFactors {
        source_quality,
        relevance,
        coverage,
        completeness,
        model: MODEL_BASELINE,
        citations,
    }
}

/// Weighted score, penalized when degraded, clamped and rounded to three decimals
pub fn score(factors: &ConfidenceFactors, degraded: bool) -> f64 {
    let raw = WEIGHT_SOURCE_QUALITY * unit(factors.source_quality)
        + WEIGHT_RELEVANCE * unit(factors.relevance)
        + WEIGHT_COVERAGE * unit(factors.coverage)
        + WEIGHT_COMPLETENESS * unit(factors.completeness)
        + WEIGHT_MODEL * unit(factors.model)
        + WEIGHT_CITATIONS * unit(factors.citations);

    let penalized = if degraded { raw - DEGRADED_PENALTY } else { raw };
    (unit(penalized) * 1000.0).round() / 1000.0
}

/// Human-readable summary of the notable factors
pub fn explain(factors: &ConfidenceFactors, degraded: bool) -> String {
    let named = [
        ("source quality", factors.source_quality),
        ("relevance", factors.relevance),
        ("source coverage", factors.coverage),
        ("citation support", factors.citations),
    ];

    let strong: Vec<&str> = named
        .iter()
        .filter(|(_, v)| *v >= STRONG_FACTOR)
        .map(|(name, _)| *name)
        .collect();
    let weak: Vec<&str> = named
        .iter()
        .filter(|(_, v)| *v <= WEAK_FACTOR)
        .map(|(name, _)| *name)
        .collect();

    let mut parts = Vec::new();
    if !strong.is_empty() {
        parts.push(format!("Strong {}", join_names(&strong)));
    }
    if !weak.is_empty() {
        let prefix = if parts.is_empty() { "Weak" } else { "weak" };
        parts.push(format!("{} {}", prefix, join_names(&weak)));
    }

    let mut explanation = if parts.is_empty() {
        GENERIC_EXPLANATION.to_string()
    } else {
        format!("{}.", parts.join("; "))
    };

    if degraded {
        explanation.push(' ');
        explanation.push_str(DEGRADED_NOTE);
    }
    explanation
}

/// "a", "a and b", "a, b and c"
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
