//! Confidence assessment types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence band
///
/// Variants are declared low to high so the derived `Ord` matches the band
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Lower bounds of each band, highest first
    pub const THRESHOLDS: [(f64, ConfidenceLevel); 4] = [
        (0.9, ConfidenceLevel::VeryHigh),
        (0.8, ConfidenceLevel::High),
        (0.6, ConfidenceLevel::Medium),
        (0.4, ConfidenceLevel::Low),
    ];

    /// Highest band whose threshold the score meets
    pub fn from_score(score: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map(|(_, level)| *level)
            .unwrap_or(ConfidenceLevel::VeryLow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "very_low",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
            ConfidenceLevel::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-factor breakdown, each value normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    /// Mean quality score of all retrieved passages
    pub source_quality: f64,
    /// Mean relevance of the top passages
    pub relevance: f64,
    /// Distinct-source coverage
    pub coverage: f64,
    /// Answer length relative to a full answer
    pub completeness: f64,
    /// Model self-confidence
    pub model: f64,
    /// Citation density
    pub citations: f64,
}

/// Score, band, breakdown and explanation for one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub score: f64,
    pub level: ConfidenceLevel,
    pub factors: ConfidenceFactors,
    pub explanation: String,
    /// Set when the answer could not be structured and the score was penalized
    #[serde(default)]
    pub degraded: bool,
}
