//! The answer object returned by `ask`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::citation::Citation;
use crate::confidence::ConfidenceAssessment;
use crate::llm_types::TokenUsage;
use crate::modes::{AnswerMode, RetrievalParams};

/// How the passages were retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMethod {
    Hybrid,
    HybridReranked,
    HybridDiversified,
    HybridRerankedDiversified,
}

impl From<&RetrievalParams> for RetrievalMethod {
    fn from(params: &RetrievalParams) -> Self {
        match (params.rerank, params.diversify) {
            (false, false) => RetrievalMethod::Hybrid,
            (true, false) => RetrievalMethod::HybridReranked,
            (false, true) => RetrievalMethod::HybridDiversified,
            (true, true) => RetrievalMethod::HybridRerankedDiversified,
        }
    }
}

/// Wall-clock timing of the pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerTiming {
    pub retrieval_ms: u64,
    pub generation_ms: u64,
    pub total_ms: u64,
}

/// Full response for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub conversation_id: String,
    pub answer: String,
    pub citations: Vec<Citation>,
    /// Absent when the caller did not ask for confidence
    pub confidence: Option<ConfidenceAssessment>,
    pub retrieval_method: RetrievalMethod,
    pub mode: AnswerMode,
    pub model_used: String,
    pub timing: AnswerTiming,
    /// Raw candidates returned by search before mode filtering
    pub candidates_considered: usize,
    /// Passages actually placed in the prompt
    pub passages_used: usize,
    pub cost: f64,
    pub token_usage: TokenUsage,
    pub created_at: DateTime<Utc>,
}
