//! Operating modes and the per-mode parameter table
//!
//! Every mode-dependent setting lives in one `ModeProfile` record: how wide
//! to retrieve, whether to rerank or diversify, and the system prompt
//! template. Components look the profile up once per request instead of
//! branching on the mode themselves, so adding a mode is a change to this
//! file only.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating profile selecting retrieval breadth and prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Single-shot question answering
    #[default]
    Standard,
    /// Multi-turn conversation; history shapes retrieval and prompt
    Conversational,
    /// Broad, source-diverse investigation
    Research,
    /// Condense the retrieved material
    Summarization,
    /// Contrast positions across sources
    Comparison,
    /// Verify a claim against authoritative passages only
    FactCheck,
}

impl AnswerMode {
    pub const ALL: [AnswerMode; 6] = [
        AnswerMode::Standard,
        AnswerMode::Conversational,
        AnswerMode::Research,
        AnswerMode::Summarization,
        AnswerMode::Comparison,
        AnswerMode::FactCheck,
    ];

    /// Wire tag of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMode::Standard => "standard",
            AnswerMode::Conversational => "conversational",
            AnswerMode::Research => "research",
            AnswerMode::Summarization => "summarization",
            AnswerMode::Comparison => "comparison",
            AnswerMode::FactCheck => "fact_check",
        }
    }

    /// Parse a mode tag, falling back to `Standard` for unknown tags
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Serde `deserialize_with` adapter for [`AnswerMode::parse_lenient`]
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&tag))
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(AnswerMode::Standard),
            "conversational" => Ok(AnswerMode::Conversational),
            "research" => Ok(AnswerMode::Research),
            "summarization" => Ok(AnswerMode::Summarization),
            "comparison" => Ok(AnswerMode::Comparison),
            "fact_check" | "factcheck" => Ok(AnswerMode::FactCheck),
            other => Err(format!("unknown answer mode: {other}")),
        }
    }
}

/// Retrieval settings for one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrievalParams {
    /// Number of candidates requested from search
    pub breadth_k: usize,
    /// Ask search to rerank candidates
    pub rerank: bool,
    /// Ask search to diversify candidates
    pub diversify: bool,
}

/// Static record of everything mode-specific
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub mode: AnswerMode,
    pub retrieval: RetrievalParams,
    /// System prompt template with `{language}`, `{mode}`, `{context}` and
    /// `{history}` placeholders
    pub template: &'static str,
}

const CITATION_RULES: &str = "Cite every factual statement with the bracketed number of the \
     supporting document, for example [1] or [2][3]. Only cite documents listed in the context. \
     If the context does not contain the answer, say so plainly.";

static PROFILES: [ModeProfile; 6] = [
    ModeProfile {
        mode: AnswerMode::Standard,
        retrieval: RetrievalParams {
            breadth_k: 10,
            rerank: true,
            diversify: false,
        },
        template: "You are a knowledge assistant answering in {language}. Mode: {mode}.\n\
             Answer the user's question using only the numbered documents below.\n\
             {citation_rules}\n\n\
             Context:\n{context}",
    },
    ModeProfile {
        mode: AnswerMode::Conversational,
        retrieval: RetrievalParams {
            breadth_k: 8,
            rerank: true,
            diversify: false,
        },
        template: "You are a knowledge assistant in an ongoing conversation, answering in \
             {language}. Mode: {mode}.\n\
             Use the conversation so far to resolve references in the latest question, \
             but ground every claim in the numbered documents.\n\
             {citation_rules}\n\n\
             Conversation so far:\n{history}\n\n\
             Context:\n{context}",
    },
    ModeProfile {
        mode: AnswerMode::Research,
        retrieval: RetrievalParams {
            breadth_k: 25,
            rerank: true,
            diversify: true,
        },
        template: "You are a research analyst writing in {language}. Mode: {mode}.\n\
             Produce a thorough, structured answer that synthesizes evidence across as many \
             distinct sources as the context allows. Note disagreements and gaps.\n\
             {citation_rules}\n\n\
             Context:\n{context}",
    },
    ModeProfile {
        mode: AnswerMode::Summarization,
        retrieval: RetrievalParams {
            breadth_k: 15,
            rerank: false,
            diversify: true,
        },
        template: "You are summarizing material in {language}. Mode: {mode}.\n\
             Write a concise summary of the numbered documents as they relate to the \
             user's request. Preserve key figures and names.\n\
             {citation_rules}\n\n\
             Context:\n{context}",
    },
    ModeProfile {
        mode: AnswerMode::Comparison,
        retrieval: RetrievalParams {
            breadth_k: 20,
            rerank: true,
            diversify: true,
        },
        template: "You are comparing perspectives in {language}. Mode: {mode}.\n\
             Contrast what the different sources say about the user's question. Group \
             similarities and differences, and attribute each position to its source.\n\
             {citation_rules}\n\n\
             Context:\n{context}",
    },
    ModeProfile {
        mode: AnswerMode::FactCheck,
        retrieval: RetrievalParams {
            breadth_k: 12,
            rerank: true,
            diversify: false,
        },
        template: "You are a fact checker writing in {language}. Mode: {mode}.\n\
             Assess the user's claim against the numbered documents. Start with a verdict \
             (supported, contradicted, or not enough evidence), then justify it.\n\
             {citation_rules}\n\n\
             Context:\n{context}",
    },
];

impl ModeProfile {
    /// Look up the profile for a mode
    pub fn for_mode(mode: AnswerMode) -> &'static ModeProfile {
        // PROFILES is declared in AnswerMode::ALL order
        let index = AnswerMode::ALL
            .iter()
            .position(|m| *m == mode)
            .unwrap_or(0);
        &PROFILES[index]
    }

    /// All profiles in declaration order
    pub fn all() -> &'static [ModeProfile] {
        &PROFILES
    }

    /// Template with the shared citation rules filled in
    pub fn system_template(&self) -> String {
        self.template.replace("{citation_rules}", CITATION_RULES)
    }

    pub fn uses_history(&self) -> bool {
        self.mode == AnswerMode::Conversational
    }
}
