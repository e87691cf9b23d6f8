//! Centralized constants for the answer engine
//!
//! Retrieval filter limits and confidence-scoring weights live here so the
//! retriever, the scorer and their tests agree on one set of numbers.

/// Mode-specific post-filter limits
pub mod retrieval {
    /// Fact-check keeps only passages at or above this quality score
    pub const FACT_CHECK_MIN_QUALITY: f32 = 0.7;

    /// Research: distinct sources required before a source may repeat
    pub const RESEARCH_MIN_DISTINCT_SOURCES: usize = 5;

    /// Research: maximum passages kept
    pub const RESEARCH_MAX_PASSAGES: usize = 15;

    /// Comparison: maximum passages kept per source
    pub const COMPARISON_MAX_PER_SOURCE: usize = 2;

    /// Comparison: maximum passages kept overall
    pub const COMPARISON_MAX_PASSAGES: usize = 12;
}

/// Conversation history windows
pub mod history {
    /// Turns fetched for context (three exchanges)
    pub const DEFAULT_TURNS: usize = 6;

    /// Most recent history lines prepended to the retrieval query
    pub const DEFAULT_PREAMBLE_LINES: usize = 4;

    /// Characters kept from each previous answer in the retrieval preamble
    pub const DEFAULT_ANSWER_TRUNCATE: usize = 200;
}

/// Citation extraction
pub mod citations {
    /// Characters of passage text kept as the citation excerpt
    pub const DEFAULT_EXCERPT_CHARS: usize = 200;
}

/// Confidence scoring weights and normalizers
pub mod confidence {
    pub const WEIGHT_SOURCE_QUALITY: f64 = 0.25;
    pub const WEIGHT_RELEVANCE: f64 = 0.25;
    pub const WEIGHT_COVERAGE: f64 = 0.15;
    pub const WEIGHT_COMPLETENESS: f64 = 0.10;
    pub const WEIGHT_MODEL: f64 = 0.15;
    pub const WEIGHT_CITATIONS: f64 = 0.10;

    /// Passages averaged for the relevance factor
    pub const RELEVANCE_TOP_N: usize = 5;

    /// Distinct sources for full coverage
    pub const COVERAGE_TARGET_SOURCES: f64 = 3.0;

    /// Words for a complete answer
    pub const COMPLETENESS_TARGET_WORDS: f64 = 100.0;

    /// Citations for full citation support
    pub const CITATION_TARGET: f64 = 3.0;

    /// Placeholder until routers report model confidence
    pub const MODEL_BASELINE: f64 = 0.8;

    /// Factor value at or above which a factor is called out as strong
    pub const STRONG_FACTOR: f64 = 0.8;

    /// Factor value at or below which a factor is called out as weak
    pub const WEAK_FACTOR: f64 = 0.4;

    /// Subtracted from the score when the answer could not be structured
    pub const DEGRADED_PENALTY: f64 = 0.2;
}

/// Default endpoints for local development
pub mod endpoints {
    pub const SEARCH_DEFAULT: &str = "http://localhost:8081";
    pub const MODEL_ROUTER_DEFAULT: &str = "http://localhost:8082/v1";
}
