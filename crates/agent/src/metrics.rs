//! Pipeline metrics
//!
//! Recorded through the `metrics` facade; a no-op unless the host process
//! installs a recorder (Prometheus exporter or similar).

use answer_engine_core::AnswerMode;

pub const REQUESTS_TOTAL: &str = "answer_requests_total";
pub const FAILURES_TOTAL: &str = "answer_failures_total";
pub const LATENCY_MS: &str = "answer_latency_ms";
pub const CONFIDENCE_SCORE: &str = "answer_confidence_score";

pub fn record_request(mode: AnswerMode) {
    ::metrics::counter!(REQUESTS_TOTAL, "mode" => mode.as_str()).increment(1);
}

/// `kind` is `Error::kind()`
pub fn record_failure(kind: &'static str) {
    ::metrics::counter!(FAILURES_TOTAL, "kind" => kind).increment(1);
}

pub fn record_latency(total_ms: u64) {
    ::metrics::histogram!(LATENCY_MS).record(total_ms as f64);
}

pub fn record_confidence(score: f64) {
    ::metrics::histogram!(CONFIDENCE_SCORE).record(score);
}
