//! Mode-specific post-filters over search candidates
//!
//! Authority and diversity filters keep the search ranking order. The
//! comparison balancer groups passages by source so competing positions sit
//! side by side. Either way the output is the citation index.

use std::collections::{HashMap, HashSet};

use answer_engine_config::constants::retrieval;
use answer_engine_core::{AnswerMode, RetrievedPassage};

/// Apply the post-filter for `mode`
pub fn apply_mode_filter(
    mode: AnswerMode,
    passages: Vec<RetrievedPassage>,
) -> Vec<RetrievedPassage> {
    match mode {
        AnswerMode::FactCheck => filter_authoritative(passages, retrieval::FACT_CHECK_MIN_QUALITY),
        AnswerMode::Research => enforce_diversity(
            passages,
            retrieval::RESEARCH_MIN_DISTINCT_SOURCES,
            retrieval::RESEARCH_MAX_PASSAGES,
        ),
        AnswerMode::Comparison => balance_sources(
            passages,
            retrieval::COMPARISON_MAX_PER_SOURCE,
            retrieval::COMPARISON_MAX_PASSAGES,
        ),
        AnswerMode::Standard | AnswerMode::Conversational | AnswerMode::Summarization => passages,
    }
}

/// Drop passages whose quality score is below `min_quality`
pub fn filter_authoritative(
    passages: Vec<RetrievedPassage>,
    min_quality: f32,
) -> Vec<RetrievedPassage> {
    passages
        .into_iter()
        .filter(|p| p.quality_score >= min_quality)
        .collect()
}

/// Greedy source diversity
///
/// A passage is kept when its source is new, or once the distinct-source
/// quota has been met. The quota is `min_distinct`, lowered to the number of
/// distinct sources actually present so a narrow result set is not starved.
/// Repeats skipped before the quota was met backfill any remaining room in
/// their original order. At most `max_passages` are returned.
pub fn enforce_diversity(
    passages: Vec<RetrievedPassage>,
    min_distinct: usize,
    max_passages: usize,
) -> Vec<RetrievedPassage> {
    let available: HashSet<&str> = passages.iter().map(|p| p.source_id.as_str()).collect();
    let quota = min_distinct.min(available.len());

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<(usize, RetrievedPassage)> = Vec::with_capacity(max_passages);
    let mut deferred: Vec<(usize, RetrievedPassage)> = Vec::new();

    for (idx, passage) in passages.into_iter().enumerate() {
        if kept.len() >= max_passages {
            break;
        }
        let is_new = !seen.contains(&passage.source_id);
        if is_new || seen.len() >= quota {
            seen.insert(passage.source_id.clone());
            kept.push((idx, passage));
        } else {
            deferred.push((idx, passage));
        }
    }

    let room = max_passages.saturating_sub(kept.len());
    kept.extend(deferred.into_iter().take(room));
    kept.sort_by_key(|(idx, _)| *idx);
    kept.into_iter().map(|(_, p)| p).collect()
}

/// Group by source (first-appearance order), keep `per_source` from each,
/// cap the total at `max_passages`
pub fn balance_sources(
    passages: Vec<RetrievedPassage>,
    per_source: usize,
    max_passages: usize,
) -> Vec<RetrievedPassage> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RetrievedPassage>> = HashMap::new();

    for passage in passages {
        let group = groups.entry(passage.source_id.clone()).or_insert_with(|| {
            order.push(passage.source_id.clone());
            Vec::new()
        });
        if group.len() < per_source {
            group.push(passage);
        }
    }

    order
        .iter()
        .filter_map(|source| groups.remove(source))
        .flatten()
        .take(max_passages)
        .collect()
}
