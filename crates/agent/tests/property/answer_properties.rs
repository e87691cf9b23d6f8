use answer_engine_agent::confidence::{factors, score};
use answer_engine_agent::{CitationExtractor, ConfidenceScorer};
use answer_engine_core::{AnswerMode, ConfidenceFactors, ConfidenceLevel, RetrievedPassage};
use answer_engine_rag::apply_mode_filter;
use proptest::prelude::*;

fn arb_passage() -> impl Strategy<Value = RetrievedPassage> {
    ("[a-z ]{0,40}", 0u8..6, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(text, source, rel, qual)| {
        RetrievedPassage::new(text, format!("doc-{source}"), format!("src-{source}"))
            .with_scores(rel, qual)
    })
}

fn arb_factors() -> impl Strategy<Value = ConfidenceFactors> {
    (
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
    )
        .prop_map(|(source_quality, relevance, coverage, completeness, model, citations)| {
            ConfidenceFactors {
                source_quality,
                relevance,
                coverage,
                completeness,
                model,
                citations,
            }
        })
}

/// Modes whose filter keeps the search ranking order
fn arb_ranked_mode() -> impl Strategy<Value = AnswerMode> {
    prop_oneof![
        Just(AnswerMode::Standard),
        Just(AnswerMode::Conversational),
        Just(AnswerMode::Research),
        Just(AnswerMode::Summarization),
        Just(AnswerMode::FactCheck),
    ]
}

fn indexed(passages: Vec<RetrievedPassage>) -> Vec<RetrievedPassage> {
    passages
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.with_document_id(i.to_string()))
        .collect()
}

fn position(p: &RetrievedPassage) -> usize {
    p.document_id.parse().unwrap()
}

proptest! {
    #[test]
    fn prop_score_in_unit_interval(f in arb_factors(), degraded in any::<bool>()) {
        let s = score(&f, degraded);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn prop_degraded_never_scores_higher(f in arb_factors()) {
        prop_assert!(score(&f, true) <= score(&f, false));
    }

    #[test]
    fn prop_level_monotonic_in_score(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(ConfidenceLevel::from_score(lo) <= ConfidenceLevel::from_score(hi));
    }

    #[test]
    fn prop_factors_normalized(
        passages in prop::collection::vec(arb_passage(), 0..20),
        answer in "[a-z ]{0,300}",
        citations in 0usize..10,
    ) {
        let f = factors(&passages, &answer, citations);
        for v in [f.source_quality, f.relevance, f.coverage, f.completeness, f.model, f.citations] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn prop_assessment_deterministic(
        passages in prop::collection::vec(arb_passage(), 1..10),
        answer in "[a-z \\[\\]0-9]{1,200}",
    ) {
        let scorer = ConfidenceScorer::new();
        let a = scorer.assess(&passages, &answer, 2, false);
        let b = scorer.assess(&passages, &answer, 2, false);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_citations_sound(
        passages in prop::collection::vec(arb_passage(), 1..8),
        markers in prop::collection::vec(0usize..12, 0..10),
    ) {
        let text: String =
            markers.iter().map(|m| format!("claim [{m}] ")).collect::<String>() + "end";
        let citations = CitationExtractor::default().extract(&text, &passages).unwrap();

        let expected: Vec<usize> = markers
            .iter()
            .copied()
            .filter(|m| (1..=passages.len()).contains(m))
            .collect();
        let numbers: Vec<usize> = citations.iter().map(|c| c.citation_number).collect();
        prop_assert_eq!(numbers, expected);

        for c in &citations {
            let p = &passages[c.citation_number - 1];
            prop_assert_eq!(&c.source_id, &p.source_id);
            prop_assert_eq!(&c.title, &p.document_title);
        }
    }

    #[test]
    fn prop_mode_filter_preserves_order(
        mode in arb_ranked_mode(),
        passages in prop::collection::vec(arb_passage(), 0..40),
    ) {
        let input = indexed(passages);
        let filtered = apply_mode_filter(mode, input.clone());
        prop_assert!(filtered.len() <= input.len());

        let positions: Vec<usize> = filtered.iter().map(position).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_comparison_groups_and_caps(passages in prop::collection::vec(arb_passage(), 0..40)) {
        let filtered = apply_mode_filter(AnswerMode::Comparison, indexed(passages));
        prop_assert!(filtered.len() <= 12);

        // Each source appears as one contiguous run of at most two, in rank order
        let mut runs: Vec<(&str, Vec<usize>)> = Vec::new();
        for p in &filtered {
            match runs.last_mut() {
                Some((source, positions)) if *source == p.source_id.as_str() => {
                    positions.push(position(p))
                }
                _ => runs.push((p.source_id.as_str(), vec![position(p)])),
            }
        }
        let mut seen = std::collections::HashSet::new();
        for (source, positions) in &runs {
            prop_assert!(seen.insert(*source));
            prop_assert!(positions.len() <= 2);
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
