// Unit tests for the contrastive lexicon analyzer.
//
// Zeta score extremes, the presence-not-frequency rule, the occurrence
// filter, ranking/truncation, and the empty-corpus marker.

use graphite::lexicon::zeta::{compute_zeta_scores, contrastive_lexicon};

fn docs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

// ============================================================
// compute_zeta_scores
// ============================================================

#[test]
fn term_in_all_a_and_no_b_scores_exactly_plus_one() {
    let a = docs(&[
        "the lighthouse keeper walked",
        "a lighthouse in the storm",
        "that lighthouse again",
    ]);
    let b = docs(&[
        "the market opened flat",
        "a market rally built",
        "that market closed",
    ]);

    let scores = compute_zeta_scores(&a, &b, 1);
    assert_eq!(scores["lighthouse"], 1.0);
    assert_eq!(scores["market"], -1.0);
}

#[test]
fn term_in_every_document_scores_zero() {
    let a = docs(&["the sea rose", "the sea fell"]);
    let b = docs(&["the sea froze", "the sea thawed"]);

    let scores = compute_zeta_scores(&a, &b, 1);
    assert_eq!(scores["sea"], 0.0);
    assert_eq!(scores["the"], 0.0);
}

#[test]
fn presence_counts_once_per_document() {
    // "gull" 6 times in one of two A documents is still presence 0.5
    let a = docs(&["gull gull gull gull gull gull", "calm harbor water"]);
    let b = docs(&["calm harbor evening", "calm harbor night"]);

    let scores = compute_zeta_scores(&a, &b, 1);
    assert!((scores["gull"] - 0.5).abs() < 1e-12);
}

#[test]
fn partial_presence_gives_fractional_scores() {
    // "tide" in 2/4 A docs and 1/2 B docs: 0.5 - 0.5 = 0.0;
    // "wreck" in 3/4 A docs and 0/2 B docs: 0.75
    let a = docs(&[
        "tide and wreck",
        "tide without wreck no wait with wreck",
        "wreck alone",
        "nothing here",
    ]);
    let b = docs(&["tide returns", "still water"]);

    let scores = compute_zeta_scores(&a, &b, 1);
    assert!((scores["tide"] - 0.0).abs() < 1e-12);
    assert!((scores["wreck"] - 0.75).abs() < 1e-12);
}

#[test]
fn rare_terms_are_excluded_by_the_occurrence_filter() {
    let a = docs(&["singular appears exactly once"]);
    let b = docs(&["unrelated words entirely different"]);

    let filtered = compute_zeta_scores(&a, &b, 2);
    assert!(!filtered.contains_key("singular"));

    let unfiltered = compute_zeta_scores(&a, &b, 1);
    assert!(unfiltered.contains_key("singular"));
}

// ============================================================
// contrastive_lexicon
// ============================================================

#[test]
fn lists_are_ranked_by_magnitude_and_split_by_sign() {
    let a = docs(&[
        "whale ocean deep current",
        "whale ocean tide",
        "whale ocean swell",
        "driftwood shore",
    ]);
    let b = docs(&[
        "market stocks rally",
        "market stocks flat",
        "market stocks close",
        "ledger entries",
    ]);

    let result = contrastive_lexicon(&a, &b, 10, 1, false);
    assert!(result.reason.is_none());

    // whale/ocean: 3/4 A docs, 0 B docs -> 0.75 leading A's list
    assert!((result.preferred_by_a[0].1 - 0.75).abs() < 1e-12);
    // market/stocks mirror on B's side, reported as positive magnitude
    assert!((result.preferred_by_b[0].1 - 0.75).abs() < 1e-12);

    for pair in result.preferred_by_a.windows(2) {
        assert!(pair[0].1 >= pair[1].1, "A list must be non-increasing");
    }
    for pair in result.preferred_by_b.windows(2) {
        assert!(pair[0].1 >= pair[1].1, "B list must be non-increasing");
    }

    // Sides are disjoint
    for (term, _) in &result.preferred_by_a {
        assert!(!result.preferred_by_b.iter().any(|(t, _)| t == term));
    }
}

#[test]
fn top_n_truncates_each_side_independently() {
    let a = docs(&["one two three four five", "one two three four five again"]);
    let b = docs(&["six seven eight nine ten", "six seven eight nine ten more"]);

    let result = contrastive_lexicon(&a, &b, 2, 1, false);
    assert_eq!(result.preferred_by_a.len(), 2);
    assert_eq!(result.preferred_by_b.len(), 2);
    // scored_terms counts everything that survived, not the truncation
    assert!(result.scored_terms > 4);
}

#[test]
fn empty_corpus_a_returns_marker_not_error() {
    let b = docs(&["perfectly fine writing"]);
    let result = contrastive_lexicon(&[], &b, 10, 1, false);

    assert!(result.preferred_by_a.is_empty());
    assert!(result.preferred_by_b.is_empty());
    assert_eq!(result.scored_terms, 0);
    assert!(result.reason.is_some());
}

#[test]
fn empty_corpus_b_returns_marker_not_error() {
    let a = docs(&["perfectly fine writing"]);
    let result = contrastive_lexicon(&a, &[], 10, 1, false);
    assert!(result.reason.is_some());
}

#[test]
fn stop_word_filtering_removes_function_words() {
    let a = docs(&["the whale and the deep sea", "the whale surfaced"]);
    let b = docs(&["the market and the long day", "the market closed"]);

    let with_stop = contrastive_lexicon(&a, &b, 50, 1, false);
    let without_stop = contrastive_lexicon(&a, &b, 50, 1, true);

    assert!(without_stop.scored_terms <= with_stop.scored_terms);
    assert!(!without_stop
        .preferred_by_a
        .iter()
        .any(|(term, _)| term == "the" || term == "and"));
    assert!(without_stop
        .preferred_by_a
        .iter()
        .any(|(term, _)| term == "whale"));
    assert!(without_stop
        .preferred_by_b
        .iter()
        .any(|(term, _)| term == "market"));
}
