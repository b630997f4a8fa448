// Zeta scores — document-presence discrimination between two corpora.
//
// For each term, zeta = (share of author A's documents containing it) -
// (share of author B's documents containing it). A term at +1.0 appears
// in every A document and no B document; -1.0 is the mirror image. The
// contrastive lexicon ranks terms by |zeta| and splits them into the two
// authors' preference lists.
//
// Presence is per document, not frequency — a term used fifty times in
// one essay counts once. Rare terms are excluded via a minimum combined
// occurrence count so single-use oddities don't dominate the ranking.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};
use tracing::info;

use crate::window::segment::tokenize;

/// Ranked discrimination lists between two authors' corpora.
///
/// Scores in both lists are reported as positive magnitudes; which list a
/// term lands in carries the sign. When either corpus is empty the lists
/// are empty and `reason` says why — an empty-result marker rather than a
/// hard error, so report pipelines can render it and move on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContrastiveResult {
    /// Terms favored by author A (zeta > 0), strongest first.
    pub preferred_by_a: Vec<(String, f64)>,
    /// Terms favored by author B (zeta < 0, reported as |zeta|), strongest first.
    pub preferred_by_b: Vec<(String, f64)>,
    /// Number of terms that survived the occurrence filter and scored nonzero.
    pub scored_terms: usize,
    /// Set when the analysis was skipped (empty corpus on either side).
    pub reason: Option<String>,
}

impl ContrastiveResult {
    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            preferred_by_a: Vec::new(),
            preferred_by_b: Vec::new(),
            scored_terms: 0,
            reason: Some(reason.into()),
        }
    }
}

/// Compute zeta scores for every term in the union vocabulary.
///
/// Terms whose combined raw occurrence count across both corpora is below
/// `min_occurrences` are excluded. Returned map is ordered by term for
/// deterministic iteration; scores are in [-1, 1].
pub fn compute_zeta_scores(
    docs_a: &[String],
    docs_b: &[String],
    min_occurrences: usize,
) -> BTreeMap<String, f64> {
    // Token sets (presence) and raw counts (for the frequency filter).
    let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
    let mut presence_a: BTreeMap<String, usize> = BTreeMap::new();
    let mut presence_b: BTreeMap<String, usize> = BTreeMap::new();

    for doc in docs_a {
        let tokens = tokenize(doc);
        for token in &tokens {
            *occurrences.entry(token.clone()).or_insert(0) += 1;
        }
        let unique: HashSet<String> = tokens.into_iter().collect();
        for token in unique {
            *presence_a.entry(token).or_insert(0) += 1;
        }
    }
    for doc in docs_b {
        let tokens = tokenize(doc);
        for token in &tokens {
            *occurrences.entry(token.clone()).or_insert(0) += 1;
        }
        let unique: HashSet<String> = tokens.into_iter().collect();
        for token in unique {
            *presence_b.entry(token).or_insert(0) += 1;
        }
    }

    let len_a = docs_a.len() as f64;
    let len_b = docs_b.len() as f64;

    occurrences
        .into_iter()
        .filter(|(_, count)| *count >= min_occurrences)
        .map(|(term, _)| {
            let prop_a = if len_a > 0.0 {
                presence_a.get(&term).copied().unwrap_or(0) as f64 / len_a
            } else {
                0.0
            };
            let prop_b = if len_b > 0.0 {
                presence_b.get(&term).copied().unwrap_or(0) as f64 / len_b
            } else {
                0.0
            };
            (term, prop_a - prop_b)
        })
        .collect()
}

/// Build the two ranked preference lists for a pair of authors.
///
/// Sorts surviving terms by |zeta| descending (ties broken by term so the
/// output is stable), splits by sign, and truncates each list to `top_n`.
/// `filter_stop_words` drops common English function words before scoring
/// — useful when the interesting contrast is topical rather than
/// grammatical.
pub fn contrastive_lexicon(
    docs_a: &[String],
    docs_b: &[String],
    top_n: usize,
    min_occurrences: usize,
    filter_stop_words: bool,
) -> ContrastiveResult {
    if docs_a.is_empty() {
        return ContrastiveResult::skipped("corpus A is empty — nothing to contrast");
    }
    if docs_b.is_empty() {
        return ContrastiveResult::skipped("corpus B is empty — nothing to contrast");
    }

    let mut scores = compute_zeta_scores(docs_a, docs_b, min_occurrences);

    if filter_stop_words {
        let stop: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        scores.retain(|term, _| !stop.contains(term));
    }

    let mut ranked: Vec<(String, f64)> = scores
        .into_iter()
        .filter(|(_, zeta)| *zeta != 0.0)
        .collect();
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let scored_terms = ranked.len();

    let preferred_by_a: Vec<(String, f64)> = ranked
        .iter()
        .filter(|(_, zeta)| *zeta > 0.0)
        .take(top_n)
        .map(|(term, zeta)| (term.clone(), *zeta))
        .collect();

    let preferred_by_b: Vec<(String, f64)> = ranked
        .iter()
        .filter(|(_, zeta)| *zeta < 0.0)
        .take(top_n)
        .map(|(term, zeta)| (term.clone(), zeta.abs()))
        .collect();

    info!(
        scored_terms,
        a_terms = preferred_by_a.len(),
        b_terms = preferred_by_b.len(),
        "Contrastive lexicon built"
    );

    ContrastiveResult {
        preferred_by_a,
        preferred_by_b,
        scored_terms,
        reason: None,
    }
}
