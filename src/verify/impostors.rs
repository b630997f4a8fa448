// Impostors method — randomized bootstrap authorship verification.
//
// The question: is the suspect's writing closer to the target document
// than a pool of stylistically plausible impostors? Each bootstrap
// iteration samples a random subset of the union vocabulary and asks
// whether the suspect beats every impostor on that subset. The fraction
// of iterations the suspect wins is the confidence score.
//
// Randomness comes from a caller-supplied RNG so test runs and forensic
// reports are reproducible given the same seed.

use std::collections::{BTreeSet, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AnalysisError;

/// Term -> raw occurrence count for one author's writing sample.
pub type Vocabulary = HashMap<String, u64>;

/// Outcome of a bootstrap verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Fraction of iterations the suspect beat every impostor, in [0,1].
    pub confidence: f64,
    /// True iff confidence >= 0.5.
    pub verified: bool,
    /// Iterations where the suspect was strictly closest to the target.
    pub suspect_wins: u32,
    pub iterations: u32,
    pub impostor_count: usize,
}

/// Run the impostors bootstrap.
///
/// Per iteration: draw `subset_size` terms without replacement from the
/// union vocabulary of target, suspect, and all impostors; compute the
/// Euclidean distance between total-count-normalized term frequencies,
/// restricted to the subset, from the target to the suspect and to each
/// impostor. The suspect wins the iteration only when its distance is
/// strictly below every impostor's.
///
/// `subset_size` is clamped to the union vocabulary size when the union
/// is smaller — the one documented clamp in this engine; everything else
/// fails fast.
pub fn verify_authorship<R: Rng>(
    target: &Vocabulary,
    suspect: &Vocabulary,
    impostors: &[Vocabulary],
    iterations: u32,
    subset_size: usize,
    rng: &mut R,
) -> Result<VerificationResult, AnalysisError> {
    if impostors.is_empty() {
        return Err(AnalysisError::InsufficientCandidates(
            "impostor pool is empty — verification needs at least one impostor".to_string(),
        ));
    }
    if iterations == 0 {
        return Err(AnalysisError::InvalidParameter(
            "iterations must be a positive integer".to_string(),
        ));
    }
    if subset_size == 0 {
        return Err(AnalysisError::InvalidParameter(
            "subset size must be a positive integer".to_string(),
        ));
    }

    // Sorted union vocabulary so subset sampling is deterministic for a
    // given RNG state regardless of map iteration order.
    let union: Vec<&String> = {
        let mut set: BTreeSet<&String> = BTreeSet::new();
        set.extend(target.keys());
        set.extend(suspect.keys());
        for impostor in impostors {
            set.extend(impostor.keys());
        }
        set.into_iter().collect()
    };

    if union.is_empty() {
        return Err(AnalysisError::InsufficientCandidates(
            "union vocabulary is empty — nothing to sample".to_string(),
        ));
    }

    let subset_size = subset_size.min(union.len());

    let target_total = total_count(target);
    let suspect_total = total_count(suspect);
    let impostor_totals: Vec<f64> = impostors.iter().map(total_count).collect();

    let mut suspect_wins = 0u32;
    for iteration in 0..iterations {
        let subset = rand::seq::index::sample(rng, union.len(), subset_size);

        let suspect_distance =
            subset_distance(target, target_total, suspect, suspect_total, &union, &subset);

        let best_impostor = impostors
            .iter()
            .zip(&impostor_totals)
            .map(|(impostor, total)| {
                subset_distance(target, target_total, impostor, *total, &union, &subset)
            })
            .fold(f64::INFINITY, f64::min);

        if suspect_distance < best_impostor {
            suspect_wins += 1;
        }

        debug!(
            iteration,
            suspect_distance = format!("{suspect_distance:.4}"),
            best_impostor = format!("{best_impostor:.4}"),
            "Bootstrap iteration"
        );
    }

    let confidence = f64::from(suspect_wins) / f64::from(iterations);
    let result = VerificationResult {
        confidence,
        verified: confidence >= 0.5,
        suspect_wins,
        iterations,
        impostor_count: impostors.len(),
    };

    info!(
        confidence = format!("{confidence:.3}"),
        verified = result.verified,
        wins = suspect_wins,
        iterations,
        impostors = impostors.len(),
        "Authorship verification complete"
    );

    Ok(result)
}

/// Seeded convenience wrapper — same inputs + same seed, same result.
pub fn verify_authorship_seeded(
    target: &Vocabulary,
    suspect: &Vocabulary,
    impostors: &[Vocabulary],
    iterations: u32,
    subset_size: usize,
    seed: u64,
) -> Result<VerificationResult, AnalysisError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    verify_authorship(target, suspect, impostors, iterations, subset_size, &mut rng)
}

fn total_count(vocabulary: &Vocabulary) -> f64 {
    vocabulary.values().map(|c| *c as f64).sum()
}

/// Euclidean distance between two normalized term-frequency vectors,
/// restricted to the sampled subset of the union vocabulary.
fn subset_distance(
    a: &Vocabulary,
    a_total: f64,
    b: &Vocabulary,
    b_total: f64,
    union: &[&String],
    subset: &rand::seq::index::IndexVec,
) -> f64 {
    let mut sum = 0.0;
    for idx in subset.iter() {
        let term = union[idx];
        let fa = normalized(a, term, a_total);
        let fb = normalized(b, term, b_total);
        sum += (fa - fb) * (fa - fb);
    }
    sum.sqrt()
}

fn normalized(vocabulary: &Vocabulary, term: &str, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    vocabulary.get(term).copied().unwrap_or(0) as f64 / total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(pairs: &[(&str, u64)]) -> Vocabulary {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_impostor_pool_rejected() {
        let target = vocab(&[("alpha", 3)]);
        let suspect = vocab(&[("alpha", 2)]);
        let result = verify_authorship_seeded(&target, &suspect, &[], 10, 5, 42);
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientCandidates(_))
        ));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let target = vocab(&[("alpha", 3)]);
        let impostors = vec![vocab(&[("beta", 3)])];
        let result = verify_authorship_seeded(&target, &target, &impostors, 0, 5, 42);
        assert!(matches!(result, Err(AnalysisError::InvalidParameter(_))));
    }

    #[test]
    fn test_identical_suspect_wins_against_distant_impostors() {
        let target = vocab(&[("alpha", 10), ("beta", 6), ("gamma", 4)]);
        let suspect = target.clone();
        let impostors = vec![
            vocab(&[("delta", 10), ("epsilon", 5)]),
            vocab(&[("zeta", 8), ("eta", 8)]),
        ];

        let result =
            verify_authorship_seeded(&target, &suspect, &impostors, 100, 4, 42).unwrap();
        assert!(result.verified);
        assert!(
            result.confidence > 0.9,
            "identical suspect should dominate, got {}",
            result.confidence
        );
    }

    #[test]
    fn test_confidence_stays_in_unit_interval() {
        let target = vocab(&[("alpha", 5), ("beta", 5)]);
        let suspect = vocab(&[("alpha", 2), ("gamma", 8)]);
        let impostors = vec![vocab(&[("alpha", 4), ("beta", 6)])];

        let result =
            verify_authorship_seeded(&target, &suspect, &impostors, 50, 3, 7).unwrap();
        assert!((0.0..=1.0).contains(&result.confidence));
        assert_eq!(result.verified, result.confidence >= 0.5);
        assert_eq!(result.iterations, 50);
        assert_eq!(result.impostor_count, 1);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let target = vocab(&[("alpha", 9), ("beta", 3), ("gamma", 2), ("delta", 1)]);
        let suspect = vocab(&[("alpha", 7), ("beta", 4), ("epsilon", 2)]);
        let impostors = vec![
            vocab(&[("alpha", 2), ("zeta", 9)]),
            vocab(&[("beta", 5), ("eta", 5)]),
        ];

        let a = verify_authorship_seeded(&target, &suspect, &impostors, 200, 3, 99).unwrap();
        let b = verify_authorship_seeded(&target, &suspect, &impostors, 200, 3, 99).unwrap();
        assert_eq!(a.suspect_wins, b.suspect_wins);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_subset_size_clamped_to_union() {
        let target = vocab(&[("alpha", 1)]);
        let suspect = vocab(&[("beta", 1)]);
        let impostors = vec![vocab(&[("gamma", 1)])];

        // Union has 3 terms; asking for 50 must clamp, not fail.
        let result =
            verify_authorship_seeded(&target, &suspect, &impostors, 10, 50, 1).unwrap();
        assert_eq!(result.iterations, 10);
    }

    #[test]
    fn test_all_empty_vocabularies_rejected() {
        let empty = Vocabulary::new();
        let impostors = vec![Vocabulary::new()];
        let result = verify_authorship_seeded(&empty, &empty, &impostors, 10, 5, 1);
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientCandidates(_))
        ));
    }
}
