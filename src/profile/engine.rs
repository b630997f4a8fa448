// Adaptive profile engine — the drift detector at the heart of graphite.
//
// An author's history is an append-only sequence of fingerprint snapshots.
// The composite "who this author is" profile is a decay-weighted average of
// that history: the newest snapshot always has weight 1, and each older
// snapshot is discounted by another factor of `decay_factor`. Drift is a
// cosine-distance comparison of a new fingerprint against that composite.
//
// Everything here is a pure function over in-memory data except
// `detect_recent_drift`, which reads one author's history from the store.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::profile::fingerprint::FingerprintVector;
use crate::store::models::ProfileSnapshot;
use crate::store::traits::ProfileStore;

/// Decay factor used by `detect_recent_drift` when the caller doesn't
/// supply one. Halves the influence of each step back into the past.
pub const DEFAULT_DECAY_FACTOR: f64 = 0.5;

/// Why a drift comparison was answered without computing a distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftReason {
    /// No prior snapshots to compare against.
    NoHistory,
    /// One side of the comparison was all-zero; the angle is undefined.
    DegenerateVector,
}

impl DriftReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftReason::NoHistory => "no history",
            DriftReason::DegenerateVector => "degenerate vector",
        }
    }
}

impl std::fmt::Display for DriftReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of comparing a new fingerprint against an author's composite
/// profile. Ephemeral — never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftResult {
    /// Cosine distance from the composite profile (0 = identical style).
    pub distance: f64,
    /// Distance exceeded the caller's threshold.
    pub drift_detected: bool,
    /// Distance exceeded the stricter 1.5x band on top of the threshold.
    pub is_outlier: bool,
    /// The threshold the comparison was made against.
    pub threshold: f64,
    /// Set when the comparison was short-circuited (no history or a
    /// degenerate vector); `distance` is 0.0 and no drift is reported.
    pub reason: Option<DriftReason>,
}

impl DriftResult {
    fn skipped(threshold: f64, reason: DriftReason) -> Self {
        Self {
            distance: 0.0,
            drift_detected: false,
            is_outlier: false,
            threshold,
            reason: Some(reason),
        }
    }
}

/// Compute the decay-weighted composite profile over a snapshot history.
///
/// `history` is ordered oldest -> newest (the store's order). The i-th
/// most recent snapshot gets weight `decay_factor^i`, so the newest always
/// weighs 1.0. Every signal shares the same denominator (the total weight
/// across all snapshots), which keeps signals comparable even when some
/// snapshots don't define them.
///
/// At `decay_factor = 1.0` this is the plain arithmetic mean; as the
/// factor approaches 0 it converges to the newest snapshot alone.
pub fn compute_weighted_profile(
    history: &[ProfileSnapshot],
    decay_factor: f64,
) -> Result<FingerprintVector, AnalysisError> {
    validate_decay(decay_factor)?;

    let mut profile = FingerprintVector::new();
    if history.is_empty() {
        return Ok(profile);
    }

    let mut total_weight = 0.0;
    for (i, snapshot) in history.iter().rev().enumerate() {
        let weight = decay_factor.powi(i as i32);
        total_weight += weight;
        for (name, value) in &snapshot.vector.signals {
            *profile.signals.entry(name.clone()).or_insert(0.0) += weight * value;
        }
    }

    for value in profile.signals.values_mut() {
        *value /= total_weight;
    }

    debug!(
        snapshots = history.len(),
        signals = profile.len(),
        decay = decay_factor,
        "Computed weighted profile"
    );

    Ok(profile)
}

/// Compare a new fingerprint against the composite profile of a history.
///
/// Short-circuits (no drift, distance 0, reason set) when the history is
/// empty or either aligned vector is all-zero. Otherwise reports the
/// cosine distance, with `drift_detected` above `threshold` and
/// `is_outlier` above the stricter `threshold * 1.5` band.
pub fn detect_drift(
    new_vector: &FingerprintVector,
    history: &[ProfileSnapshot],
    threshold: f64,
    decay_factor: f64,
) -> Result<DriftResult, AnalysisError> {
    validate_threshold(threshold)?;

    if history.is_empty() {
        return Ok(DriftResult::skipped(threshold, DriftReason::NoHistory));
    }

    let profile = compute_weighted_profile(history, decay_factor)?;

    let distance = match new_vector.cosine_distance(&profile) {
        Some(d) => d,
        None => {
            return Ok(DriftResult::skipped(threshold, DriftReason::DegenerateVector));
        }
    };

    let drift_detected = distance > threshold;
    let is_outlier = distance > threshold * 1.5;

    info!(
        distance = format!("{distance:.4}"),
        threshold,
        drift = drift_detected,
        outlier = is_outlier,
        "Drift comparison"
    );

    Ok(DriftResult {
        distance,
        drift_detected,
        is_outlier,
        threshold,
        reason: None,
    })
}

/// Recent-drift check over an in-memory history: the newest snapshot is
/// treated as "new" and compared against the composite of everything
/// before it. Fewer than 2 snapshots means there is no baseline yet.
pub fn detect_recent_drift_in(
    history: &[ProfileSnapshot],
    threshold: f64,
    decay_factor: f64,
) -> Result<DriftResult, AnalysisError> {
    validate_threshold(threshold)?;

    if history.len() < 2 {
        return Ok(DriftResult::skipped(threshold, DriftReason::NoHistory));
    }

    let (older, newest) = history.split_at(history.len() - 1);
    detect_drift(&newest[0].vector, older, threshold, decay_factor)
}

/// Convenience operation: fetch an author's full history from the store
/// and run the recent-drift check with the fixed internal decay factor.
///
/// Returns `(is_drifting, distance)`; `(false, 0.0)` when the author has
/// fewer than 2 snapshots.
pub async fn detect_recent_drift(
    store: &dyn ProfileStore,
    author_id: &str,
    threshold: f64,
) -> Result<(bool, f64), AnalysisError> {
    let history = store.get_snapshots(author_id).await?;
    let result = detect_recent_drift_in(&history, threshold, DEFAULT_DECAY_FACTOR)?;
    Ok((result.drift_detected, result.distance))
}

fn validate_decay(decay_factor: f64) -> Result<(), AnalysisError> {
    if !(decay_factor > 0.0 && decay_factor <= 1.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "decay factor must be in (0, 1], got {decay_factor}"
        )));
    }
    Ok(())
}

fn validate_threshold(threshold: f64) -> Result<(), AnalysisError> {
    if !(threshold >= 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "drift threshold must be >= 0, got {threshold}"
        )));
    }
    Ok(())
}
