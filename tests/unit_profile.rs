// Unit tests for the adaptive profile engine.
//
// Exercises the decay-weighted aggregation properties and the drift
// detector's threshold bands, including the reference scenarios: the
// trust = [0.9, 0.7, 0.5] weighted average and the consistent-vs-outlier
// drift comparison at threshold 0.1.

use chrono::{Duration, TimeZone, Utc};

use graphite::error::AnalysisError;
use graphite::profile::engine::{
    compute_weighted_profile, detect_drift, detect_recent_drift_in, DriftReason,
};
use graphite::profile::fingerprint::FingerprintVector;
use graphite::store::models::ProfileSnapshot;

fn snapshot(offset_mins: i64, pairs: &[(&str, f64)]) -> ProfileSnapshot {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    ProfileSnapshot {
        author_id: "ada".to_string(),
        vector: FingerprintVector::from_pairs(pairs.iter().map(|(k, v)| (*k, *v))),
        recorded_at: base + Duration::minutes(offset_mins),
    }
}

// ============================================================
// compute_weighted_profile — aggregation properties
// ============================================================

#[test]
fn identical_snapshots_are_a_fixed_point() {
    // N copies of the same vector must come back exactly, at any decay.
    for decay in [0.1, 0.5, 0.9, 1.0] {
        let history: Vec<ProfileSnapshot> = (0..5)
            .map(|i| snapshot(i * 10, &[("anger", 0.34), ("trust", 0.78)]))
            .collect();
        let profile = compute_weighted_profile(&history, decay).unwrap();
        assert!((profile.signal("anger") - 0.34).abs() < 1e-12, "decay {decay}");
        assert!((profile.signal("trust") - 0.78).abs() < 1e-12, "decay {decay}");
    }
}

#[test]
fn decay_near_one_converges_to_the_unweighted_mean() {
    let values = [0.2, 0.4, 0.9, 0.3, 0.7];
    let history: Vec<ProfileSnapshot> = values
        .iter()
        .enumerate()
        .map(|(i, v)| snapshot(i as i64 * 10, &[("trust", *v)]))
        .collect();
    let exact_mean = values.iter().sum::<f64>() / values.len() as f64;

    let at_99 = compute_weighted_profile(&history, 0.99).unwrap().signal("trust");
    let at_999 = compute_weighted_profile(&history, 0.999).unwrap().signal("trust");
    let at_one = compute_weighted_profile(&history, 1.0).unwrap().signal("trust");

    assert!((at_one - exact_mean).abs() < 1e-12);
    assert!((at_999 - exact_mean).abs() < 1e-3);
    assert!((at_99 - exact_mean).abs() < 1e-2);
    // Monotone approach: 0.999 is closer to the mean than 0.99
    assert!((at_999 - exact_mean).abs() <= (at_99 - exact_mean).abs());
}

#[test]
fn decay_near_zero_converges_to_the_newest_snapshot() {
    let history = vec![
        snapshot(0, &[("trust", 0.1)]),
        snapshot(10, &[("trust", 0.2)]),
        snapshot(20, &[("trust", 0.95)]),
    ];
    let profile = compute_weighted_profile(&history, 0.0001).unwrap();
    assert!((profile.signal("trust") - 0.95).abs() < 1e-3);
}

#[test]
fn reference_weighted_trust_scenario() {
    // Newest-first [0.9, 0.7, 0.5] at decay 0.5:
    // (0.9*1 + 0.7*0.5 + 0.5*0.25) / 1.75 = 0.7857...
    let history = vec![
        snapshot(0, &[("trust", 0.5)]),
        snapshot(10, &[("trust", 0.7)]),
        snapshot(20, &[("trust", 0.9)]),
    ];
    let profile = compute_weighted_profile(&history, 0.5).unwrap();
    assert!(
        (profile.signal("trust") - 0.786).abs() < 1e-3,
        "got {}",
        profile.signal("trust")
    );
}

#[test]
fn empty_history_gives_empty_profile() {
    let profile = compute_weighted_profile(&[], 0.5).unwrap();
    assert!(profile.is_empty());
}

#[test]
fn decay_factor_range_is_enforced() {
    let history = vec![snapshot(0, &[("trust", 0.5)])];
    for bad in [0.0, -0.5, 1.5, f64::NAN] {
        assert!(
            matches!(
                compute_weighted_profile(&history, bad),
                Err(AnalysisError::InvalidParameter(_))
            ),
            "decay {bad} should be rejected"
        );
    }
}

// ============================================================
// detect_drift — threshold bands and degenerate cases
// ============================================================

#[test]
fn consistent_vector_is_not_drift() {
    // History averaging to roughly {anger: 0.34, trust: 0.78}
    let history: Vec<ProfileSnapshot> = (0..3)
        .map(|i| snapshot(i * 10, &[("anger", 0.34), ("trust", 0.78)]))
        .collect();
    let consistent = FingerprintVector::from_pairs([("anger", 0.25), ("trust", 0.85)]);

    let result = detect_drift(&consistent, &history, 0.1, 0.5).unwrap();
    assert!(!result.drift_detected, "distance {}", result.distance);
    assert!(!result.is_outlier);
    assert!(result.reason.is_none());
}

#[test]
fn outlier_vector_is_drift_and_outlier() {
    let history: Vec<ProfileSnapshot> = (0..3)
        .map(|i| snapshot(i * 10, &[("anger", 0.34), ("trust", 0.78)]))
        .collect();
    let outlier = FingerprintVector::from_pairs([("anger", 0.9), ("trust", 0.1)]);

    let result = detect_drift(&outlier, &history, 0.1, 0.5).unwrap();
    assert!(result.drift_detected, "distance {}", result.distance);
    assert!(result.is_outlier, "distance {}", result.distance);
}

#[test]
fn drift_against_own_weighted_profile_is_zero() {
    let history = vec![
        snapshot(0, &[("anger", 0.2), ("trust", 0.6)]),
        snapshot(10, &[("anger", 0.4), ("trust", 0.9)]),
    ];
    let own_profile = compute_weighted_profile(&history, 0.5).unwrap();

    let result = detect_drift(&own_profile, &history, 0.1, 0.5).unwrap();
    assert!(result.distance.abs() < 1e-9, "distance {}", result.distance);
    assert!(!result.drift_detected);
}

#[test]
fn no_history_reports_reason_not_drift() {
    let v = FingerprintVector::from_pairs([("trust", 0.5)]);
    let result = detect_drift(&v, &[], 0.1, 0.5).unwrap();
    assert_eq!(result.distance, 0.0);
    assert!(!result.drift_detected);
    assert_eq!(result.reason, Some(DriftReason::NoHistory));
}

#[test]
fn all_zero_new_vector_reports_degenerate() {
    let history = vec![snapshot(0, &[("trust", 0.5)])];
    let zero = FingerprintVector::from_pairs([("trust", 0.0), ("anger", 0.0)]);
    let result = detect_drift(&zero, &history, 0.1, 0.5).unwrap();
    assert_eq!(result.reason, Some(DriftReason::DegenerateVector));
    assert!(!result.drift_detected);
}

#[test]
fn all_zero_history_reports_degenerate() {
    let history = vec![snapshot(0, &[("trust", 0.0)])];
    let v = FingerprintVector::from_pairs([("trust", 0.8)]);
    let result = detect_drift(&v, &history, 0.1, 0.5).unwrap();
    assert_eq!(result.reason, Some(DriftReason::DegenerateVector));
}

#[test]
fn negative_threshold_is_rejected() {
    let v = FingerprintVector::from_pairs([("trust", 0.5)]);
    assert!(matches!(
        detect_drift(&v, &[], -0.01, 0.5),
        Err(AnalysisError::InvalidParameter(_))
    ));
}

#[test]
fn is_outlier_band_sits_at_one_and_a_half_thresholds() {
    // Orthogonal signals give distance exactly 1.0; pick thresholds on
    // either side of the 1.5x band.
    let history = vec![snapshot(0, &[("trust", 1.0)])];
    let v = FingerprintVector::from_pairs([("anger", 1.0)]);

    let wide = detect_drift(&v, &history, 0.8, 0.5).unwrap();
    assert!(wide.drift_detected);
    assert!(!wide.is_outlier); // 1.0 <= 0.8 * 1.5

    let tight = detect_drift(&v, &history, 0.6, 0.5).unwrap();
    assert!(tight.drift_detected);
    assert!(tight.is_outlier); // 1.0 > 0.6 * 1.5
}

// ============================================================
// detect_recent_drift_in — newest vs the rest
// ============================================================

#[test]
fn single_snapshot_cannot_drift() {
    let history = vec![snapshot(0, &[("trust", 0.5)])];
    let result = detect_recent_drift_in(&history, 0.1, 0.5).unwrap();
    assert!(!result.drift_detected);
    assert_eq!(result.distance, 0.0);
    assert_eq!(result.reason, Some(DriftReason::NoHistory));
}

#[test]
fn stable_history_stays_stable() {
    let history: Vec<ProfileSnapshot> = (0..6)
        .map(|i| snapshot(i * 10, &[("anger", 0.3), ("trust", 0.8)]))
        .collect();
    let result = detect_recent_drift_in(&history, 0.1, 0.5).unwrap();
    assert!(!result.drift_detected);
    assert!(result.distance.abs() < 1e-9);
}

#[test]
fn style_break_in_newest_snapshot_is_flagged() {
    let mut history: Vec<ProfileSnapshot> = (0..5)
        .map(|i| snapshot(i * 10, &[("anger", 0.3), ("trust", 0.8)]))
        .collect();
    history.push(snapshot(100, &[("anger", 0.95), ("trust", 0.05)]));

    let result = detect_recent_drift_in(&history, 0.1, 0.5).unwrap();
    assert!(result.drift_detected);
    assert!(result.distance > 0.1);
}
