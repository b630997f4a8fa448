// Rolling delta — per-window stylistic distance against candidate authors.
//
// Slides a window across the target document and, for each window,
// computes a chi-squared word-frequency divergence against each
// candidate's reference text. A candidate whose style genuinely matches
// the target produces a flatter, lower series; the standard deviation of
// each series (volatility) measures how consistent that relationship is
// across the document.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AnalysisError;
use crate::window::segment::{generate_windows, tokenize};

/// Distance series for one candidate across all windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSeries {
    /// (window start token index, distance), in window order.
    pub points: Vec<(usize, f64)>,
    /// Mean distance across windows.
    pub mean: f64,
    /// Standard deviation of the distances — low volatility means the
    /// candidate's relationship to the target is stable document-wide.
    pub volatility: f64,
}

/// Full rolling-delta report: one series per candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingDeltaReport {
    /// Candidate author -> series, keyed deterministically.
    pub series: BTreeMap<String, WindowSeries>,
    pub window_count: usize,
    pub window_size: usize,
    pub step: usize,
}

/// Relative word frequencies of a text (counts divided by total tokens).
fn relative_frequencies(tokens: &[String]) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f64;
    if total > 0.0 {
        for value in counts.values_mut() {
            *value /= total;
        }
    }
    counts
}

/// Chi-squared divergence between two relative-frequency distributions,
/// summed over the union of their vocabularies:
///
///   sum over terms of (f_a - f_b)^2 / (f_a + f_b)
///
/// Identical distributions score 0; fully disjoint vocabularies score 2.
pub fn chi_squared_distance(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let mut distance = 0.0;
    for (term, fa) in a {
        let fb = b.get(term).copied().unwrap_or(0.0);
        let denom = fa + fb;
        if denom > 0.0 {
            distance += (fa - fb) * (fa - fb) / denom;
        }
    }
    // Terms only in b contribute (0 - f_b)^2 / f_b = f_b.
    for (term, fb) in b {
        if !a.contains_key(term) {
            distance += *fb;
        }
    }
    distance
}

/// Slide a window across `target_text` and measure the chi-squared
/// distance from each window to every candidate's reference text.
///
/// Windows are processed in document order and each candidate's series
/// preserves that order, so the same inputs always produce the same
/// report. Fails fast on an empty candidate map or non-positive window
/// parameters.
pub fn analyze_rolling_delta(
    target_text: &str,
    candidates: &BTreeMap<String, String>,
    window_size: usize,
    step: usize,
) -> Result<RollingDeltaReport, AnalysisError> {
    if candidates.is_empty() {
        return Err(AnalysisError::InsufficientCandidates(
            "rolling delta needs at least one candidate reference text".to_string(),
        ));
    }

    // Reference profiles are fixed across windows — compute them once.
    let reference_profiles: BTreeMap<&String, HashMap<String, f64>> = candidates
        .iter()
        .map(|(author, text)| (author, relative_frequencies(&tokenize(text))))
        .collect();

    let mut raw_series: BTreeMap<String, Vec<(usize, f64)>> = candidates
        .keys()
        .map(|author| (author.clone(), Vec::new()))
        .collect();

    let mut window_count = 0;
    for (start, window_text) in generate_windows(target_text, window_size, step)? {
        let window_profile = relative_frequencies(&tokenize(&window_text));
        for (author, reference) in &reference_profiles {
            let distance = chi_squared_distance(&window_profile, reference);
            raw_series
                .get_mut(*author)
                .expect("series pre-seeded for every candidate")
                .push((start, distance));
        }
        window_count += 1;
    }

    let series = raw_series
        .into_iter()
        .map(|(author, points)| {
            let (mean, volatility) = mean_and_std_dev(&points);
            (author, WindowSeries { points, mean, volatility })
        })
        .collect();

    info!(
        candidates = candidates.len(),
        windows = window_count,
        window_size,
        step,
        "Rolling delta analysis complete"
    );

    Ok(RollingDeltaReport {
        series,
        window_count,
        window_size,
        step,
    })
}

/// Mean and population standard deviation of a distance series.
fn mean_and_std_dev(points: &[(usize, f64)]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let mean = points.iter().map(|(_, d)| d).sum::<f64>() / n;
    let variance = points.iter().map(|(_, d)| (d - mean) * (d - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
