// FingerprintVector — the numeric representation of how someone writes.
//
// A fingerprint is a finite map from stylistic signal names to real-valued
// weights. The vectors are produced by an external feature extractor and
// arrive here as opaque numbers; weights may be negative, and a signal
// absent from one vector counts as 0.0 when two vectors are compared.

use std::collections::BTreeMap;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// A stylistic fingerprint for one piece of writing (or a composite of many).
///
/// Signals are kept in a BTreeMap so iteration, display, and serialization
/// are deterministic for the same content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerprintVector {
    /// Signal name -> weight
    pub signals: BTreeMap<String, f64>,
}

impl FingerprintVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from (signal, weight) pairs. Later duplicates win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            signals: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Weight for a signal, treating absent signals as 0.0.
    pub fn signal(&self, name: &str) -> f64 {
        self.signals.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: impl Into<String>, weight: f64) {
        self.signals.insert(name.into(), weight);
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// True when every weight is exactly zero (or there are no signals).
    /// Such a vector has no direction and cannot be compared by angle.
    pub fn is_all_zero(&self) -> bool {
        self.signals.values().all(|w| *w == 0.0)
    }

    /// Cosine distance `1 - (u.v)/(|u||v|)` between two vectors aligned
    /// over the union of their signal names (missing = 0.0).
    ///
    /// Returns `None` when either aligned vector is all-zero — the angle
    /// is undefined and the caller decides how to recover.
    pub fn cosine_distance(&self, other: &FingerprintVector) -> Option<f64> {
        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;

        for name in self.signals.keys().chain(other.signals.keys()) {
            let a = self.signal(name);
            let b = other.signal(name);
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        if norm_a == 0.0 || norm_b == 0.0 {
            return None;
        }

        Some(1.0 - dot / (norm_a.sqrt() * norm_b.sqrt()))
    }

    /// Display the fingerprint as a formatted bar chart in the terminal.
    ///
    /// Weights can be negative, so bars are scaled against the largest
    /// absolute weight rather than assuming a 0..1 range.
    pub fn display(&self, title: &str) {
        println!("\n{}", format!("=== {title} ({} signals) ===", self.len()).bold());
        println!();

        if self.is_empty() {
            println!("  (empty fingerprint)");
            return;
        }

        let bar_width: usize = 20;
        let max_abs = self
            .signals
            .values()
            .fold(0.0_f64, |acc, w| acc.max(w.abs()))
            .max(f64::MIN_POSITIVE);

        for (name, weight) in &self.signals {
            let filled = ((weight.abs() / max_abs) * bar_width as f64).round() as usize;
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

            let colored_bar = if *weight < 0.0 {
                bar.bright_red()
            } else if weight.abs() >= 0.5 * max_abs {
                bar.bright_green()
            } else {
                bar.bright_blue()
            };

            println!("  {:<28} {} {:+.3}", name.bold(), colored_bar, weight);
        }
        println!();
    }
}
