// Colored terminal output for drift reports, delta series, verification
// runs, and contrastive lexica.
//
// This module handles all terminal-specific formatting: colors, tables,
// bars. The main.rs display paths delegate here.

use colored::Colorize;

use crate::lexicon::zeta::ContrastiveResult;
use crate::pipeline::scan::AuthorDrift;
use crate::profile::engine::DriftResult;
use crate::verify::impostors::VerificationResult;
use crate::window::delta::RollingDeltaReport;

/// Display a single author's drift check.
pub fn display_drift(author_id: &str, snapshots: usize, result: &DriftResult) {
    println!("\n{}", format!("=== Drift check for {author_id} ===").bold());
    println!("  Snapshots in history: {snapshots}");

    if let Some(reason) = result.reason {
        println!("  Result: {} ({})", "skipped".dimmed(), reason);
        return;
    }

    println!(
        "  Distance: {:.4} (threshold {:.4})",
        result.distance, result.threshold
    );
    println!("  Status: {}", drift_label(result));
}

/// Display the batch scan report, most drifted authors first.
pub fn display_scan_report(report: &[AuthorDrift]) {
    if report.is_empty() {
        println!("No authors recorded yet. Run `graphite record` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Drift Scan ({} authors) ===", report.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:<28} {:>10} {:>10}  {}",
        "Author".dimmed(),
        "Snapshots".dimmed(),
        "Distance".dimmed(),
        "Status".dimmed(),
    );
    println!("  {}", "-".repeat(62).dimmed());

    for entry in report {
        let status = match entry.result.reason {
            Some(reason) => reason.to_string().dimmed().to_string(),
            None => drift_label(&entry.result).to_string(),
        };
        println!(
            "  {:<28} {:>10} {:>10.4}  {}",
            entry.author_id, entry.snapshot_count, entry.result.distance, status
        );
    }

    println!();

    let drifting = report.iter().filter(|e| e.result.drift_detected).count();
    let outliers = report.iter().filter(|e| e.result.is_outlier).count();
    if outliers > 0 {
        println!("  {} {} outlier authors", "!!".red().bold(), outliers);
    }
    if drifting > outliers {
        println!("  {} {} drifting authors", "!".bright_red(), drifting - outliers);
    }
    if drifting == 0 {
        println!("  {} all authors stable", "ok".green());
    }
}

/// Display the rolling-delta series as per-candidate bars.
///
/// Chi-squared distances live in [0, 2], so bars are scaled against 2.0.
pub fn display_delta_report(report: &RollingDeltaReport) {
    println!(
        "\n{}",
        format!(
            "=== Rolling Delta ({} windows of {} tokens, step {}) ===",
            report.window_count, report.window_size, report.step
        )
        .bold()
    );
    println!();

    let bar_width: usize = 20;

    for (author, series) in &report.series {
        let filled = ((series.mean / 2.0) * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled.min(bar_width));
        let bar = format!("[{}{}]", "=".repeat(filled.min(bar_width)), " ".repeat(empty));

        // Closer candidates (low mean distance) read green
        let colored_bar = if series.mean <= 0.6 {
            bar.bright_green()
        } else if series.mean <= 1.2 {
            bar.bright_yellow()
        } else {
            bar.bright_red()
        };

        println!(
            "  {:<24} {} mean {:.3}  volatility {:.3}",
            super::truncate_chars(author, 24).bold(),
            colored_bar,
            series.mean,
            series.volatility
        );
    }
    println!();
}

/// Display a verification run summary.
pub fn display_verification(result: &VerificationResult, seed: u64) {
    println!("\n{}", "=== Authorship Verification ===".bold());
    println!(
        "  Suspect won {} of {} iterations against {} impostors",
        result.suspect_wins, result.iterations, result.impostor_count
    );
    println!("  Confidence: {:.3}", result.confidence);

    let verdict = if result.verified {
        "VERIFIED".green().bold()
    } else {
        "NOT VERIFIED".red().bold()
    };
    println!("  Verdict: {verdict}");
    println!("  {}", format!("(seed {seed} — rerun with --seed {seed} to reproduce)").dimmed());
}

/// Display the contrastive lexicon as two ranked columns.
pub fn display_lexicon(author_a: &str, author_b: &str, result: &ContrastiveResult) {
    println!(
        "\n{}",
        format!("=== Contrastive Lexicon: {author_a} vs {author_b} ===").bold()
    );

    if let Some(reason) = &result.reason {
        println!("  Result: {} ({})", "skipped".dimmed(), reason);
        return;
    }

    println!("  {} discriminating terms scored", result.scored_terms);
    println!();

    println!("  {}", format!("Preferred by {author_a}:").bold());
    display_term_column(&result.preferred_by_a);

    println!("  {}", format!("Preferred by {author_b}:").bold());
    display_term_column(&result.preferred_by_b);
}

fn display_term_column(terms: &[(String, f64)]) {
    if terms.is_empty() {
        println!("    (none)");
        println!();
        return;
    }
    for (i, (term, score)) in terms.iter().enumerate() {
        println!(
            "    {:>2}. {:<24} {:.3}",
            i + 1,
            super::truncate_chars(term, 24),
            score
        );
    }
    println!();
}

fn drift_label(result: &DriftResult) -> colored::ColoredString {
    if result.is_outlier {
        "OUTLIER".red().bold()
    } else if result.drift_detected {
        "DRIFT".bright_red()
    } else {
        "stable".green()
    }
}
