// Batch drift scan: check every author in the store for recent drift.
//
// Fetches each author's history and compares their newest snapshot
// against the decay-weighted composite of everything before it. Histories
// are fetched concurrently (different authors are independent), results
// are re-sorted deterministically after the unordered join, and a failure
// for one author is logged and skipped so the rest of the batch completes.

use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::profile::engine::{self, DriftResult};
use crate::store::ProfileStore;

/// One author's recent-drift outcome within a batch scan.
#[derive(Debug, Clone)]
pub struct AuthorDrift {
    pub author_id: String,
    pub snapshot_count: usize,
    pub result: DriftResult,
}

/// Run the batch drift scan across all authors in the store.
///
/// Returns results sorted by distance descending (ties by author id) so
/// the most suspicious authors lead the report regardless of completion
/// order.
pub async fn run(
    store: &Arc<dyn ProfileStore>,
    threshold: f64,
    decay_factor: f64,
    concurrency: usize,
) -> Result<Vec<AuthorDrift>> {
    anyhow::ensure!(
        decay_factor > 0.0 && decay_factor <= 1.0,
        "decay factor must be in (0, 1], got {decay_factor}"
    );
    anyhow::ensure!(threshold >= 0.0, "drift threshold must be >= 0, got {threshold}");
    let concurrency = concurrency.max(1);

    let authors = store.list_authors().await?;
    if authors.is_empty() {
        return Ok(Vec::new());
    }

    info!(authors = authors.len(), concurrency, "Starting batch drift scan");

    let results: Vec<(String, Result<AuthorDrift>)> =
        stream::iter(authors.into_iter().map(|author_id| {
            let store = Arc::clone(store);
            async move {
                let outcome = scan_author(&*store, &author_id, threshold, decay_factor).await;
                (author_id, outcome)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let pb = ProgressBar::new(results.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Scan [{bar:30}] {pos}/{len}")
            .unwrap(),
    );

    let mut report = Vec::new();
    for (author_id, outcome) in results {
        match outcome {
            Ok(drift) => report.push(drift),
            Err(e) => {
                warn!(author = author_id, error = %e, "Failed to scan author, skipping");
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    report.sort_by(|a, b| {
        b.result
            .distance
            .partial_cmp(&a.result.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.author_id.cmp(&b.author_id))
    });

    Ok(report)
}

async fn scan_author(
    store: &dyn ProfileStore,
    author_id: &str,
    threshold: f64,
    decay_factor: f64,
) -> Result<AuthorDrift> {
    let history = store.get_snapshots(author_id).await?;
    let result = engine::detect_recent_drift_in(&history, threshold, decay_factor)?;
    Ok(AuthorDrift {
        author_id: author_id.to_string(),
        snapshot_count: history.len(),
        result,
    })
}
