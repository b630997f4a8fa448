// Profile store trait — backend-agnostic async interface for snapshot
// persistence.
//
// The engine only ever appends snapshots and reads one author's ordered
// history, so the contract stays narrow. All methods are async so a sync
// backend (rusqlite via Mutex) and any future native-async backend fit
// behind a single interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::profile::fingerprint::FingerprintVector;
use super::models::ProfileSnapshot;

/// Storage-boundary failures. Propagated unchanged through the engine —
/// retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A persisted snapshot payload failed to deserialize.
    #[error("corrupt snapshot payload: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A persisted timestamp failed to parse.
    #[error("invalid timestamp in store: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Append one snapshot to an author's history.
    ///
    /// Appends for the same author must be serialized by the
    /// implementation (the engine assumes a total temporal order within
    /// one author's history); appends for different authors may proceed
    /// in parallel.
    async fn append_snapshot(
        &self,
        author_id: &str,
        vector: &FingerprintVector,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Full snapshot history for one author, oldest first.
    /// An unknown author yields an empty list — not an error.
    async fn get_snapshots(&self, author_id: &str) -> Result<Vec<ProfileSnapshot>, StoreError>;

    /// All author ids with at least one snapshot, sorted.
    async fn list_authors(&self) -> Result<Vec<String>, StoreError>;

    /// Total number of snapshots across all authors.
    async fn snapshot_count(&self) -> Result<i64, StoreError>;

    /// Timestamp of the most recently recorded snapshot, if any.
    async fn latest_recorded_at(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
}
