// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so other modules can use them without
// depending on rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::fingerprint::FingerprintVector;

/// One timestamped fingerprint for one author, permanently recorded.
///
/// Snapshots are immutable once created: this subsystem appends and reads
/// but never mutates or deletes them (retention is an external policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub author_id: String,
    /// The fingerprint vector (JSON-encoded in the DB).
    pub vector: FingerprintVector,
    pub recorded_at: DateTime<Utc>,
}
