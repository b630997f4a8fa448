// SqliteStore — rusqlite backend implementing the ProfileStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return. The lock is never held across .await points — Rust enforces
// this because MutexGuard is !Send.
//
// The connection lock also serializes appends, which gives the
// single-writer-per-author discipline the engine's temporal ordering
// assumption needs for free.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::profile::fingerprint::FingerprintVector;
use super::models::ProfileSnapshot;
use super::traits::{ProfileStore, StoreError};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn append_snapshot(
        &self,
        author_id: &str,
        vector: &FingerprintVector,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        super::queries::append_snapshot(&conn, author_id, vector, recorded_at)
    }

    async fn get_snapshots(&self, author_id: &str) -> Result<Vec<ProfileSnapshot>, StoreError> {
        let conn = self.conn.lock().await;
        super::queries::get_snapshots(&conn, author_id)
    }

    async fn list_authors(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().await;
        super::queries::list_authors(&conn)
    }

    async fn snapshot_count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().await;
        super::queries::snapshot_count(&conn)
    }

    async fn latest_recorded_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let conn = self.conn.lock().await;
        super::queries::latest_recorded_at(&conn)
    }
}
