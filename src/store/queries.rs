// Database queries — all snapshot SQL in one place.
//
// Every database interaction goes through this module. This keeps SQL
// contained here and gives the rest of the app clean Rust interfaces.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::profile::fingerprint::FingerprintVector;
use super::models::ProfileSnapshot;
use super::traits::StoreError;

/// Append one snapshot row. Rows are insert-only; nothing here updates
/// or deletes.
pub fn append_snapshot(
    conn: &Connection,
    author_id: &str,
    vector: &FingerprintVector,
    recorded_at: DateTime<Utc>,
) -> Result<(), StoreError> {
    let vector_json = serde_json::to_string(vector)?;
    conn.execute(
        "INSERT INTO snapshots (author_id, vector_json, recorded_at)
         VALUES (?1, ?2, ?3)",
        params![author_id, vector_json, recorded_at.to_rfc3339()],
    )?;
    Ok(())
}

/// One author's full history, oldest first. Ties on recorded_at fall
/// back to insertion order so the sequence stays total.
pub fn get_snapshots(
    conn: &Connection,
    author_id: &str,
) -> Result<Vec<ProfileSnapshot>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT author_id, vector_json, recorded_at
         FROM snapshots
         WHERE author_id = ?1
         ORDER BY recorded_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![author_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut snapshots = Vec::new();
    for row in rows {
        let (author_id, vector_json, recorded_at) = row?;
        let vector: FingerprintVector = serde_json::from_str(&vector_json)?;
        let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)?.with_timezone(&Utc);
        snapshots.push(ProfileSnapshot {
            author_id,
            vector,
            recorded_at,
        });
    }
    Ok(snapshots)
}

/// All author ids with at least one snapshot, sorted.
pub fn list_authors(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT author_id FROM snapshots ORDER BY author_id")?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut authors = Vec::new();
    for row in rows {
        authors.push(row?);
    }
    Ok(authors)
}

/// Total number of snapshots across all authors.
pub fn snapshot_count(conn: &Connection) -> Result<i64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
    Ok(count)
}

/// Timestamp of the newest snapshot across all authors, if any.
pub fn latest_recorded_at(conn: &Connection) -> Result<Option<DateTime<Utc>>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT recorded_at FROM snapshots ORDER BY recorded_at DESC LIMIT 1")?;
    let result: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;

    match result {
        Some(ts) => Ok(Some(DateTime::parse_from_rfc3339(&ts)?.with_timezone(&Utc))),
        None => Ok(None),
    }
}

// rusqlite's optional() helper — converts "no rows" into None
use rusqlite::OptionalExtension;
