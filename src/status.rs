// System status display — shows DB stats and snapshot coverage.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::store::ProfileStore;

/// Display system status to the terminal.
pub async fn show(store: &Arc<dyn ProfileStore>, db_display_path: &str) -> Result<()> {
    if !Path::new(db_display_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `graphite init` to set up the database.");
        return Ok(());
    }

    // Database file size
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let authors = store.list_authors().await?;
    let snapshots = store.snapshot_count().await?;
    println!("Authors tracked: {}", authors.len());
    println!("Snapshots recorded: {snapshots}");

    match store.latest_recorded_at().await? {
        Some(ts) => println!("Newest snapshot: {}", ts.to_rfc3339()),
        None => {
            println!("Newest snapshot: none yet");
            println!("  Run `graphite record <author> <vector.json>` to add one");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
