use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::config::AppConfig;
use crate::database::{self, captures, DbConn};
use crate::reports::aggregator;

/// Produces the two report artifacts for an event as ordered JSON
/// arrays, ready for the downstream publisher: the chronological
/// export and the per-round leaderboard.
pub struct ExportService {
    config: AppConfig,
}

impl ExportService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, requested_event: Option<i64>) -> Result<()> {
        info!("=== Starting Export ===\n");

        let pool = database::create_pool(&self.config.database.path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::ensure_schema(&mut conn)?;

        let event = resolve_event(&mut conn, requested_event)?;
        let records = captures::list_by_event(&mut conn, event)?;
        info!("  → {} capture records for event {}\n", records.len(), event);

        let export = aggregator::chronological_export(&records);
        let board = aggregator::leaderboard(&records);

        let export_path = self.write_json(&format!("event_{event}.json"), &export)?;
        let board_path = self.write_json(&format!("event_{event}_results.json"), &board)?;
        info!(
            "  → Wrote {} and {}",
            export_path.display(),
            board_path.display()
        );

        info!("=== Export Complete ===");
        Ok(())
    }

    fn write_json<T: Serialize>(&self, name: &str, data: &T) -> Result<PathBuf> {
        let dir = Path::new(&self.config.export.dir);
        fs::create_dir_all(dir).context("Failed to create export directory")?;

        let path = dir.join(name);
        let json = serde_json::to_string_pretty(data).context("Failed to serialize export data")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}

/// Use the requested event when it has stored results; otherwise fall
/// back to the latest stored event, warning about the fallback.
fn resolve_event(conn: &mut DbConn, requested: Option<i64>) -> Result<i64> {
    if let Some(event) = requested {
        if captures::event_has_records(conn, event)? {
            return Ok(event);
        }
        warn!(
            "No results for event {}, using the latest stored event instead",
            event
        );
    }

    captures::latest_event(conn)?.context("No capture records stored yet")
}
