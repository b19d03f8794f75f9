//! CSV export of the log history and WAL compaction.
//!
//! Compaction rewrites the WAL as one `created` event per live entry and
//! keeps the old file as `.wal.processed` for manual recovery.

use crate::history::with_running_totals;
use crate::wal::{self, LogEvent};
use crate::{DailyLogEntry, Error, Result};
use fs2::FileExt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    calories_consumed: i32,
    workout_calories: i32,
    weight: Option<f64>,
    notes: Option<String>,
    diet_points: f64,
    workout_points: f64,
    total_points: f64,
    running_total: f64,
}

/// Write every entry, oldest first, with running totals
///
/// Returns the number of rows written. An existing file is replaced.
pub fn export_logs_csv(logs: &[DailyLogEntry], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    let mut rows = with_running_totals(logs);
    rows.reverse();

    for row in &rows {
        writer.serialize(CsvRow {
            date: row.entry.date.to_string(),
            calories_consumed: row.entry.calories_consumed,
            workout_calories: row.entry.workout_calories,
            weight: row.entry.weight,
            notes: row.entry.notes.clone(),
            diet_points: row.entry.diet_points,
            workout_points: row.entry.workout_points,
            total_points: row.entry.total_points,
            running_total: row.running_total,
        })?;
    }

    writer.flush()?;
    tracing::info!("Exported {} logs to {:?}", rows.len(), csv_path);
    Ok(rows.len())
}

/// Rewrite the WAL to hold only live entries
///
/// This function:
/// 1. Replays the WAL under the exclusive WAL lock
/// 2. Writes one `created` event per live entry to a synced temp file
/// 3. Renames the old WAL to `.wal.processed`
/// 4. Moves the temp file into place
///
/// Returns the number of entries kept.
pub fn compact_wal(wal_path: &Path) -> Result<usize> {
    if !wal_path.exists() {
        tracing::info!("No WAL to compact at {:?}", wal_path);
        return Ok(0);
    }

    let parent = wal_path
        .parent()
        .ok_or_else(|| Error::Other("WAL path missing parent".into()))?;

    let lock = wal::acquire_lock(wal_path, true)?;

    let result = (|| -> Result<usize> {
        let events = wal::read_events_unlocked(&std::fs::File::open(wal_path)?)?;
        let entries = wal::replay(&events);

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for entry in &entries {
                let line = serde_json::to_string(&LogEvent::Created {
                    entry: entry.clone(),
                })?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        let processed_path = wal_path.with_extension("wal.processed");
        std::fs::rename(wal_path, &processed_path)?;
        temp.persist(wal_path).map_err(|e| Error::Io(e.error))?;

        tracing::info!(
            "Compacted {} events into {} entries; archived to {:?}",
            events.len(),
            entries.len(),
            processed_path
        );
        Ok(entries.len())
    })();

    lock.unlock()?;
    result
}

/// Clean up old processed WAL files
///
/// This removes all .wal.processed files in the given directory.
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed WAL: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
