//! Write-Ahead Log (WAL) for daily log entries.
//!
//! Every create, edit and delete is appended to a JSONL (JSON Lines) file
//! with file locking. The current set of entries is the replay of the log.
//!
//! Locks are taken on a sibling `.lock` file rather than the WAL itself.
//! Compaction swaps the WAL file out from under its path, so a lock held on
//! the old file would not exclude writers that open the new one.

use crate::{DailyLogEntry, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One change to the log set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    Created { entry: DailyLogEntry },
    Updated { entry: DailyLogEntry },
    Deleted { date: NaiveDate },
}

/// Event sink trait for persisting log changes
pub trait EventSink {
    fn append(&mut self, event: &LogEvent) -> Result<()>;
}

/// JSONL-based event log with file locking
pub struct JsonlWal {
    path: PathBuf,
}

/// Appends events while a [`JsonlWal::transact`] lock is held
pub struct LockedWriter<'a> {
    file: &'a File,
}

impl JsonlWal {
    /// Create a new WAL handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn open_for_append(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?)
    }

    /// Run `f` against a consistent snapshot of entries under an exclusive lock
    ///
    /// Events appended through the writer land before the lock is released,
    /// so checks made in `f` cannot race another writer or a compaction.
    pub fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&[DailyLogEntry], &mut LockedWriter<'_>) -> Result<T>,
    {
        self.ensure_parent_dir()?;
        let lock = acquire_lock(&self.path, true)?;

        let result = self.open_for_append().and_then(|file| {
            let entries = replay(&read_events_unlocked(&file)?);
            f(entries.as_slice(), &mut LockedWriter { file: &file })
        });

        lock.unlock()?;
        result
    }
}

impl EventSink for JsonlWal {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        self.ensure_parent_dir()?;
        let lock = acquire_lock(&self.path, true)?;

        let result = self
            .open_for_append()
            .and_then(|file| write_event(&file, event));
        lock.unlock()?;
        result
    }
}

impl EventSink for LockedWriter<'_> {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        write_event(self.file, event)
    }
}

/// Lock file guarding the WAL at `wal_path`
pub fn lock_path(wal_path: &Path) -> PathBuf {
    wal_path.with_extension("lock")
}

/// Open and lock the WAL's lock file; the caller unlocks it
///
/// The WAL's parent directory must exist.
pub(crate) fn acquire_lock(wal_path: &Path, exclusive: bool) -> Result<File> {
    let lock = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(lock_path(wal_path))?;

    if exclusive {
        lock.lock_exclusive()?;
    } else {
        lock.lock_shared()?;
    }
    Ok(lock)
}

fn write_event(file: &File, event: &LogEvent) -> Result<()> {
    let mut writer = std::io::BufWriter::new(file);
    let line = serde_json::to_string(event)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!("Appended {} event to WAL", event_kind(event));
    Ok(())
}

fn event_kind(event: &LogEvent) -> &'static str {
    match event {
        LogEvent::Created { .. } => "created",
        LogEvent::Updated { .. } => "updated",
        LogEvent::Deleted { .. } => "deleted",
    }
}

fn parse_events<R: BufRead>(reader: R) -> Result<Vec<LogEvent>> {
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LogEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse WAL event at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    Ok(events)
}

/// Read events through a handle whose lock the caller already holds
pub(crate) fn read_events_unlocked(file: &File) -> Result<Vec<LogEvent>> {
    parse_events(BufReader::new(file))
}

/// Read all events from a WAL file
pub fn read_events(path: &Path) -> Result<Vec<LogEvent>> {
    if !path.parent().map_or(true, Path::exists) {
        return Ok(Vec::new());
    }

    let lock = acquire_lock(path, false)?;
    let events = if path.exists() {
        File::open(path)
            .map_err(crate::Error::from)
            .and_then(|file| parse_events(BufReader::new(&file)))
    } else {
        Ok(Vec::new())
    };
    lock.unlock()?;

    let events = events?;
    tracing::debug!("Read {} events from WAL", events.len());
    Ok(events)
}

/// Fold events into the live entries, ascending by date
///
/// Later events for a date replace earlier ones.
pub fn replay(events: &[LogEvent]) -> Vec<DailyLogEntry> {
    let mut entries: BTreeMap<NaiveDate, DailyLogEntry> = BTreeMap::new();

    for event in events {
        match event {
            LogEvent::Created { entry } | LogEvent::Updated { entry } => {
                entries.insert(entry.date, entry.clone());
            }
            LogEvent::Deleted { date } => {
                entries.remove(date);
            }
        }
    }

    entries.into_values().collect()
}

/// Read and replay a WAL file
pub fn load_entries(path: &Path) -> Result<Vec<DailyLogEntry>> {
    Ok(replay(&read_events(path)?))
}
