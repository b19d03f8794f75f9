//! File-backed store for the profile and daily logs.
//!
//! Layout under the data directory:
//! - `profile.json`: the user profile
//! - `wal/daily_logs.wal`: JSONL event log of entry changes
//!
//! Log writes run inside a WAL transaction so the one-entry-per-date check
//! and the latest-entry weight rule see the same snapshot that is written.

use crate::wal::{self, EventSink, JsonlWal, LockedWriter, LogEvent};
use crate::{DailyLogEntry, Error, LogInput, LogPatch, Result, UserProfile};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Handle to a data directory
pub struct LogBook {
    data_dir: PathBuf,
    wal: JsonlWal,
}

impl LogBook {
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let wal = JsonlWal::new(data_dir.join("wal").join("daily_logs.wal"));
        Self { data_dir, wal }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn wal_path(&self) -> &Path {
        self.wal.path()
    }

    /// The saved profile, or `Error::ProfileMissing`
    pub fn profile(&self) -> Result<UserProfile> {
        UserProfile::load_required(&self.profile_path())
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        profile.save(&self.profile_path())
    }

    /// All entries, ascending by date
    pub fn logs(&self) -> Result<Vec<DailyLogEntry>> {
        wal::load_entries(self.wal.path())
    }

    /// The entry for `date`, if any
    pub fn log_for(&self, date: NaiveDate) -> Result<Option<DailyLogEntry>> {
        Ok(self.logs()?.into_iter().find(|entry| entry.date == date))
    }

    /// Load, modify and save the profile while holding the WAL lock
    ///
    /// Log writes read the profile under the same lock, so an edit here
    /// cannot be overwritten by a concurrent log write.
    pub fn update_profile<F>(&self, f: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile) -> Result<()>,
    {
        self.wal
            .transact(|_, _| UserProfile::update(&self.profile_path(), f))
    }

    /// Record a new day
    ///
    /// Fails with `DuplicateDate` if the date already has an entry.
    pub fn create_log(&self, input: LogInput) -> Result<DailyLogEntry> {
        self.wal.transact(|entries, writer| {
            if entries.iter().any(|entry| entry.date == input.date) {
                return Err(Error::DuplicateDate(input.date));
            }

            let profile = self.profile()?;
            let entry = DailyLogEntry::from_input(Uuid::new_v4(), input, profile.tdee);

            let mut after: Vec<DailyLogEntry> = entries.to_vec();
            after.push(entry.clone());
            self.commit(
                writer,
                &LogEvent::Created {
                    entry: entry.clone(),
                },
                &entry,
                &profile,
                &after,
            )?;

            tracing::info!(
                "Logged {}: {} points ({} diet, {} workout)",
                entry.date,
                entry.total_points,
                entry.diet_points,
                entry.workout_points
            );
            Ok(entry)
        })
    }

    /// Edit the entry for `date`, recomputing points from the current TDEE
    pub fn update_log(&self, date: NaiveDate, patch: &LogPatch) -> Result<DailyLogEntry> {
        self.wal.transact(|entries, writer| {
            let existing = entries
                .iter()
                .find(|entry| entry.date == date)
                .ok_or(Error::LogNotFound(date))?;

            let profile = self.profile()?;
            let entry = DailyLogEntry::from_input(existing.id, patch.apply(existing), profile.tdee);

            let after: Vec<DailyLogEntry> = entries
                .iter()
                .map(|e| if e.date == date { entry.clone() } else { e.clone() })
                .collect();
            self.commit(
                writer,
                &LogEvent::Updated {
                    entry: entry.clone(),
                },
                &entry,
                &profile,
                &after,
            )?;

            tracing::info!("Updated {}: {} points", entry.date, entry.total_points);
            Ok(entry)
        })
    }

    /// Save the weight change implied by `written`, then append `event`
    ///
    /// If the append fails the previous profile is restored, so a failed
    /// write leaves neither the entry nor its weight behind.
    fn commit(
        &self,
        writer: &mut LockedWriter<'_>,
        event: &LogEvent,
        written: &DailyLogEntry,
        profile: &UserProfile,
        logs_after: &[DailyLogEntry],
    ) -> Result<()> {
        let mut updated = profile.clone();
        let weight_moved = updated.apply_logged_weight(written, logs_after);
        if weight_moved {
            self.save_profile(&updated)?;
        }

        if let Err(e) = writer.append(event) {
            if weight_moved {
                if let Err(restore) = self.save_profile(profile) {
                    tracing::error!("Failed to restore profile after WAL error: {}", restore);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove the entry for `date`
    ///
    /// Current weight is left as is.
    pub fn delete_log(&self, date: NaiveDate) -> Result<DailyLogEntry> {
        self.wal.transact(|entries, writer| {
            let existing = entries
                .iter()
                .find(|entry| entry.date == date)
                .cloned()
                .ok_or(Error::LogNotFound(date))?;

            writer.append(&LogEvent::Deleted { date })?;
            tracing::info!("Deleted log for {}", date);
            Ok(existing)
        })
    }
}
