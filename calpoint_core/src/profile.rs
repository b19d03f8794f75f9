//! User profile lifecycle and persistence with file locking.
//!
//! The profile is saved atomically and read under a shared lock. Unlike the
//! log journal, a corrupt profile is reported instead of defaulted, since
//! there is no sensible default body.

use crate::energy::compute_tdee;
use crate::history::latest_entry;
use crate::{DailyLogEntry, Error, ProfileInput, Result, UserProfile};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl UserProfile {
    /// Create a profile from onboarding answers
    ///
    /// Current weight starts at the starting weight and TDEE is computed from
    /// it unless the input supplies one.
    pub fn from_input(input: ProfileInput) -> Self {
        let tdee = input.tdee.unwrap_or_else(|| {
            compute_tdee(input.starting_weight, input.height_cm, input.age, input.sex)
        });

        Self {
            height_cm: input.height_cm,
            age: input.age,
            sex: input.sex,
            starting_weight: input.starting_weight,
            goal_weight: input.goal_weight,
            current_weight: input.starting_weight,
            tdee,
            target_calories: input.target_calories,
            start_date: input.start_date,
        }
    }

    /// Refresh the cached TDEE from current weight and stats
    ///
    /// Existing log entries keep the points they were written with.
    pub fn recalculate_tdee(&mut self) -> i32 {
        let previous = self.tdee;
        self.tdee = compute_tdee(self.current_weight, self.height_cm, self.age, self.sex);
        tracing::info!("Recalculated TDEE: {} -> {} kcal", previous, self.tdee);
        self.tdee
    }

    /// Take `written`'s weight as current weight if it is the latest entry
    ///
    /// `logs` is the full log set after the write. Returns whether the
    /// profile changed.
    pub fn apply_logged_weight(&mut self, written: &DailyLogEntry, logs: &[DailyLogEntry]) -> bool {
        let Some(weight) = written.weight else {
            return false;
        };

        let is_latest = latest_entry(logs).map_or(true, |latest| written.date >= latest.date);
        if !is_latest {
            tracing::debug!(
                "Weight on {} not applied; a later entry exists",
                written.date
            );
            return false;
        }

        self.current_weight = weight;
        tracing::info!("Current weight set to {} kg from {}", weight, written.date);
        true
    }

    /// Load the profile with shared locking
    ///
    /// Returns `None` if no profile has been saved yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No profile file at {:?}", path);
            return Ok(None);
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let profile = serde_json::from_str::<UserProfile>(&contents).map_err(|e| {
            Error::State(format!("profile at {:?} is unreadable: {}", path, e))
        })?;

        tracing::debug!("Loaded profile from {:?}", path);
        Ok(Some(profile))
    }

    /// Load the profile, failing if onboarding has not happened
    pub fn load_required(path: &Path) -> Result<Self> {
        Self::load(path)?.ok_or(Error::ProfileMissing)
    }

    /// Save the profile with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "profile path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Load the profile, modify it, and save it back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserProfile) -> Result<()>,
    {
        let mut profile = Self::load_required(path)?;
        f(&mut profile)?;
        profile.save(path)?;
        Ok(profile)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::history::tests::entry;
    use crate::Sex;
    use chrono::NaiveDate;

    pub(crate) fn sample_input() -> ProfileInput {
        ProfileInput {
            height_cm: 180.0,
            age: 30,
            sex: Sex::Male,
            starting_weight: 80.0,
            goal_weight: 70.0,
            target_calories: 1700,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            tdee: Some(2200),
        }
    }

    fn weighed(date: &str, weight: f64) -> DailyLogEntry {
        let mut e = entry(date, 0.5);
        e.weight = Some(weight);
        e
    }

    #[test]
    fn test_from_input_computes_tdee() {
        let mut input = sample_input();
        input.tdee = None;
        let profile = UserProfile::from_input(input);
        assert_eq!(profile.tdee, 2136);
        assert_eq!(profile.current_weight, 80.0);
    }

    #[test]
    fn test_recalculate_tdee_uses_current_weight() {
        let mut profile = UserProfile::from_input(sample_input());
        profile.current_weight = 75.0;
        // 10*75 + 1125 - 150 + 5 = 1730; * 1.2 = 2076
        assert_eq!(profile.recalculate_tdee(), 2076);
        assert_eq!(profile.tdee, 2076);
    }

    #[test]
    fn test_weight_from_latest_entry_applies() {
        let mut profile = UserProfile::from_input(sample_input());
        let older = weighed("2024-01-02", 79.5);
        let newest = weighed("2024-01-03", 79.0);
        let logs = vec![older, newest.clone()];

        assert!(profile.apply_logged_weight(&newest, &logs));
        assert_eq!(profile.current_weight, 79.0);
    }

    #[test]
    fn test_editing_older_weight_keeps_current_weight() {
        let mut profile = UserProfile::from_input(sample_input());
        profile.current_weight = 79.0;

        let edited_older = weighed("2024-01-02", 81.0);
        let newest = weighed("2024-01-03", 79.0);
        let logs = vec![edited_older.clone(), newest];

        assert!(!profile.apply_logged_weight(&edited_older, &logs));
        assert_eq!(profile.current_weight, 79.0);
    }

    #[test]
    fn test_entry_without_weight_is_ignored() {
        let mut profile = UserProfile::from_input(sample_input());
        let unweighed = entry("2024-01-05", 0.2);
        assert!(!profile.apply_logged_weight(&unweighed, &[unweighed.clone()]));
        assert_eq!(profile.current_weight, 80.0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        let profile = UserProfile::from_input(sample_input());
        profile.save(&path).unwrap();

        let loaded = UserProfile::load(&path).unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_missing_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        assert!(UserProfile::load(&path).unwrap().is_none());
        assert!(matches!(
            UserProfile::load_required(&path),
            Err(Error::ProfileMissing)
        ));
    }

    #[test]
    fn test_corrupted_profile_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        assert!(matches!(UserProfile::load(&path), Err(Error::State(_))));
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");
        UserProfile::from_input(sample_input()).save(&path).unwrap();

        UserProfile::update(&path, |profile| {
            profile.target_calories = 1800;
            Ok(())
        })
        .unwrap();

        let loaded = UserProfile::load_required(&path).unwrap();
        assert_eq!(loaded.target_calories, 1800);

        // No stray temp files remain
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "profile.json")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }
}
