//! Core domain types for the Calpoint tracker.
//!
//! This module defines the records the engine consumes and produces:
//! - The user profile and its physical stats
//! - Daily log entries and their derived points
//! - The goal mode that fixes the direction of progress

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex, as used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl std::str::FromStr for Sex {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(crate::Error::Validation(format!(
                "unknown sex '{}', expected male or female",
                other
            ))),
        }
    }
}

/// The single user's profile and goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub starting_weight: f64,
    pub goal_weight: f64,
    /// Latest weighed value; maintained by log writes
    pub current_weight: f64,
    /// Cached maintenance calories, refreshed only on request
    pub tdee: i32,
    pub target_calories: i32,
    pub start_date: NaiveDate,
}

/// Onboarding answers used to create a profile
#[derive(Clone, Debug)]
pub struct ProfileInput {
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub starting_weight: f64,
    pub goal_weight: f64,
    pub target_calories: i32,
    pub start_date: NaiveDate,
    /// Overrides the computed TDEE when set
    pub tdee: Option<i32>,
}

// ============================================================================
// Log Types
// ============================================================================

/// Points earned on a single day, rounded to 3 decimal places
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct DailyPoints {
    pub diet_points: f64,
    pub workout_points: f64,
    pub total_points: f64,
}

/// One day's log. At most one entry exists per date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyLogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub calories_consumed: i32,
    #[serde(default)]
    pub workout_calories: i32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    /// Computed from the TDEE in effect when the entry was written
    pub diet_points: f64,
    pub workout_points: f64,
    pub total_points: f64,
}

/// User-supplied fields of a log entry, before points are derived
#[derive(Clone, Debug, PartialEq)]
pub struct LogInput {
    pub date: NaiveDate,
    pub calories_consumed: i32,
    pub workout_calories: i32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Changes to an existing entry; `None` fields keep their current value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogPatch {
    pub calories_consumed: Option<i32>,
    pub workout_calories: Option<i32>,
    pub weight: Option<f64>,
    pub clear_weight: bool,
    pub notes: Option<String>,
}

impl LogPatch {
    /// Merge the patch over `existing`, producing the new input
    pub fn apply(&self, existing: &DailyLogEntry) -> LogInput {
        let weight = if self.clear_weight {
            None
        } else {
            self.weight.or(existing.weight)
        };

        LogInput {
            date: existing.date,
            calories_consumed: self.calories_consumed.unwrap_or(existing.calories_consumed),
            workout_calories: self.workout_calories.unwrap_or(existing.workout_calories),
            weight,
            notes: self.notes.clone().or_else(|| existing.notes.clone()),
        }
    }
}

impl DailyLogEntry {
    /// Build an entry from raw input, deriving points from `tdee`
    pub fn from_input(id: Uuid, input: LogInput, tdee: i32) -> Self {
        let points =
            crate::points::compute_daily_points(tdee, input.calories_consumed, input.workout_calories);
        Self {
            id,
            date: input.date,
            calories_consumed: input.calories_consumed,
            workout_calories: input.workout_calories,
            weight: input.weight,
            notes: input.notes,
            diet_points: points.diet_points,
            workout_points: points.workout_points,
            total_points: points.total_points,
        }
    }

    /// The derived point fields as a single value
    pub fn points(&self) -> DailyPoints {
        DailyPoints {
            diet_points: self.diet_points,
            workout_points: self.workout_points,
            total_points: self.total_points,
        }
    }
}

/// A log entry paired with the cumulative points up to and including it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogWithRunningTotal {
    #[serde(flatten)]
    pub entry: DailyLogEntry,
    pub running_total: f64,
}

// ============================================================================
// Goal Types
// ============================================================================

/// Direction of the user's goal, fixed by starting vs goal weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalMode {
    /// Starting weight above goal; progress is a calorie deficit
    Loss,
    /// Goal above starting weight; progress is a calorie surplus
    Gain,
    /// Starting weight equals goal
    Maintenance,
}

/// Whether the scale moved down, up, or not at all
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightDirection {
    Lost,
    Gained,
    Unchanged,
}
