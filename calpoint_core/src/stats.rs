//! Aggregate progress report.
//!
//! [`compute_stats`] folds the whole log history into summary, points, pace
//! and calorie sections. Values are rounded here, at the output boundary;
//! the calculators underneath work on unrounded numbers.

use crate::calories::{compute_calorie_summary, CalorieInputs, CalorieSummary};
use crate::history::points_collected;
use crate::pace::{compute_pace, PaceInputs, PaceStatus};
use crate::points::{round_to, total_points_needed, weight_change_from_points};
use crate::{DailyLogEntry, GoalMode, UserProfile, WeightDirection};
use chrono::NaiveDate;
use serde::Serialize;

/// Full progress report
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StatsReport {
    pub mode: GoalMode,
    pub summary: Summary,
    pub points: PointsProgress,
    pub pace: PaceReport,
    pub calories: CalorieSummary,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeightChange {
    pub value: f64,
    pub direction: WeightDirection,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Summary {
    pub start_date: NaiveDate,
    /// Calendar days since the start date; display only
    pub days_elapsed: i64,
    pub days_logged: usize,
    pub starting_weight: f64,
    pub goal_weight: f64,
    pub current_weight: f64,
    /// Measured on the scale, starting weight to current weight
    pub weight_change: WeightChange,
    /// Estimated from points progress
    pub weight_remaining: f64,
    pub progress_percent: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PointsProgress {
    pub total_needed: f64,
    pub collected: f64,
    pub remaining: f64,
    pub progress_percent: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PaceReport {
    pub target_points_per_day: f64,
    pub actual_avg_points_per_day: f64,
    pub days_to_goal: Option<u64>,
    pub projected_completion_date: Option<NaiveDate>,
    pub on_track: bool,
    pub status: PaceStatus,
    pub pace_difference_percent: f64,
}

fn weight_change(starting_weight: f64, current_weight: f64) -> WeightChange {
    let delta = round_to(current_weight - starting_weight, 2);
    let direction = if delta < 0.0 {
        WeightDirection::Lost
    } else if delta > 0.0 {
        WeightDirection::Gained
    } else {
        WeightDirection::Unchanged
    };

    WeightChange {
        value: delta.abs(),
        direction,
    }
}

/// Share of the goal reached, clamped to 0..=100; a zero-size goal is complete
fn progress_percent(directed_points: f64, total_needed: f64) -> f64 {
    if total_needed <= 0.0 {
        return 100.0;
    }
    (directed_points / total_needed * 100.0).clamp(0.0, 100.0)
}

/// Build the progress report for `profile` and its logs as of `today`
pub fn compute_stats(profile: &UserProfile, logs: &[DailyLogEntry], today: NaiveDate) -> StatsReport {
    let mode = GoalMode::for_profile(profile);
    let collected = points_collected(logs);
    let days_logged = logs.len();
    let total_needed = total_points_needed(profile.starting_weight, profile.goal_weight);

    let directed = mode.directed(collected);
    let percent = progress_percent(directed, total_needed);
    let points_remaining = (total_needed - directed).max(0.0);

    let goal_kg = (profile.starting_weight - profile.goal_weight).abs();
    let weight_remaining = (goal_kg - weight_change_from_points(directed)).max(0.0);

    let pace = compute_pace(&PaceInputs {
        mode,
        tdee: profile.tdee,
        target_calories: profile.target_calories,
        total_points_needed: total_needed,
        points_collected: collected,
        days_logged,
        today,
    });

    let calories = compute_calorie_summary(&CalorieInputs {
        tdee: profile.tdee,
        target_calories: profile.target_calories,
        starting_weight: profile.starting_weight,
        goal_weight: profile.goal_weight,
        points_collected: collected,
        days_logged,
    });

    StatsReport {
        mode,
        summary: Summary {
            start_date: profile.start_date,
            days_elapsed: (today - profile.start_date).num_days().max(0),
            days_logged,
            starting_weight: profile.starting_weight,
            goal_weight: profile.goal_weight,
            current_weight: profile.current_weight,
            weight_change: weight_change(profile.starting_weight, profile.current_weight),
            weight_remaining: round_to(weight_remaining, 2),
            progress_percent: round_to(percent, 1),
        },
        points: PointsProgress {
            total_needed: round_to(total_needed, 2),
            collected: round_to(collected, 2),
            remaining: round_to(points_remaining, 2),
            progress_percent: round_to(percent, 1),
        },
        pace: PaceReport {
            target_points_per_day: round_to(pace.target_points_per_day, 3),
            actual_avg_points_per_day: round_to(pace.actual_avg_points_per_day, 3),
            days_to_goal: pace.days_to_goal,
            projected_completion_date: pace.projected_completion_date,
            on_track: pace.on_track,
            status: pace.status,
            pace_difference_percent: round_to(pace.pace_difference_percent, 1),
        },
        calories,
    }
}
