//! Pace comparison and time-to-goal projection.
//!
//! Projections are linear extrapolations of the all-time average pace over
//! logged days. There is no smoothing or recency weighting, so a single
//! outlier day moves the projection noticeably.

use crate::points::KCAL_PER_POINT;
use crate::GoalMode;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// How actual pace compares with the plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    OnTrack,
    Behind,
    /// Nothing logged yet
    NoData,
    /// Goal equals starting weight; no pass/fail applies
    Maintenance,
}

/// Inputs to [`compute_pace`]
#[derive(Clone, Copy, Debug)]
pub struct PaceInputs {
    pub mode: GoalMode,
    pub tdee: i32,
    pub target_calories: i32,
    pub total_points_needed: f64,
    /// Signed sum of total points across all logs
    pub points_collected: f64,
    pub days_logged: usize,
    pub today: NaiveDate,
}

/// Unrounded pace figures
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Pace {
    pub target_points_per_day: f64,
    pub actual_avg_points_per_day: f64,
    pub days_to_goal: Option<u64>,
    pub projected_completion_date: Option<NaiveDate>,
    pub on_track: bool,
    pub status: PaceStatus,
    pub pace_difference_percent: f64,
}

/// Planned daily points implied by the calorie target
pub fn target_points_per_day(tdee: i32, target_calories: i32) -> f64 {
    (tdee - target_calories) as f64 / KCAL_PER_POINT
}

/// Average points per logged day; 0 when nothing is logged
pub fn average_points_per_day(points_collected: f64, days_logged: usize) -> f64 {
    if days_logged == 0 {
        return 0.0;
    }
    points_collected / days_logged as f64
}

/// Signed percentage difference of actual pace from the plan
///
/// Positive means more points per day than planned, in either mode; read
/// it together with `on_track`. Returns 0 when the target is exactly 0 or
/// in maintenance.
pub fn pace_difference_percent(mode: GoalMode, actual: f64, target: f64) -> f64 {
    if mode == GoalMode::Maintenance || target == 0.0 {
        return 0.0;
    }
    (actual - target) / target.abs() * 100.0
}

/// Whole days until the goal at the current average pace
///
/// `None` when the average pace is zero or moving away from the goal, or
/// when nothing remains.
pub fn days_to_goal(
    mode: GoalMode,
    total_points_needed: f64,
    points_collected: f64,
    actual_avg_points_per_day: f64,
) -> Option<u64> {
    let directed_avg = mode.directed(actual_avg_points_per_day);
    if directed_avg <= 0.0 {
        return None;
    }

    let remaining = total_points_needed - mode.directed(points_collected);
    if remaining <= 0.0 {
        return None;
    }

    Some((remaining / actual_avg_points_per_day.abs()).ceil() as u64)
}

/// Calendar date `days_to_goal` days after `today`
pub fn projected_completion(today: NaiveDate, days_to_goal: Option<u64>) -> Option<NaiveDate> {
    days_to_goal.and_then(|days| today.checked_add_days(Days::new(days)))
}

/// Days to goal and the projected date, both `None` if either is
///
/// A projection past the end of the calendar is treated as no projection.
fn projection(today: NaiveDate, days_to_goal: Option<u64>) -> (Option<u64>, Option<NaiveDate>) {
    match projected_completion(today, days_to_goal) {
        Some(date) => (days_to_goal, Some(date)),
        None => (None, None),
    }
}

/// Compute pace, projection and on-track status
pub fn compute_pace(inputs: &PaceInputs) -> Pace {
    let target = target_points_per_day(inputs.tdee, inputs.target_calories);
    let actual = average_points_per_day(inputs.points_collected, inputs.days_logged);

    let status = if inputs.mode == GoalMode::Maintenance {
        PaceStatus::Maintenance
    } else if inputs.days_logged == 0 {
        PaceStatus::NoData
    } else {
        match inputs.mode.meets_target(actual, target) {
            Some(true) => PaceStatus::OnTrack,
            _ => PaceStatus::Behind,
        }
    };

    let (days, completion) = projection(
        inputs.today,
        days_to_goal(
            inputs.mode,
            inputs.total_points_needed,
            inputs.points_collected,
            actual,
        ),
    );

    Pace {
        target_points_per_day: target,
        actual_avg_points_per_day: actual,
        days_to_goal: days,
        projected_completion_date: completion,
        on_track: status == PaceStatus::OnTrack,
        status,
        pace_difference_percent: pace_difference_percent(inputs.mode, actual, target),
    }
}
