//! Chart-ready series built from the log history in a single pass.

use crate::pace::target_points_per_day;
use crate::points::{round_to, KCAL_PER_POINT};
use crate::{DailyLogEntry, GoalMode, UserProfile};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Every series the dashboard charts draw from
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ChartSeries {
    pub progress_data: Vec<ProgressPoint>,
    pub weight_data: Vec<WeightPoint>,
    pub daily_points_data: Vec<DailyPointsBar>,
    pub deficit_data: Vec<DeficitPoint>,
    pub weekly_data: Vec<WeeklyAverage>,
    pub heatmap_data: Vec<HeatmapDay>,
    pub points_breakdown: PointsBreakdown,
}

/// Cumulative actual vs planned points
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub target: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: f64,
    pub goal: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DailyPointsBar {
    pub date: NaiveDate,
    pub points: f64,
    pub target: f64,
}

/// Cumulative kcal balance vs plan
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DeficitPoint {
    pub date: NaiveDate,
    pub deficit: f64,
    pub target: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeeklyAverage {
    /// Sunday that starts the week
    pub week: NaiveDate,
    pub avg_points: f64,
    /// `None` in maintenance mode
    pub on_track: Option<bool>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub points: f64,
    pub level: u8,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct PointsBreakdown {
    pub diet: f64,
    pub workout: f64,
}

/// Bucket a day's total points into a 0-4 heatmap level
///
/// 4 great (>= 0.7), 3 good (>= 0.4), 2 maintenance (>= 0),
/// 1 slight surplus (>= -0.4), 0 surplus.
pub fn activity_level(total_points: f64) -> u8 {
    if total_points >= 0.7 {
        4
    } else if total_points >= 0.4 {
        3
    } else if total_points >= 0.0 {
        2
    } else if total_points >= -0.4 {
        1
    } else {
        0
    }
}

/// The Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday();
    date.checked_sub_days(Days::new(offset as u64))
        .unwrap_or(date)
}

/// Build all chart series from logs ordered ascending by date
pub fn compute_chart_series(profile: &UserProfile, logs: &[DailyLogEntry]) -> ChartSeries {
    let mode = GoalMode::for_profile(profile);
    let target_per_day = target_points_per_day(profile.tdee, profile.target_calories);

    let mut series = ChartSeries::default();
    let mut cumulative = 0.0;
    let mut diet_total = 0.0;
    let mut workout_total = 0.0;
    let mut weeks: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for (index, log) in logs.iter().enumerate() {
        cumulative += log.total_points;
        let cumulative_target = (index + 1) as f64 * target_per_day;
        diet_total += log.diet_points;
        workout_total += log.workout_points;

        series.progress_data.push(ProgressPoint {
            date: log.date,
            actual: round_to(cumulative, 2),
            target: round_to(cumulative_target, 2),
        });

        if let Some(weight) = log.weight {
            series.weight_data.push(WeightPoint {
                date: log.date,
                weight,
                goal: profile.goal_weight,
            });
        }

        series.daily_points_data.push(DailyPointsBar {
            date: log.date,
            points: round_to(log.total_points, 2),
            target: round_to(target_per_day, 2),
        });

        series.deficit_data.push(DeficitPoint {
            date: log.date,
            deficit: round_to(cumulative * KCAL_PER_POINT, 0),
            target: round_to(cumulative_target * KCAL_PER_POINT, 0),
        });

        series.heatmap_data.push(HeatmapDay {
            date: log.date,
            points: round_to(log.total_points, 2),
            level: activity_level(log.total_points),
        });

        let bucket = weeks.entry(week_start(log.date)).or_insert((0.0, 0));
        bucket.0 += log.total_points;
        bucket.1 += 1;
    }

    series.weekly_data = weeks
        .into_iter()
        .map(|(week, (total, count))| {
            let avg = total / count as f64;
            WeeklyAverage {
                week,
                avg_points: round_to(avg, 2),
                on_track: mode.meets_target(avg, target_per_day),
            }
        })
        .collect();

    series.points_breakdown = PointsBreakdown {
        diet: round_to(diet_total, 2),
        workout: round_to(workout_total, 2),
    };

    series
}

/// The last `days` heatmap cells
pub fn recent_heatmap(heatmap: &[HeatmapDay], days: usize) -> &[HeatmapDay] {
    &heatmap[heatmap.len().saturating_sub(days)..]
}
