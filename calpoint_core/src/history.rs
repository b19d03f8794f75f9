//! Log history views: running totals and date-range filtering.

use crate::points::round_to;
use crate::{DailyLogEntry, LogWithRunningTotal};
use chrono::NaiveDate;

/// Pair each entry with its cumulative total points, newest first
///
/// Totals are accumulated oldest to newest regardless of input order, then
/// the sequence is reversed for display.
pub fn with_running_totals(logs: &[DailyLogEntry]) -> Vec<LogWithRunningTotal> {
    let mut sorted: Vec<&DailyLogEntry> = logs.iter().collect();
    sorted.sort_by_key(|entry| entry.date);

    let mut running_total = 0.0;
    let mut rows: Vec<LogWithRunningTotal> = sorted
        .into_iter()
        .map(|entry| {
            running_total += entry.total_points;
            LogWithRunningTotal {
                entry: entry.clone(),
                running_total: round_to(running_total, 3),
            }
        })
        .collect();

    rows.reverse();
    rows
}

/// Entries whose date falls within `[from, to]`; open bounds are unbounded
pub fn filter_by_range(
    logs: &[DailyLogEntry],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<DailyLogEntry> {
    logs.iter()
        .filter(|entry| from.map_or(true, |from| entry.date >= from))
        .filter(|entry| to.map_or(true, |to| entry.date <= to))
        .cloned()
        .collect()
}

/// The chronologically latest entry
pub fn latest_entry(logs: &[DailyLogEntry]) -> Option<&DailyLogEntry> {
    logs.iter().max_by_key(|entry| entry.date)
}

/// Signed sum of total points
pub fn points_collected(logs: &[DailyLogEntry]) -> f64 {
    logs.iter().map(|entry| entry.total_points).sum()
}
