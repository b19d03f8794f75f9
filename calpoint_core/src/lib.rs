#![forbid(unsafe_code)]

//! Core domain model and business logic for the Calpoint tracker.
//!
//! This crate provides:
//! - Domain types (profile, daily logs, points, goal mode)
//! - The calculation engine (TDEE, points, pace, calorie balance)
//! - Aggregated stats and chart series
//! - Persistence (profile, WAL, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod energy;
pub mod points;
pub mod goal;
pub mod pace;
pub mod calories;
pub mod history;
pub mod stats;
pub mod charts;
pub mod profile;
pub mod validation;
pub mod wal;
pub mod export;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use energy::{calorie_presets, compute_bmr, compute_tdee, CaloriePreset};
pub use points::{compute_daily_points, total_points_needed, weight_change_from_points};
pub use pace::{compute_pace, PaceStatus};
pub use calories::{compute_calorie_summary, CalorieSummary};
pub use history::with_running_totals;
pub use stats::{compute_stats, StatsReport};
pub use charts::{compute_chart_series, ChartSeries};
pub use store::LogBook;
