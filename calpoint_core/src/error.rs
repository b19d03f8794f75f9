//! Error types for the calpoint_core library.

use chrono::NaiveDate;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for calpoint_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input failed a range or presence check
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A log entry already exists for this date
    #[error("A log for {0} already exists; edit it instead")]
    DuplicateDate(NaiveDate),

    /// No log entry exists for this date
    #[error("No log found for {0}")]
    LogNotFound(NaiveDate),

    /// The profile has not been created yet
    #[error("No profile found; run `calpoint init` first")]
    ProfileMissing,

    /// Persisted state is unreadable
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
