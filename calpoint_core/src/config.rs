//! Configuration file support for Calpoint.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/calpoint/config.toml`.

use crate::{Error, Result};
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub presets: PresetConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Calendar configuration
///
/// "Today" and week bucketing use this fixed offset from UTC rather than the
/// machine's local timezone.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ClockConfig {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl ClockConfig {
    /// The configured offset
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::Config(format!(
                "utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            ))
        })
    }

    /// Today's calendar date at the configured offset
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.offset()?).date_naive())
    }
}

/// Report presentation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of most recent days shown in the activity heatmap
    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            heatmap_days: default_heatmap_days(),
        }
    }
}

/// Daily deficits (kcal) behind the suggested calorie targets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PresetConfig {
    #[serde(default = "default_aggressive_deficit")]
    pub aggressive_deficit: i32,

    #[serde(default = "default_moderate_deficit")]
    pub moderate_deficit: i32,

    #[serde(default = "default_slow_deficit")]
    pub slow_deficit: i32,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            aggressive_deficit: default_aggressive_deficit(),
            moderate_deficit: default_moderate_deficit(),
            slow_deficit: default_slow_deficit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("calpoint")
}

fn default_heatmap_days() -> usize {
    28
}

fn default_aggressive_deficit() -> i32 {
    750
}

fn default_moderate_deficit() -> i32 {
    500
}

fn default_slow_deficit() -> i32 {
    300
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.clock.offset()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("calpoint").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
