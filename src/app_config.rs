use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the translation service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds (large files take minutes)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Progress tick interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Throughput calibration used to seed duration estimates
    #[serde(default)]
    pub calibration: TimeCalibration,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Measured translation throughput, in seconds per 100 cues.
///
/// Hand-tuned by an operator after timing the backend, one value per quality
/// mode. Injected into the estimator so recalibration is a config edit, not a
/// code change.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeCalibration {
    /// Seconds needed for 100 cues in normal mode
    #[serde(default = "default_seconds_per_100_normal")]
    pub seconds_per_100_normal: f64,

    /// Seconds needed for 100 cues in fast mode
    #[serde(default = "default_seconds_per_100_fast")]
    pub seconds_per_100_fast: f64,
}

impl Default for TimeCalibration {
    fn default() -> Self {
        Self {
            seconds_per_100_normal: default_seconds_per_100_normal(),
            seconds_per_100_fast: default_seconds_per_100_fast(),
        }
    }
}

impl TimeCalibration {
    // @validates: Both throughput values must be positive
    pub fn validate(&self) -> Result<()> {
        if self.seconds_per_100_normal <= 0.0 {
            return Err(anyhow!(
                "seconds_per_100_normal must be > 0, got {}",
                self.seconds_per_100_normal
            ));
        }
        if self.seconds_per_100_fast <= 0.0 {
            return Err(anyhow!(
                "seconds_per_100_fast must be > 0, got {}",
                self.seconds_per_100_fast
            ));
        }
        Ok(())
    }
}

/// Per-request translation settings supplied by the caller
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Number of cues the backend translates per batch (8-32, step 8)
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Trade quality for speed on the backend
    #[serde(default)]
    pub fast_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            fast_mode: false,
        }
    }
}

impl Settings {
    // @validates: Batch size range and step
    pub fn validate(&self) -> Result<()> {
        if !(8..=32).contains(&self.batch_size) || self.batch_size % 8 != 0 {
            return Err(anyhow!(
                "batch_size must be 8, 16, 24 or 32, got {}",
                self.batch_size
            ));
        }
        Ok(())
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Corresponding log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            calibration: TimeCalibration::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when the
    /// file does not exist
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    // @validates: Endpoint URL, timeout and calibration
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint)
            .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", self.endpoint, e))?;

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(anyhow!("tick_interval_ms must be > 0"));
        }

        self.calibration.validate()
    }
}

fn default_endpoint() -> String {
    "http://localhost:7860".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_tick_interval_ms() -> u64 {
    300
}

fn default_seconds_per_100_normal() -> f64 {
    1.2
}

fn default_seconds_per_100_fast() -> f64 {
    15.0
}

fn default_batch_size() -> u32 {
    32
}
