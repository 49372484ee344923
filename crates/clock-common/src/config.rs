//! Configuration structures for commit-clock.
//!
//! Supports TOML deserialization with defaults that reproduce the plain
//! estimator behavior, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Estimator policy.
    pub estimator: EstimatorConfig,

    /// Counter window resolution policy.
    pub window: WindowConfig,

    /// Where samples come from.
    pub samples: SamplesConfig,
}

/// What to report for a bracket whose two samples share a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Any collapsed bracket is unknown, even on an exact counter hit.
    #[default]
    Unknown,
    /// An exact hit on a collapsed bracket whose samples agree on time
    /// reports that time.
    SampleTime,
}

/// Estimator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Policy for zero-width counter brackets.
    pub degenerate_policy: DegeneratePolicy,

    /// Brackets spanning more wall-clock time than this are logged as sparse.
    #[serde(with = "humantime_serde")]
    pub sparse_gap_warning: Duration,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            degenerate_policy: DegeneratePolicy::Unknown,
            sparse_gap_warning: Duration::from_secs(60 * 60),
        }
    }
}

/// What a window endpoint outside the sampled history resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Clamp to the earliest or latest sampled counter.
    #[default]
    Clamp,
    /// Leave the endpoint unresolved.
    Strict,
}

/// Counter window configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Fallback for endpoints outside the sampled history.
    pub out_of_range: OutOfRangePolicy,
}

/// Sample source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplesConfig {
    /// Path to a JSON or TOML sample file.
    pub path: Option<PathBuf>,
}

impl ClockConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
