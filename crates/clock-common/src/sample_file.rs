//! Loading sample histories from disk.
//!
//! Two formats are accepted, selected by file extension:
//!
//! - `.json`: either a bare array of samples or `{ "samples": [...] }`
//! - `.toml`: `[[samples]]` tables
//!
//! Times are RFC 3339 strings in both formats (TOML datetime literals are
//! not accepted; quote them).

use crate::error::{ClockError, ClockResult};
use crate::time::Sample;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
struct SampleTable {
    #[serde(default)]
    samples: Vec<Sample>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSamples {
    Bare(Vec<Sample>),
    Table(SampleTable),
}

/// Sample file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// JSON array or object.
    Json,
    /// TOML `[[samples]]` tables.
    Toml,
}

impl SampleFormat {
    /// Pick a format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse samples from a string in the given format.
///
/// # Errors
///
/// Returns [`ClockError::SampleFile`] (with an empty path) on decode failure.
pub fn parse_samples(content: &str, format: SampleFormat) -> ClockResult<Vec<Sample>> {
    let decoded = match format {
        SampleFormat::Json => serde_json::from_str::<JsonSamples>(content)
            .map(|parsed| match parsed {
                JsonSamples::Bare(samples) => samples,
                JsonSamples::Table(table) => table.samples,
            })
            .map_err(|e| e.to_string()),
        SampleFormat::Toml => toml::from_str::<SampleTable>(content)
            .map(|table| table.samples)
            .map_err(|e| e.to_string()),
    };
    decoded.map_err(|reason| ClockError::SampleFile {
        path: Default::default(),
        reason,
    })
}

/// Load samples from a JSON or TOML file.
///
/// Samples are returned in file order; no sorting or validation is applied.
///
/// # Errors
///
/// Returns [`ClockError::SampleFile`] if the extension is not recognized,
/// the file cannot be read, or its content cannot be decoded.
pub fn load_samples(path: &Path) -> ClockResult<Vec<Sample>> {
    let format = SampleFormat::from_path(path).ok_or_else(|| ClockError::SampleFile {
        path: path.to_path_buf(),
        reason: "unsupported extension (expected .json or .toml)".to_string(),
    })?;
    let content = std::fs::read_to_string(path).map_err(|e| ClockError::SampleFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let samples = parse_samples(&content, format).map_err(|e| match e {
        ClockError::SampleFile { reason, .. } => ClockError::SampleFile {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })?;
    debug!(path = %path.display(), count = samples.len(), ?format, "Loaded samples");
    Ok(samples)
}

/// Check that samples, in the given order, strictly increase in both
/// counter and time.
///
/// # Errors
///
/// Returns [`ClockError::InvalidSample`] naming the first offending sample.
pub fn validate_sequence(samples: &[Sample]) -> ClockResult<()> {
    for (index, pair) in samples.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        if next.counter <= prev.counter {
            return Err(ClockError::InvalidSample {
                index: index + 1,
                reason: format!("counter {} does not follow {}", next.counter, prev.counter),
            });
        }
        if next.time <= prev.time {
            return Err(ClockError::InvalidSample {
                index: index + 1,
                reason: format!(
                    "time {} does not follow {}",
                    next.time.to_rfc3339(),
                    prev.time.to_rfc3339()
                ),
            });
        }
    }
    Ok(())
}
