//! Timestamp and sample types.
//!
//! Timestamps are UTC with nanosecond resolution. Arithmetic between
//! timestamps goes through [`to_nanos`] / [`from_nanos`], which use `i128`
//! so that any two representable timestamps can be subtracted without
//! overflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock timestamp.
pub type Timestamp = DateTime<Utc>;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// An observed `(counter, time)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    /// Logical commit counter at the time of observation.
    pub counter: u64,
    /// Wall-clock time of the observation.
    pub time: Timestamp,
}

impl Sample {
    /// Create a new sample.
    #[must_use]
    pub fn new(counter: u64, time: Timestamp) -> Self {
        Self { counter, time }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.counter, self.time.to_rfc3339())
    }
}

/// Nanoseconds since the Unix epoch.
#[must_use]
pub fn to_nanos(ts: Timestamp) -> i128 {
    i128::from(ts.timestamp()) * NANOS_PER_SEC + i128::from(ts.timestamp_subsec_nanos())
}

/// Inverse of [`to_nanos`]. Returns `None` outside chrono's range.
#[must_use]
pub fn from_nanos(nanos: i128) -> Option<Timestamp> {
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SEC)).ok()?;
    // rem_euclid keeps this in [0, 1e9)
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, subsec)
}

/// Signed span `to - from` in nanoseconds.
#[must_use]
pub fn span_nanos(from: Timestamp, to: Timestamp) -> i128 {
    to_nanos(to) - to_nanos(from)
}

/// Parse an RFC 3339 timestamp into UTC.
///
/// # Errors
///
/// Returns the chrono parse error if the input is not valid RFC 3339.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|ts| ts.with_timezone(&Utc))
}
