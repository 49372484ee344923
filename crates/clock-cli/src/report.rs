//! Output records and run summary for the CLI.
//!
//! Every answer is written as one JSON object per line so the output can
//! be piped into other tools; the run summary goes to the log.

use chrono::SecondsFormat;
use clock_common::{StatsSnapshot, Timestamp};
use clock_estimator::{CounterEstimate, CounterWindow, Estimate};
use serde::Serialize;
use std::fmt;
use std::io::Write;

const STATUS_KNOWN: &str = "known";

fn rfc3339(time: Timestamp) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn status_of<T: Copy>(estimate: &Estimate<T>) -> String {
    estimate
        .reason()
        .map_or_else(|| STATUS_KNOWN.to_string(), |reason| reason.to_string())
}

/// Answer for a counter → time query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRecord {
    /// Queried counter.
    pub counter: u64,
    /// Estimated time, RFC 3339.
    pub time: Option<String>,
    /// `known` or the reason there is no estimate.
    pub status: String,
}

impl TimeRecord {
    /// Build a record from an estimate.
    pub fn new(counter: u64, estimate: &Estimate) -> Self {
        Self {
            counter,
            time: estimate.known().map(rfc3339),
            status: status_of(estimate),
        }
    }
}

/// Answer for a time → counter query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterRecord {
    /// Queried time, RFC 3339.
    pub time: String,
    /// Estimated counter.
    pub counter: Option<u64>,
    /// `known` or the reason there is no estimate.
    pub status: String,
}

impl CounterRecord {
    /// Build a record from an estimate.
    pub fn new(time: Timestamp, estimate: &CounterEstimate) -> Self {
        Self {
            time: rfc3339(time),
            counter: estimate.known(),
            status: status_of(estimate),
        }
    }
}

/// Answer for a window query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRecord {
    /// Window start, RFC 3339.
    pub from: String,
    /// Window end, RFC 3339.
    pub to: String,
    /// Counter at the window start.
    pub counter_from: Option<u64>,
    /// Counter at the window end.
    pub counter_to: Option<u64>,
}

impl WindowRecord {
    /// Build a record from a resolved window.
    pub fn new(from: Timestamp, to: Timestamp, window: &CounterWindow) -> Self {
        Self {
            from: rfc3339(from),
            to: rfc3339(to),
            counter_from: window.from,
            counter_to: window.to,
        }
    }
}

/// Answer for a latest-change query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRecord {
    /// Number of counters considered.
    pub counters: usize,
    /// Latest estimated time, RFC 3339.
    pub latest: Option<String>,
    /// `known` or the reason there is no estimate.
    pub status: String,
}

impl LatestRecord {
    /// Build a record from an estimate.
    pub fn new(counters: usize, estimate: &Estimate) -> Self {
        Self {
            counters,
            latest: estimate.known().map(rfc3339),
            status: status_of(estimate),
        }
    }
}

/// Write one record as a JSON line.
pub fn emit<W: Write, R: Serialize>(out: &mut W, record: &R) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)
}

/// How much of a run's queries the sample history could answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Every query produced an estimate.
    Full,
    /// Some queries produced an estimate.
    Partial,
    /// No query produced an estimate.
    Miss,
    /// Nothing was estimated.
    Idle,
}

impl Coverage {
    /// Classify a stats snapshot.
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Self {
        match snapshot.hit_ratio() {
            None => Self::Idle,
            Some(ratio) if ratio >= 1.0 => Self::Full,
            Some(ratio) if ratio > 0.0 => Self::Partial,
            Some(_) => Self::Miss,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Full => write!(f, "full"),
            Coverage::Partial => write!(f, "partial"),
            Coverage::Miss => write!(f, "miss"),
            Coverage::Idle => write!(f, "idle"),
        }
    }
}
