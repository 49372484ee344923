//! Common fixtures for acceptance tests.
//!
//! Provides a deterministic sample history shaped like a real sampling
//! table: one observation every few seconds, counters advancing in bursts.

#![allow(dead_code)] // Not every suite uses every fixture

use chrono::{Duration, TimeZone, Utc};
use clock_common::{Sample, Timestamp};

/// Start of the synthetic history.
pub fn epoch() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 10, 9, 0, 0, 0).unwrap()
}

/// `epoch() + secs`.
pub fn at(secs: i64) -> Timestamp {
    epoch() + Duration::seconds(secs)
}

/// Number of samples in [`history`].
pub const HISTORY_LEN: usize = 720;

/// Samples every 5 seconds for an hour; counter advance cycles through a
/// quiet/busy pattern so brackets have different slopes.
pub fn history() -> Vec<Sample> {
    let mut counter = 1_000_000u64;
    (0..HISTORY_LEN)
        .map(|i| {
            let sample = Sample::new(counter, at(i as i64 * 5));
            counter += match i % 4 {
                0 => 1,
                1 => 17,
                2 => 4_096,
                _ => 250,
            };
            sample
        })
        .collect()
}

/// The same history in a scrambled order, as a catalog query might return it.
pub fn shuffled_history() -> Vec<Sample> {
    let mut samples = history();
    // Deterministic interleave: odds reversed, then evens.
    let (evens, odds): (Vec<_>, Vec<_>) = samples
        .drain(..)
        .enumerate()
        .partition(|(i, _)| i % 2 == 0);
    odds.into_iter()
        .rev()
        .chain(evens)
        .map(|(_, s)| s)
        .collect()
}

/// JSON rendering of a sample list, as a sample file would hold it.
pub fn to_json(samples: &[Sample]) -> String {
    serde_json::to_string_pretty(samples).unwrap()
}
