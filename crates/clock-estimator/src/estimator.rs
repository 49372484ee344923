//! Counter-Time Estimator.
//!
//! Maps a commit counter to an approximate wall-clock time by linear
//! interpolation between the two samples that bracket it:
//!
//! ```text
//! time(target) = prev.time + (next.time - prev.time)
//!                          * (target - prev.counter) / (next.counter - prev.counter)
//! ```
//!
//! The outcome is a three-way branch:
//!
//! | bracket                      | result                               |
//! |------------------------------|--------------------------------------|
//! | none                         | `Unknown(NoData)`                    |
//! | `prev.counter == next.counter` | `Unknown(DegenerateBracket)`       |
//! | `prev.counter < next.counter`  | `Known(interpolated)`              |
//!
//! A bracket that runs backwards in time gives `Unknown(InvertedBracket)`;
//! a bracket whose samples share a time gives `Unknown(DegenerateBracket)`.
//!
//! # Arithmetic
//!
//! The time span is taken in `i128` nanoseconds and scaled by
//! `offset / span` with a quotient/remainder split, so every intermediate
//! fits in `u128` for any pair of `u64` counters. Results are floor-rounded
//! toward `prev`, which keeps both bracket endpoints exact and the mapping
//! monotonic.

use crate::bracket::{Bracket, BracketShape};
use crate::source::{SampleSource, TimeBracketSource};
use clock_common::{
    from_nanos, to_nanos, DegeneratePolicy, EstimateStats, EstimatorConfig, OutcomeKind, Sample,
    StatsSnapshot, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Why no estimate could be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownReason {
    /// No samples enclose the target.
    NoData,
    /// The enclosing samples share a counter (or, for time lookups, a time).
    DegenerateBracket,
    /// The enclosing samples run backwards in time.
    InvertedBracket,
    /// The interpolated value falls outside the representable range.
    Unrepresentable,
}

impl UnknownReason {
    fn outcome_kind(self) -> OutcomeKind {
        match self {
            Self::NoData => OutcomeKind::NoData,
            Self::DegenerateBracket => OutcomeKind::Degenerate,
            Self::InvertedBracket => OutcomeKind::Inverted,
            Self::Unrepresentable => OutcomeKind::Unrepresentable,
        }
    }
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "no_data"),
            Self::DegenerateBracket => write!(f, "degenerate_bracket"),
            Self::InvertedBracket => write!(f, "inverted_bracket"),
            Self::Unrepresentable => write!(f, "unrepresentable"),
        }
    }
}

/// Result of an estimation: a value, or the reason there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimate<T = Timestamp> {
    /// An estimate was produced.
    Known(T),
    /// No estimate could be made.
    Unknown(UnknownReason),
}

/// Estimate of the counter at a given time.
pub type CounterEstimate = Estimate<u64>;

impl<T: Copy> Estimate<T> {
    /// The estimated value, if any.
    #[must_use]
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unknown(_) => None,
        }
    }

    /// Whether an estimate was produced.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The reason no estimate was produced, if any.
    #[must_use]
    pub fn reason(&self) -> Option<UnknownReason> {
        match self {
            Self::Known(_) => None,
            Self::Unknown(reason) => Some(*reason),
        }
    }

    fn outcome_kind(&self) -> OutcomeKind {
        match self {
            Self::Known(_) => OutcomeKind::Known,
            Self::Unknown(reason) => reason.outcome_kind(),
        }
    }
}

impl<T> From<Estimate<T>> for Option<T> {
    fn from(estimate: Estimate<T>) -> Self {
        match estimate {
            Estimate::Known(value) => Some(value),
            Estimate::Unknown(_) => None,
        }
    }
}

/// `floor(magnitude * num / den)` without overflow, for `num <= den`.
fn scale(magnitude: u128, num: u64, den: u64) -> u128 {
    debug_assert!(den > 0 && num <= den);
    let (num, den) = (u128::from(num), u128::from(den));
    // q * num <= magnitude and r * num < den^2 < 2^128
    let q = magnitude / den;
    let r = magnitude % den;
    q * num + r * num / den
}

/// Interpolate the time of `target` within `bracket`.
///
/// `target` outside the bracket is reported as [`UnknownReason::NoData`].
#[must_use]
pub fn interpolate_time(bracket: &Bracket, target: u64, policy: DegeneratePolicy) -> Estimate {
    let Bracket { prev, next } = *bracket;
    match bracket.shape() {
        BracketShape::Inverted => Estimate::Unknown(UnknownReason::InvertedBracket),
        _ if !bracket.contains_counter(target) => Estimate::Unknown(UnknownReason::NoData),
        BracketShape::Collapsed => {
            let exact = policy == DegeneratePolicy::SampleTime && prev.time == next.time;
            if exact {
                Estimate::Known(prev.time)
            } else {
                Estimate::Unknown(UnknownReason::DegenerateBracket)
            }
        }
        // Several counters issued at one instant: no rate to interpolate with.
        BracketShape::Flat => Estimate::Unknown(UnknownReason::DegenerateBracket),
        BracketShape::Rising => {
            let span = next.counter - prev.counter;
            let offset = target - prev.counter;
            // Rising guarantees a positive span.
            let elapsed = scale(bracket.time_span_nanos().unsigned_abs(), offset, span);
            // elapsed <= time span, so it fits back into i128.
            match from_nanos(to_nanos(prev.time) + elapsed as i128) {
                Some(time) => Estimate::Known(time),
                None => Estimate::Unknown(UnknownReason::Unrepresentable),
            }
        }
    }
}

/// Interpolate the counter at `target` within a time-keyed `bracket`.
///
/// Mirrors [`interpolate_time`] with the roles of counter and time swapped:
/// a zero time span is degenerate and a zero counter span yields
/// `prev.counter`.
#[must_use]
pub fn interpolate_counter(
    bracket: &Bracket,
    target: Timestamp,
    policy: DegeneratePolicy,
) -> CounterEstimate {
    let Bracket { prev, next } = *bracket;
    let time_span = bracket.time_span_nanos();
    let Some(span) = bracket.counter_span() else {
        return Estimate::Unknown(UnknownReason::InvertedBracket);
    };
    if time_span < 0 {
        return Estimate::Unknown(UnknownReason::InvertedBracket);
    }
    if target < prev.time || target > next.time {
        return Estimate::Unknown(UnknownReason::NoData);
    }
    if time_span == 0 {
        let exact = policy == DegeneratePolicy::SampleTime && span == 0;
        return if exact {
            Estimate::Known(prev.counter)
        } else {
            Estimate::Unknown(UnknownReason::DegenerateBracket)
        };
    }
    if span == 0 {
        return Estimate::Known(prev.counter);
    }

    let elapsed = (to_nanos(target) - to_nanos(prev.time)).unsigned_abs();
    let total = time_span.unsigned_abs();
    let advance = match u128::from(span).checked_mul(elapsed) {
        Some(product) => product / total,
        None => {
            // Only reachable for brackets spanning centuries of nanoseconds.
            let fraction = elapsed as f64 / total as f64;
            ((span as f64) * fraction).floor() as u128
        }
    };
    let advance = u64::try_from(advance).unwrap_or(span).min(span);
    Estimate::Known(prev.counter + advance)
}

/// Estimate the time of `target` from the samples behind `source`.
///
/// Uses the default [`DegeneratePolicy::Unknown`]. Lookup failures of the
/// source are propagated; every estimation outcome is a value.
///
/// # Errors
///
/// Returns the source's error if the bracket lookup fails.
pub fn estimate<S: SampleSource>(target: u64, source: &S) -> Result<Estimate, S::Error> {
    let bracket = source.bracket(target)?;
    Ok(match bracket {
        Some(bracket) => interpolate_time(&bracket, target, DegeneratePolicy::Unknown),
        None => Estimate::Unknown(UnknownReason::NoData),
    })
}

/// Estimate the time of `target` between two known samples.
#[must_use]
pub fn estimate_between(target: u64, prev: Sample, next: Sample) -> Estimate {
    interpolate_time(&Bracket::new(prev, next), target, DegeneratePolicy::Unknown)
}

/// Estimate the counter in effect at `target`.
///
/// # Errors
///
/// Returns the source's error if the bracket lookup fails.
pub fn estimate_counter<S: TimeBracketSource>(
    target: Timestamp,
    source: &S,
) -> Result<CounterEstimate, S::Error> {
    let bracket = source.time_bracket(target)?;
    Ok(match bracket {
        Some(bracket) => interpolate_counter(&bracket, target, DegeneratePolicy::Unknown),
        None => Estimate::Unknown(UnknownReason::NoData),
    })
}

/// Latest known estimate over a set of counters.
///
/// Unknown counters are skipped; if none is known the result is
/// [`UnknownReason::NoData`].
///
/// # Errors
///
/// Returns the source's error if any bracket lookup fails.
pub fn latest_estimate<S, I>(counters: I, source: &S) -> Result<Estimate, S::Error>
where
    S: SampleSource,
    I: IntoIterator<Item = u64>,
{
    let mut latest: Option<Timestamp> = None;
    for counter in counters {
        if let Some(time) = estimate(counter, source)?.known() {
            latest = latest.max(Some(time));
        }
    }
    Ok(latest.map_or(Estimate::Unknown(UnknownReason::NoData), Estimate::Known))
}

/// Configured estimator with shared outcome counters.
///
/// Holds no sample state; clones share the same [`EstimateStats`].
#[derive(Debug, Clone, Default)]
pub struct CounterTimeEstimator {
    config: EstimatorConfig,
    stats: Arc<EstimateStats>,
}

impl CounterTimeEstimator {
    /// Create an estimator with the given configuration.
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            stats: Arc::new(EstimateStats::new()),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Shared outcome counters.
    #[must_use]
    pub fn stats(&self) -> &Arc<EstimateStats> {
        &self.stats
    }

    /// Snapshot of the outcome counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Estimate the time of `target`.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the bracket lookup fails.
    pub fn estimate<S: SampleSource>(&self, target: u64, source: &S) -> Result<Estimate, S::Error> {
        let bracket = source.bracket(target)?;
        let estimate = match bracket {
            Some(bracket) => {
                self.inspect(&bracket);
                interpolate_time(&bracket, target, self.config.degenerate_policy)
            }
            None => Estimate::Unknown(UnknownReason::NoData),
        };
        self.stats.record(estimate.outcome_kind());
        debug!(
            target_counter = target,
            ?bracket,
            ?estimate,
            "Estimated time for counter"
        );
        Ok(estimate)
    }

    /// Estimate the counter in effect at `target`.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the bracket lookup fails.
    pub fn estimate_counter<S: TimeBracketSource>(
        &self,
        target: Timestamp,
        source: &S,
    ) -> Result<CounterEstimate, S::Error> {
        let bracket = source.time_bracket(target)?;
        let estimate = match bracket {
            Some(bracket) => {
                self.inspect(&bracket);
                interpolate_counter(&bracket, target, self.config.degenerate_policy)
            }
            None => Estimate::Unknown(UnknownReason::NoData),
        };
        self.stats.record(estimate.outcome_kind());
        debug!(
            target_time = %target.to_rfc3339(),
            ?bracket,
            ?estimate,
            "Estimated counter for time"
        );
        Ok(estimate)
    }

    /// Latest known estimate over a set of counters.
    ///
    /// # Errors
    ///
    /// Returns the source's error if any bracket lookup fails.
    pub fn latest_estimate<S, I>(&self, counters: I, source: &S) -> Result<Estimate, S::Error>
    where
        S: SampleSource,
        I: IntoIterator<Item = u64>,
    {
        let mut latest: Option<Timestamp> = None;
        for counter in counters {
            if let Some(time) = self.estimate(counter, source)?.known() {
                latest = latest.max(Some(time));
            }
        }
        Ok(latest.map_or(Estimate::Unknown(UnknownReason::NoData), Estimate::Known))
    }

    /// Log brackets that are suspicious or too sparse to be precise.
    fn inspect(&self, bracket: &Bracket) {
        match bracket.shape() {
            BracketShape::Inverted => {
                warn!(%bracket, "Sample bracket runs backwards in time");
            }
            BracketShape::Rising => {
                let span = bracket.time_span_nanos();
                let threshold = self.config.sparse_gap_warning.as_nanos();
                if threshold > 0 && span.unsigned_abs() > threshold {
                    // Whole seconds; sub-second noise adds nothing here.
                    let gap = u64::try_from(span / 1_000_000_000)
                        .map(Duration::from_secs)
                        .unwrap_or(Duration::MAX);
                    warn!(
                        %bracket,
                        gap = %humantime::format_duration(gap),
                        "Sparse sample bracket, estimate precision is reduced"
                    );
                }
            }
            BracketShape::Collapsed | BracketShape::Flat => {
                debug!(%bracket, shape = %bracket.shape(), "Degenerate sample bracket");
            }
        }
    }
}
