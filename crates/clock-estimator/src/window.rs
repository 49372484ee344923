//! Time window to counter window resolution.
//!
//! A range query over a versioned store is issued in counters, while users
//! ask for time ranges. [`resolve_window`] maps both endpoints of
//! `[from, to]` through the inverse estimator and applies an
//! [`OutOfRangePolicy`] to endpoints outside the sampled history.

use crate::estimator::{CounterTimeEstimator, Estimate, UnknownReason};
use crate::source::TimeBracketSource;
use clock_common::{ClockError, ClockResult, OutOfRangePolicy, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

/// A counter range resolved from a time window.
///
/// An endpoint is `None` when it could not be resolved under the active
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterWindow {
    /// Counter at the start of the window.
    pub from: Option<u64>,
    /// Counter at the end of the window.
    pub to: Option<u64>,
}

impl CounterWindow {
    /// Whether both endpoints resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// The window as an inclusive range, if both endpoints resolved.
    #[must_use]
    pub fn as_range(&self) -> Option<RangeInclusive<u64>> {
        Some(self.from?..=self.to?)
    }
}

impl fmt::Display for CounterWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |c: Option<u64>| c.map_or_else(|| "?".to_string(), |c| c.to_string());
        write!(f, "[{} ..= {}]", show(self.from), show(self.to))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    From,
    To,
}

fn source_error<E: fmt::Display>(err: E) -> ClockError {
    ClockError::Source(err.to_string())
}

fn resolve_endpoint<S>(
    estimator: &CounterTimeEstimator,
    source: &S,
    time: Timestamp,
    edge: Edge,
    policy: OutOfRangePolicy,
) -> ClockResult<Option<u64>>
where
    S: TimeBracketSource,
    S::Error: fmt::Display,
{
    let estimate = estimator
        .estimate_counter(time, source)
        .map_err(source_error)?;
    let reason = match estimate {
        Estimate::Known(counter) => return Ok(Some(counter)),
        Estimate::Unknown(reason) => reason,
    };

    match reason {
        // Endpoint sits exactly on a sample time; widen to cover every
        // counter observed at that instant.
        UnknownReason::DegenerateBracket => {
            let bracket = source.time_bracket(time).map_err(source_error)?;
            Ok(bracket.map(|b| match edge {
                Edge::From => b.prev.counter.min(b.next.counter),
                Edge::To => b.prev.counter.max(b.next.counter),
            }))
        }
        UnknownReason::NoData if policy == OutOfRangePolicy::Clamp => {
            let earliest = source.earliest().map_err(source_error)?;
            let latest = source.latest().map_err(source_error)?;
            Ok(match (earliest, latest) {
                (Some(first), _) if time < first.time => Some(first.counter),
                (_, Some(last)) if time > last.time => Some(last.counter),
                _ => None,
            })
        }
        UnknownReason::NoData | UnknownReason::InvertedBracket | UnknownReason::Unrepresentable => {
            Ok(None)
        }
    }
}

/// Resolve the time window `[from, to]` into a counter window.
///
/// # Errors
///
/// Returns [`ClockError::InvalidWindow`] if `from > to`, or
/// [`ClockError::Source`] if a lookup fails.
pub fn resolve_window<S>(
    estimator: &CounterTimeEstimator,
    source: &S,
    from: Timestamp,
    to: Timestamp,
    policy: OutOfRangePolicy,
) -> ClockResult<CounterWindow>
where
    S: TimeBracketSource,
    S::Error: fmt::Display,
{
    if from > to {
        return Err(ClockError::InvalidWindow {
            from: from.to_rfc3339(),
            to: to.to_rfc3339(),
        });
    }

    let window = CounterWindow {
        from: resolve_endpoint(estimator, source, from, Edge::From, policy)?,
        to: resolve_endpoint(estimator, source, to, Edge::To, policy)?,
    };
    debug!(
        from = %from.to_rfc3339(),
        to = %to.to_rfc3339(),
        ?policy,
        %window,
        "Resolved counter window"
    );
    Ok(window)
}
