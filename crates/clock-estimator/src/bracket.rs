//! Bracketing sample pairs.

use clock_common::{span_nanos, Sample};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a bracket, as far as interpolation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketShape {
    /// Both samples share a counter; no rate can be derived.
    Collapsed,
    /// Counters differ but times are equal; no rate can be derived.
    Flat,
    /// Counters increase while time decreases.
    Inverted,
    /// Counters and times both increase.
    Rising,
}

impl fmt::Display for BracketShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collapsed => write!(f, "collapsed"),
            Self::Flat => write!(f, "flat"),
            Self::Inverted => write!(f, "inverted"),
            Self::Rising => write!(f, "rising"),
        }
    }
}

/// The pair of consecutive samples enclosing a target.
///
/// `prev` is the sample at or below the target, `next` the sample at or
/// above it. An exact hit gives `prev == next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Lower sample.
    pub prev: Sample,
    /// Upper sample.
    pub next: Sample,
}

impl Bracket {
    /// Create a bracket from its two samples.
    #[must_use]
    pub fn new(prev: Sample, next: Sample) -> Self {
        Self { prev, next }
    }

    /// A bracket collapsed onto a single sample.
    #[must_use]
    pub fn exact(sample: Sample) -> Self {
        Self {
            prev: sample,
            next: sample,
        }
    }

    /// Counter distance `next - prev`, or `None` if `next` is below `prev`.
    #[must_use]
    pub fn counter_span(&self) -> Option<u64> {
        self.next.counter.checked_sub(self.prev.counter)
    }

    /// Signed wall-clock distance `next - prev` in nanoseconds.
    #[must_use]
    pub fn time_span_nanos(&self) -> i128 {
        span_nanos(self.prev.time, self.next.time)
    }

    /// Classify the bracket.
    ///
    /// A bracket whose counters run backwards is reported as
    /// [`BracketShape::Inverted`] as well; no source produces one.
    #[must_use]
    pub fn shape(&self) -> BracketShape {
        match self.counter_span() {
            Some(0) => BracketShape::Collapsed,
            None => BracketShape::Inverted,
            Some(_) => match self.time_span_nanos() {
                0 => BracketShape::Flat,
                n if n < 0 => BracketShape::Inverted,
                _ => BracketShape::Rising,
            },
        }
    }

    /// Whether `counter` lies within `[prev.counter, next.counter]`.
    #[must_use]
    pub fn contains_counter(&self, counter: u64) -> bool {
        self.prev.counter <= counter && counter <= self.next.counter
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.prev, self.next)
    }
}
