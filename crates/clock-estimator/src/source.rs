//! Sample sources.
//!
//! The estimator only needs one capability from wherever samples live:
//! given a target counter, return the immediately bracketing pair of
//! samples, or nothing. [`SampleSource`] is that capability.
//! [`TimeBracketSource`] adds the same lookup keyed on time, which the
//! inverse mapping and window resolution need.
//!
//! Two in-memory implementations are provided:
//!
//! - [`SortedSamples`]: a sorted `Vec`, searched with `partition_point`
//! - [`SampleIndex`]: a `BTreeMap` keyed on counter, for append-style use

use crate::bracket::Bracket;
use clock_common::{Sample, Timestamp};
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Counter-keyed bracket lookup.
pub trait SampleSource {
    /// Error raised by the lookup. In-memory sources use [`Infallible`].
    type Error;

    /// Return the smallest enclosing pair of samples for `counter`.
    ///
    /// `prev` is the latest sample with `counter <= target` and `next` the
    /// earliest with `counter >= target`; an exact hit yields the same
    /// sample on both sides. `None` when the target lies outside the
    /// sampled history.
    fn bracket(&self, counter: u64) -> Result<Option<Bracket>, Self::Error>;
}

/// Time-keyed bracket lookup plus the history bounds.
pub trait TimeBracketSource: SampleSource {
    /// Return the pair of adjacent samples whose times enclose `time`.
    ///
    /// Same tie rule as [`SampleSource::bracket`], applied to time.
    fn time_bracket(&self, time: Timestamp) -> Result<Option<Bracket>, Self::Error>;

    /// Sample with the lowest counter.
    fn earliest(&self) -> Result<Option<Sample>, Self::Error>;

    /// Sample with the highest counter.
    fn latest(&self) -> Result<Option<Sample>, Self::Error>;
}

impl<S: SampleSource + ?Sized> SampleSource for &S {
    type Error = S::Error;

    fn bracket(&self, counter: u64) -> Result<Option<Bracket>, Self::Error> {
        (**self).bracket(counter)
    }
}

impl<S: TimeBracketSource + ?Sized> TimeBracketSource for &S {
    fn time_bracket(&self, time: Timestamp) -> Result<Option<Bracket>, Self::Error> {
        (**self).time_bracket(time)
    }

    fn earliest(&self) -> Result<Option<Sample>, Self::Error> {
        (**self).earliest()
    }

    fn latest(&self) -> Result<Option<Sample>, Self::Error> {
        (**self).latest()
    }
}

/// Bracket `counter` within a slice sorted by counter.
///
/// Duplicate counters are allowed; a target equal to a duplicated counter
/// brackets the last and first of the duplicates, which is collapsed.
#[must_use]
pub fn bracket_sorted(samples: &[Sample], counter: u64) -> Option<Bracket> {
    let at_or_below = samples.partition_point(|s| s.counter <= counter);
    let prev = samples[..at_or_below].last()?;
    let below = samples.partition_point(|s| s.counter < counter);
    let next = samples.get(below)?;
    Some(Bracket::new(*prev, *next))
}

/// Bracket `time` within a counter-ordered sequence of samples that is not
/// known to be time-ordered, by scanning adjacent pairs.
///
/// An exact time hit takes precedence and spans every sample observed at
/// that instant, lowest counter first. Adjacent pairs that run backwards
/// in time still bracket a time between them, so the caller sees an
/// inverted bracket instead of a silently skipped one.
fn scan_time_bracket<I>(samples: I, time: Timestamp) -> Option<Bracket>
where
    I: IntoIterator<Item = Sample>,
{
    let mut prev: Option<Sample> = None;
    let mut enclosing: Option<Bracket> = None;
    let mut hits: Option<(Sample, Sample)> = None;
    for sample in samples {
        if sample.time == time {
            hits = Some((hits.map_or(sample, |(first, _)| first), sample));
        }
        if let (Some(p), None) = (prev, enclosing) {
            let between = (p.time < time && time < sample.time)
                || (sample.time < time && time < p.time);
            if between {
                enclosing = Some(Bracket::new(p, sample));
            }
        }
        prev = Some(sample);
    }
    hits.map(|(first, last)| Bracket::new(first, last)).or(enclosing)
}

/// Samples held in a `Vec` sorted by counter.
#[derive(Debug, Clone)]
pub struct SortedSamples {
    samples: Vec<Sample>,
    time_ordered: bool,
}

impl SortedSamples {
    /// Build from samples in any order.
    ///
    /// The sort is stable, so samples sharing a counter keep their input order.
    #[must_use]
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.counter);
        let time_ordered = samples.windows(2).all(|w| w[0].time <= w[1].time);
        Self {
            samples,
            time_ordered,
        }
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether times are non-decreasing in counter order.
    #[must_use]
    pub fn is_time_ordered(&self) -> bool {
        self.time_ordered
    }

    /// The samples, sorted by counter.
    #[must_use]
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Bracket `counter` without going through the trait.
    #[must_use]
    pub fn bracket_of(&self, counter: u64) -> Option<Bracket> {
        bracket_sorted(&self.samples, counter)
    }

    fn time_bracket_of(&self, time: Timestamp) -> Option<Bracket> {
        if !self.time_ordered {
            return scan_time_bracket(self.samples.iter().copied(), time);
        }
        let at_or_below = self.samples.partition_point(|s| s.time <= time);
        let below = self.samples.partition_point(|s| s.time < time);
        if below < at_or_below {
            // Samples tied at `time`, lowest counter first.
            let tied = &self.samples[below..at_or_below];
            return Some(Bracket::new(tied[0], tied[tied.len() - 1]));
        }
        let prev = self.samples[..at_or_below].last()?;
        let next = self.samples.get(below)?;
        Some(Bracket::new(*prev, *next))
    }
}

impl Default for SortedSamples {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Sample>> for SortedSamples {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<Sample> for SortedSamples {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl SampleSource for SortedSamples {
    type Error = Infallible;

    fn bracket(&self, counter: u64) -> Result<Option<Bracket>, Self::Error> {
        Ok(self.bracket_of(counter))
    }
}

impl TimeBracketSource for SortedSamples {
    fn time_bracket(&self, time: Timestamp) -> Result<Option<Bracket>, Self::Error> {
        Ok(self.time_bracket_of(time))
    }

    fn earliest(&self) -> Result<Option<Sample>, Self::Error> {
        Ok(self.samples.first().copied())
    }

    fn latest(&self) -> Result<Option<Sample>, Self::Error> {
        Ok(self.samples.last().copied())
    }
}

/// Ordered-map sample index keyed on counter.
///
/// Suited to histories that grow by appending observations. Each counter
/// holds at most one time, so duplicate counters cannot occur here.
#[derive(Debug, Clone, Default)]
pub struct SampleIndex {
    by_counter: BTreeMap<u64, Timestamp>,
}

impl SampleIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation, returning the time it replaced, if any.
    pub fn record(&mut self, sample: Sample) -> Option<Timestamp> {
        self.by_counter.insert(sample.counter, sample.time)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_counter.len()
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_counter.is_empty()
    }

    /// Samples in counter order.
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.by_counter
            .iter()
            .map(|(&counter, &time)| Sample::new(counter, time))
    }
}

impl FromIterator<Sample> for SampleIndex {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl Extend<Sample> for SampleIndex {
    fn extend<T: IntoIterator<Item = Sample>>(&mut self, iter: T) {
        for sample in iter {
            self.record(sample);
        }
    }
}

impl SampleSource for SampleIndex {
    type Error = Infallible;

    fn bracket(&self, counter: u64) -> Result<Option<Bracket>, Self::Error> {
        let prev = self.by_counter.range(..=counter).next_back();
        let next = self.by_counter.range(counter..).next();
        Ok(match (prev, next) {
            (Some((&pc, &pt)), Some((&nc, &nt))) => {
                Some(Bracket::new(Sample::new(pc, pt), Sample::new(nc, nt)))
            }
            _ => None,
        })
    }
}

impl TimeBracketSource for SampleIndex {
    fn time_bracket(&self, time: Timestamp) -> Result<Option<Bracket>, Self::Error> {
        Ok(scan_time_bracket(self.iter(), time))
    }

    fn earliest(&self) -> Result<Option<Sample>, Self::Error> {
        Ok(self
            .by_counter
            .first_key_value()
            .map(|(&counter, &time)| Sample::new(counter, time)))
    }

    fn latest(&self) -> Result<Option<Sample>, Self::Error> {
        Ok(self
            .by_counter
            .last_key_value()
            .map(|(&counter, &time)| Sample::new(counter, time)))
    }
}
