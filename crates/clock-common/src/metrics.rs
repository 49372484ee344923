//! Estimation outcome counters.
//!
//! Counters are relaxed atomics so a single [`EstimateStats`] can be shared
//! between threads that estimate concurrently.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Classification of an estimation outcome, as counted by [`EstimateStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// An estimate was produced.
    Known,
    /// No bracket enclosed the target.
    NoData,
    /// The bracket had zero counter width.
    Degenerate,
    /// The bracket ran backwards in time.
    Inverted,
    /// The interpolated value could not be represented.
    Unrepresentable,
}

/// Shared outcome counters.
#[derive(Debug, Default)]
pub struct EstimateStats {
    known: AtomicU64,
    no_data: AtomicU64,
    degenerate: AtomicU64,
    inverted: AtomicU64,
    unrepresentable: AtomicU64,
}

/// Point-in-time copy of [`EstimateStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Estimates produced.
    pub known: u64,
    /// Targets outside the sampled history.
    pub no_data: u64,
    /// Zero-width brackets.
    pub degenerate: u64,
    /// Brackets running backwards in time.
    pub inverted: u64,
    /// Unrepresentable results.
    pub unrepresentable: u64,
}

impl StatsSnapshot {
    /// Total outcomes recorded.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.known + self.no_data + self.degenerate + self.inverted + self.unrepresentable
    }

    /// Fraction of outcomes that produced an estimate.
    ///
    /// Returns `None` if nothing has been recorded.
    #[must_use]
    pub fn hit_ratio(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            None
        } else {
            Some(self.known as f64 / total as f64)
        }
    }
}

impl EstimateStats {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn record(&self, kind: OutcomeKind) {
        let counter = match kind {
            OutcomeKind::Known => &self.known,
            OutcomeKind::NoData => &self.no_data,
            OutcomeKind::Degenerate => &self.degenerate,
            OutcomeKind::Inverted => &self.inverted,
            OutcomeKind::Unrepresentable => &self.unrepresentable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            known: self.known.load(Ordering::Relaxed),
            no_data: self.no_data.load(Ordering::Relaxed),
            degenerate: self.degenerate.load(Ordering::Relaxed),
            inverted: self.inverted.load(Ordering::Relaxed),
            unrepresentable: self.unrepresentable.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.known.store(0, Ordering::Relaxed);
        self.no_data.store(0, Ordering::Relaxed);
        self.degenerate.store(0, Ordering::Relaxed);
        self.inverted.store(0, Ordering::Relaxed);
        self.unrepresentable.store(0, Ordering::Relaxed);
    }
}
