//! Counter window acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Windows inside the history map to interpolated counters
//! - Endpoints on sample times map to those samples' counters
//! - Out-of-range endpoints clamp or stay unresolved per policy
//! - Wider time windows never give narrower counter windows

use super::common::{at, history, HISTORY_LEN};
use clock_common::{ClockError, OutOfRangePolicy};
use clock_estimator::{resolve_window, CounterTimeEstimator, SortedSamples};

#[test]
fn test_window_on_sample_boundaries() {
    let samples = history();
    let source = SortedSamples::new(history());
    let estimator = CounterTimeEstimator::default();

    let window = resolve_window(
        &estimator,
        &source,
        samples[10].time,
        samples[20].time,
        OutOfRangePolicy::Strict,
    )
    .unwrap();
    assert_eq!(
        window.as_range(),
        Some(samples[10].counter..=samples[20].counter)
    );
}

#[test]
fn test_window_nesting() {
    let source = SortedSamples::new(history());
    let estimator = CounterTimeEstimator::default();

    let inner = resolve_window(&estimator, &source, at(601), at(1203), OutOfRangePolicy::Strict)
        .unwrap()
        .as_range()
        .unwrap();
    let outer = resolve_window(&estimator, &source, at(598), at(1207), OutOfRangePolicy::Strict)
        .unwrap()
        .as_range()
        .unwrap();
    assert!(outer.start() <= inner.start());
    assert!(outer.end() >= inner.end());
}

#[test]
fn test_window_beyond_history() {
    let samples = history();
    let source = SortedSamples::new(history());
    let estimator = CounterTimeEstimator::default();

    let clamped = resolve_window(&estimator, &source, at(-3600), at(86_400), OutOfRangePolicy::Clamp)
        .unwrap();
    assert_eq!(
        clamped.as_range(),
        Some(samples[0].counter..=samples[HISTORY_LEN - 1].counter)
    );

    let strict = resolve_window(&estimator, &source, at(-3600), at(86_400), OutOfRangePolicy::Strict)
        .unwrap();
    assert_eq!(strict.from, None);
    assert_eq!(strict.to, None);
}

#[test]
fn test_reversed_window_rejected() {
    let source = SortedSamples::new(history());
    let estimator = CounterTimeEstimator::default();
    let result = resolve_window(&estimator, &source, at(20), at(10), OutOfRangePolicy::Clamp);
    assert!(matches!(result, Err(ClockError::InvalidWindow { .. })));
}
