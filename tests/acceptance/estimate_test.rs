//! Estimation acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Interpolated times are exact at bracket endpoints
//! - Estimates never decrease as the counter increases
//! - Counters outside the history, and exact sample hits, are unknown
//! - Input order of the samples does not affect any answer
//! - Counter and time estimates invert each other to within one counter

use super::common::{at, history, shuffled_history, HISTORY_LEN};
use clock_common::{DegeneratePolicy, EstimatorConfig, Sample, Timestamp};
use clock_estimator::{
    estimate, estimate_between, estimate_counter, latest_estimate, CounterTimeEstimator, Estimate,
    SampleIndex, SortedSamples, UnknownReason,
};

#[test]
fn test_endpoints_exact_for_every_bracket() {
    let samples = history();
    for pair in samples.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        assert_eq!(
            estimate_between(prev.counter, prev, next),
            Estimate::Known(prev.time)
        );
        assert_eq!(
            estimate_between(next.counter, prev, next),
            Estimate::Known(next.time)
        );
    }
}

#[test]
fn test_monotonic_over_whole_history() {
    let source = SortedSamples::new(history());
    let first = source.as_slice()[0].counter;
    let last = source.as_slice()[HISTORY_LEN - 1].counter;

    let mut previous: Option<Timestamp> = None;
    let mut known = 0usize;
    for target in first..=last {
        if let Some(time) = estimate(target, &source).unwrap().known() {
            if let Some(p) = previous {
                assert!(time >= p, "estimate went backwards at counter {target}");
            }
            previous = Some(time);
            known += 1;
        }
    }
    // Everything except the sample counters themselves is known.
    assert_eq!(known as u64, last - first + 1 - HISTORY_LEN as u64);
}

#[test]
fn test_outside_history_is_unknown() {
    let source = SortedSamples::new(history());
    for target in [0, 999_999, u64::MAX] {
        assert_eq!(
            estimate(target, &source).unwrap(),
            Estimate::Unknown(UnknownReason::NoData)
        );
    }
}

#[test]
fn test_sample_hits_follow_policy() {
    let source = SortedSamples::new(history());
    let plain = CounterTimeEstimator::default();
    let exact = CounterTimeEstimator::new(EstimatorConfig {
        degenerate_policy: DegeneratePolicy::SampleTime,
        ..EstimatorConfig::default()
    });

    for sample in history().iter().step_by(37) {
        assert_eq!(
            plain.estimate(sample.counter, &source).unwrap(),
            Estimate::Unknown(UnknownReason::DegenerateBracket)
        );
        assert_eq!(
            exact.estimate(sample.counter, &source).unwrap(),
            Estimate::Known(sample.time)
        );
    }
}

#[test]
fn test_input_order_does_not_matter() {
    let sorted = SortedSamples::new(history());
    let shuffled = SortedSamples::new(shuffled_history());
    let index: SampleIndex = shuffled_history().into_iter().collect();

    for target in (1_000_000..1_400_000).step_by(997) {
        let expected = estimate(target, &sorted).unwrap();
        assert_eq!(estimate(target, &shuffled).unwrap(), expected);
        assert_eq!(estimate(target, &index).unwrap(), expected);
    }
}

#[test]
fn test_idempotent() {
    let source = SortedSamples::new(history());
    let estimator = CounterTimeEstimator::default();
    for target in [1_000_000, 1_000_001, 1_000_010, 1_123_456, 1_300_000] {
        let first = estimator.estimate(target, &source).unwrap();
        let second = estimator.estimate(target, &source).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_counter_time_round_trip() {
    let source = SortedSamples::new(history());
    for target in (1_000_000..1_400_000).step_by(1_009) {
        let Some(time) = estimate(target, &source).unwrap().known() else {
            continue;
        };
        let back = estimate_counter(time, &source).unwrap().known().unwrap();
        assert!(
            back <= target && target - back <= 1,
            "counter {target} -> {time} -> {back}"
        );
    }
}

#[test]
fn test_large_gap_interpolation() {
    let prev = Sample::new(1, at(0));
    let next = Sample::new(u64::MAX, at(2));
    let mid = estimate_between(u64::MAX / 2 + 1, prev, next).known().unwrap();
    assert_eq!(mid, at(1));
}

#[test]
fn test_latest_change_time() {
    let source = SortedSamples::new(history());
    let samples = history();
    let newest = samples[HISTORY_LEN - 2];
    let counters = [samples[3].counter + 1, newest.counter + 1, 5];
    let latest = latest_estimate(counters, &source).unwrap().known().unwrap();
    assert!(latest > newest.time);
    assert!(latest < samples[HISTORY_LEN - 1].time);
}
