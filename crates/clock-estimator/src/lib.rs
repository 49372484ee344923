//! Counter-to-time estimation over sparse sample histories.
//!
//! This crate maps a logical commit counter to an approximate wall-clock
//! time, given irregular `(counter, time)` observations:
//!
//! - **Sources** ([`source`]): the bracket lookup capability, with sorted-slice
//!   and ordered-map implementations
//! - **Brackets** ([`bracket`]): enclosing sample pairs and their shape
//! - **Estimator** ([`estimator`]): interpolation with explicit "unknown" outcomes
//! - **Windows** ([`window`]): time window to counter window resolution
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use clock_common::Sample;
//! use clock_estimator::{estimate, Estimate, SortedSamples, UnknownReason};
//!
//! let t0 = Utc.with_ymd_and_hms(2025, 10, 9, 0, 0, 0).unwrap();
//! let samples = SortedSamples::new(vec![
//!     Sample::new(1000, t0),
//!     Sample::new(2000, t0 + chrono::Duration::seconds(1000)),
//! ]);
//!
//! // Halfway between the samples
//! let est = estimate(1500, &samples).unwrap();
//! assert_eq!(est, Estimate::Known(t0 + chrono::Duration::seconds(500)));
//!
//! // Before the first sample
//! let est = estimate(10, &samples).unwrap();
//! assert_eq!(est, Estimate::Unknown(UnknownReason::NoData));
//! ```

pub mod bracket;
pub mod estimator;
pub mod source;
pub mod window;

// Re-export main types for convenience
pub use bracket::{Bracket, BracketShape};
pub use estimator::{
    estimate, estimate_between, estimate_counter, interpolate_counter, interpolate_time,
    latest_estimate, CounterEstimate, CounterTimeEstimator, Estimate, UnknownReason,
};
pub use source::{bracket_sorted, SampleIndex, SampleSource, SortedSamples, TimeBracketSource};
pub use window::{resolve_window, CounterWindow};
