//! Acceptance tests for commit-clock.
//!
//! These tests verify the estimator contract end to end:
//! - Estimation properties over a realistic sample history
//! - Sample files on disk feeding the estimator
//! - Time window resolution under both out-of-range policies

mod acceptance;
