//! Acceptance suites, grouped by concern.

mod common;
mod estimate_test;
mod sample_file_test;
mod window_test;
