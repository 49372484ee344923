#![doc = "Common types shared across the commit-clock workspace."]

pub mod config;
pub mod error;
pub mod metrics;
pub mod sample_file;
pub mod time;

pub use config::*;
pub use error::*;
pub use metrics::*;
pub use sample_file::*;
pub use time::*;
