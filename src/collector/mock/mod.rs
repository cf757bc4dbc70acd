//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built host scenarios for testing
//! the collector without touching a real status file or `/proc`.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
pub use scenarios::{CLEAN_RUN_SUMMARY, INCOMPLETE_SUMMARY, SUMMARY_PATH};
