//! Data models for the speed-test harness
//!
//! This module contains all data structures used throughout the application.

mod descriptor;
mod metrics;

pub use descriptor::TestSpec;
pub use metrics::{Metrics, RawMetrics, UnitTestOutcome, UNITTEST_FIELD};
