//! Test harness engine
//!
//! Scratch-directory staging and the run/aggregate/feed-forward loop.

mod runner;
mod scratch;

pub use runner::TestHarness;
pub use scratch::{Platform, ScratchDir};
