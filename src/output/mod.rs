//! Output formatting module
//!
//! Console rendering for parsed metrics and run reports.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
