//! Results file handling
//!
//! Parsing of the key-value results protocol and the JSON run report.

mod parser;
mod report;

pub use parser::{append_outcome, parse_results, ResultsError, RESULTS_FILE};
pub use report::{IterationRecord, RunReport, RunStatus, UnitTestRecord};
