//! Metrics table and unit-test outcome types
//!
//! Defines the key-value table carried between iterations and the typed
//! view over its four known fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::results::ResultsError;

/// Field names the external executable writes into the results file.
pub const FIELD_DEADLOCK: &str = "NUM_DEADLOCK";
pub const FIELD_TXN_FAIL: &str = "NUM_TXN_FAIL";
pub const FIELD_TXN_COMP: &str = "NUM_TXN_COMP";
pub const FIELD_TIME: &str = "TIME";

/// Trailer prefix appended by the runner, never parsed back as a metric.
pub const UNITTEST_FIELD: &str = "UNITTEST";

/// Raw parse output: metric name to value, last occurrence wins.
///
/// Always replaced wholesale after each iteration, never patched in place.
pub type RawMetrics = BTreeMap<String, f64>;

/// The four fields the runner accumulates and feeds forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Deadlock count (`NUM_DEADLOCK`)
    pub deadlocks: f64,
    /// Transaction-failure count (`NUM_TXN_FAIL`)
    pub txn_failures: f64,
    /// Transaction-completion count (`NUM_TXN_COMP`)
    pub txn_completions: f64,
    /// Elapsed time (`TIME`)
    pub elapsed: f64,
}

impl Metrics {
    /// Iteration-zero accumulator with all four fields at zero.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Build the typed view from a parsed table, failing clearly when one
    /// of the four required fields is absent.
    pub fn from_raw(raw: &RawMetrics) -> Result<Self, ResultsError> {
        let get = |name: &'static str| {
            raw.get(name)
                .copied()
                .ok_or(ResultsError::MissingField { field: name })
        };

        Ok(Self {
            deadlocks: get(FIELD_DEADLOCK)?,
            txn_failures: get(FIELD_TXN_FAIL)?,
            txn_completions: get(FIELD_TXN_COMP)?,
            elapsed: get(FIELD_TIME)?,
        })
    }

    /// Render the accumulator as positional arguments for the child
    /// process, in the wire order the executable expects.
    pub fn to_args(&self) -> [String; 4] {
        [
            self.deadlocks.to_string(),
            self.txn_failures.to_string(),
            self.txn_completions.to_string(),
            self.elapsed.to_string(),
        ]
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deadlocks={} txn_fail={} txn_comp={} time={}",
            self.deadlocks, self.txn_failures, self.txn_completions, self.elapsed
        )
    }
}

/// Outcome of the unit-test phase, recorded as the results-file trailer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitTestOutcome {
    Passed,
    Failed,
}

impl UnitTestOutcome {
    /// Classify a child exit code; success is exit 0.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => UnitTestOutcome::Passed,
            _ => UnitTestOutcome::Failed,
        }
    }

    /// The exact trailer line appended to the results file.
    pub fn trailer(&self) -> &'static str {
        match self {
            UnitTestOutcome::Passed => "UNITTEST: passed",
            UnitTestOutcome::Failed => "UNITTEST: failed",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, UnitTestOutcome::Passed)
    }
}

impl fmt::Display for UnitTestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitTestOutcome::Passed => write!(f, "passed"),
            UnitTestOutcome::Failed => write!(f, "failed"),
        }
    }
}
