//! Run report
//!
//! A JSON record of one harness run: what was invoked, with which seeds,
//! what came back. Diagnostic output only; the harness never reads it back.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::models::{Metrics, UnitTestOutcome};

/// Overall status of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Both phases executed.
    Completed,
    /// Preflight failed; nothing was invoked.
    MissingExecutable,
}

/// One speed-test iteration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration number, 1-based
    pub iteration: u32,

    /// Sub-seed passed to the child process
    pub sub_seed: f64,

    /// Child exit code, None when killed by a signal
    pub exit_code: Option<i32>,

    /// Accumulator state after re-parsing the results file
    pub metrics: Metrics,
}

/// The unit-test phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitTestRecord {
    /// Child exit code, None when killed by a signal
    pub exit_code: Option<i32>,

    /// Pass/fail classification of the exit code
    pub outcome: UnitTestOutcome,
}

/// Full record of one harness run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Test name (the executable path as given)
    pub test: String,

    /// Master seed the run was started with
    pub seed: u64,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Overall status
    pub status: RunStatus,

    /// Per-iteration records, in execution order
    pub iterations: Vec<IterationRecord>,

    /// Unit-test phase record, absent when preflight failed
    pub unit_test: Option<UnitTestRecord>,
}

impl RunReport {
    /// Final accumulator state, when any iteration ran.
    pub fn final_metrics(&self) -> Option<Metrics> {
        self.iterations.last().map(|it| it.metrics)
    }

    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Run report saved to {}", path.display());
        Ok(())
    }
}
