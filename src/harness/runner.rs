//! Test runner
//!
//! Drives the run/aggregate/feed-forward loop: a fixed number of speed-test
//! iterations against the executable under test, then one unit-test
//! invocation, then the pass/fail trailer.

#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::harness::{Platform, ScratchDir};
use crate::models::{Metrics, TestSpec, UnitTestOutcome};
use crate::results::{
    append_outcome, parse_results, IterationRecord, RunReport, RunStatus, UnitTestRecord,
    RESULTS_FILE,
};

/// Fixed number of speed-test iterations per run.
const SPEED_TEST_ROUNDS: u32 = 2;

/// Sub-seeds are drawn uniformly from [0, 100000).
const SUB_SEED_SPAN: f64 = 100_000.0;

/// Name of the unit-test executable, expected in the base directory.
const UNIT_TEST_EXECUTABLE: &str = "contest";

/// Harness for a single test run.
///
/// A run is a pure function of the descriptor: (test path, seed) determine
/// the sub-seed sequence and the sequence of child invocations; the effect
/// is the final results file, the report, and the log.
pub struct TestHarness {
    spec: TestSpec,
    platform: Platform,
}

impl TestHarness {
    pub fn new(spec: TestSpec) -> Self {
        Self {
            spec,
            platform: Platform::current(),
        }
    }

    /// Override platform detection.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Execute the full run.
    ///
    /// A missing executable is a soft failure: the run is reported and
    /// skipped without an error reaching the caller. Speed-test child exit
    /// codes are captured and logged but never acted upon; only the
    /// unit-test exit code decides the trailer.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        info!(
            "Running test '{}' with seed {}",
            self.spec.name(),
            self.spec.seed
        );

        let executable = self.spec.executable();
        if !executable.exists() {
            warn!(
                "Cannot find the executable for test '{}' at {}. Did you remember to build it?",
                self.spec.name(),
                executable.display()
            );
            return Ok(RunReport {
                test: self.spec.name().to_string(),
                seed: self.spec.seed,
                started_at,
                completed_at: Utc::now(),
                status: RunStatus::MissingExecutable,
                iterations: Vec::new(),
                unit_test: None,
            });
        }

        // Children run from inside the scratch directory, so resolve paths
        // before the working directory changes out from under them.
        let executable = tokio::fs::canonicalize(&executable)
            .await
            .with_context(|| format!("resolving {}", executable.display()))?;
        let base = tokio::fs::canonicalize(&self.spec.base_dir)
            .await
            .with_context(|| format!("resolving {}", self.spec.base_dir.display()))?;
        let results_path = base.join(RESULTS_FILE);
        let library = base.join(self.platform.shared_library());

        let mut rng = StdRng::seed_from_u64(self.spec.seed);
        let mut accumulator = Metrics::zeroed();
        let mut iterations = Vec::new();

        for iteration in 1..=SPEED_TEST_ROUNDS {
            let scratch =
                ScratchDir::create(&base, &format!("scratch-iter{iteration}")).await?;
            scratch.stage(&library).await;

            let sub_seed = rng.random::<f64>() * SUB_SEED_SPAN;
            debug!("Iteration {iteration}: sub-seed {sub_seed}");

            let exit_code = self
                .invoke_speed_test(&executable, scratch.path(), sub_seed, &accumulator)
                .await;

            scratch.retrieve(RESULTS_FILE, &results_path).await;

            accumulator = reparse(&results_path);
            info!("time = {}", accumulator.elapsed);

            iterations.push(IterationRecord {
                iteration,
                sub_seed,
                exit_code,
                metrics: accumulator,
            });

            scratch.teardown().await?;
        }

        let unit_test = self.run_unit_test(&base, &library).await?;
        if !unit_test.outcome.is_passed() {
            error!("Test '{}' failed the unit tests", self.spec.name());
        }
        append_outcome(&results_path, unit_test.outcome)?;

        info!("Finished running test '{}'", self.spec.name());

        Ok(RunReport {
            test: self.spec.name().to_string(),
            seed: self.spec.seed,
            started_at,
            completed_at: Utc::now(),
            status: RunStatus::Completed,
            iterations,
            unit_test: Some(unit_test),
        })
    }

    /// Invoke the executable under test inside the scratch directory.
    async fn invoke_speed_test(
        &self,
        executable: &Path,
        scratch: &Path,
        sub_seed: f64,
        accumulator: &Metrics,
    ) -> Option<i32> {
        let (extra_a, extra_b) = self.spec.extra_args;
        let mut command = Command::new(executable);
        command
            .arg(sub_seed.to_string())
            .args(accumulator.to_args())
            .arg(extra_a.to_string())
            .arg(extra_b.to_string())
            .current_dir(scratch);

        run_child(command, "speed test").await
    }

    /// Stage and invoke the unit-test executable in its own scratch
    /// directory.
    async fn run_unit_test(&self, base: &Path, library: &Path) -> Result<UnitTestRecord> {
        let scratch = ScratchDir::create(base, "scratch-unittest").await?;
        scratch.stage(&base.join(UNIT_TEST_EXECUTABLE)).await;
        scratch.stage(library).await;

        let mut command = Command::new(scratch.path().join(UNIT_TEST_EXECUTABLE));
        command.current_dir(scratch.path());
        let exit_code = run_child(command, "unit test").await;

        scratch.teardown().await?;

        Ok(UnitTestRecord {
            exit_code,
            outcome: UnitTestOutcome::from_exit_code(exit_code),
        })
    }
}

/// Run a child process to completion, capturing its exit code.
///
/// Failures are observable in the log but do not abort the run.
async fn run_child(mut command: Command, what: &str) -> Option<i32> {
    match command.status().await {
        Ok(status) => {
            debug!("{what} child exited with {status}");
            status.code()
        }
        Err(e) => {
            warn!("Failed to run {what} child: {e}");
            None
        }
    }
}

/// Re-parse the well-known results file into a fresh accumulator.
///
/// Malformed content and missing required fields are reported and reset the
/// accumulator to zero; the iteration count never depends on file content.
fn reparse(results_path: &Path) -> Metrics {
    let raw = match parse_results(results_path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Results file {}: {}", results_path.display(), e);
            return Metrics::zeroed();
        }
    };

    match Metrics::from_raw(&raw) {
        Ok(metrics) => metrics,
        Err(e) => {
            error!("Results file {}: {}", results_path.display(), e);
            Metrics::zeroed()
        }
    }
}
