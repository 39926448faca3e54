//! speed-harness - iterative speed-test harness
//!
//! Invokes an executable under test with a set of numeric parameters, reads
//! back a key-value results file, repeats the loop to accumulate running
//! statistics, then runs the `contest` unit-test executable and appends a
//! pass/fail trailer to the results file.
//!
//! ## Usage
//!
//! ```bash
//! # Run the default test with the default seed
//! speed-harness run
//!
//! # Run a specific test with a fixed seed, saving a JSON run report
//! speed-harness run tests/speed_test --seed 234567 --output report.json
//!
//! # Inspect a results file
//! speed-harness parse speed_test.results --format json-pretty
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;
mod harness;
mod models;
mod output;
mod results;
mod utils;

use cli::Args;
use harness::TestHarness;
use models::TestSpec;
use output::{OutputFormat, ResultFormatter};
use utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::from_str(&args.log_level).unwrap_or(LogLevel::Info)
    };
    init_logger(level);

    match args.command {
        cli::Command::Run(run_args) => run_harness(run_args).await?,
        cli::Command::Parse(parse_args) => parse_file(parse_args)?,
    }

    Ok(())
}

async fn run_harness(args: cli::RunArgs) -> Result<()> {
    let mut spec = TestSpec::new(&args.test, args.seed).with_base_dir(&args.dir);
    if let [a, b] = args.extra[..] {
        spec = spec.with_extra_args(a, b);
    }

    let report = TestHarness::new(spec).run().await?;

    let formatter = ResultFormatter::new(
        OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table),
    );
    println!("{}", formatter.format_report(&report));

    if let Some(path) = args.output {
        report.save_json(path)?;
    }

    Ok(())
}

fn parse_file(args: cli::ParseArgs) -> Result<()> {
    let table = results::parse_results(&args.file)?;

    let formatter = ResultFormatter::new(
        OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table),
    );
    println!("{}", formatter.format_metrics(&table));

    Ok(())
}
