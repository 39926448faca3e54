//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Iterative speed-test harness with a key-value results protocol
#[derive(Parser, Debug)]
#[command(name = "speed-harness")]
#[command(version = "0.1.0")]
#[command(about = "Run a speed test twice, aggregate its results, then run its unit tests")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (shorthand for --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the harness against an executable under test
    Run(RunArgs),

    /// Parse and display a results file
    Parse(ParseArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the executable under test, relative to the base directory
    #[arg(default_value = "tests/speed_test")]
    pub test: String,

    /// Master seed for the per-run random generator
    #[arg(short, long, default_value = "234567")]
    pub seed: u64,

    /// Base directory holding the executable, shared libraries, and contest
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// Opaque pass-through constants for the child process
    #[arg(long, num_args = 2, value_names = ["A", "B"], default_values = ["30", "50"])]
    pub extra: Vec<u32>,

    /// Output format for the final summary (table, json, json-pretty)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Save the JSON run report to a file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for parse command
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Results file to parse
    #[arg(default_value = "speed_test.results")]
    pub file: String,

    /// Output format (table, json, json-pretty)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}
