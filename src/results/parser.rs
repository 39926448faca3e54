//! Results file parser
//!
//! Reads the newline-delimited `name: value` protocol written by the
//! executable under test.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::models::{RawMetrics, UnitTestOutcome, UNITTEST_FIELD};

/// Well-known results file name, shared with the executable under test.
pub const RESULTS_FILE: &str = "speed_test.results";

/// Errors surfaced by results handling.
#[derive(Debug, Error)]
pub enum ResultsError {
    /// A line did not match `name: number`. Distinct from an open failure:
    /// the file was readable but its content is not trustworthy.
    #[error("malformed results line {line}: {content:?}")]
    Malformed { line: usize, content: String },

    /// A required metric was absent after a successful parse.
    #[error("results file is missing required field {field}")]
    MissingField { field: &'static str },
}

/// Parse a results file into a raw metrics table.
///
/// A file that cannot be opened is reported and treated as an empty table;
/// the run starts from zero rather than aborting. Malformed content is a
/// hard error so that a crashed child cannot smuggle garbage into the
/// accumulator unnoticed.
pub fn parse_results(path: impl AsRef<Path>) -> Result<RawMetrics, ResultsError> {
    let path = path.as_ref();
    let mut table = RawMetrics::new();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Cannot open results file {}: {}", path.display(), e);
            return Ok(table);
        }
    };

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(l) => l,
            Err(_) => {
                // Non-UTF8 or I/O error mid-file counts as malformed content.
                return Err(ResultsError::Malformed {
                    line: line_no,
                    content: "<unreadable line>".to_string(),
                });
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let Some((field, value)) = line.split_once(':') else {
            return Err(ResultsError::Malformed {
                line: line_no,
                content: line,
            });
        };

        let field = field.trim();

        // Trailer written by a previous run; not a metric, skip it.
        if field == UNITTEST_FIELD {
            continue;
        }

        let Ok(value) = value.trim().parse::<f64>() else {
            return Err(ResultsError::Malformed {
                line: line_no,
                content: line,
            });
        };

        table.insert(field.to_string(), value);
    }

    Ok(table)
}

/// Append the unit-test trailer line to the results file.
pub fn append_outcome(path: impl AsRef<Path>, outcome: UnitTestOutcome) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {} for trailer append", path.display()))?;

    writeln!(file, "{}", outcome.trailer())
        .with_context(|| format!("appending trailer to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_results(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join(RESULTS_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_well_formed() {
        let dir = tempdir().unwrap();
        let path = write_results(
            dir.path(),
            "NUM_DEADLOCK: 3\nNUM_TXN_FAIL: 0\nNUM_TXN_COMP: 17\nTIME: 12.5\n",
        );

        let table = parse_results(&path).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table["NUM_DEADLOCK"], 3.0);
        assert_eq!(table["TIME"], 12.5);
    }

    #[test]
    fn test_parse_exact_two_keys() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "NUM_DEADLOCK: 3\nTIME: 12.5\n");

        let table = parse_results(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["NUM_DEADLOCK"], 3.0);
        assert_eq!(table["TIME"], 12.5);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "TIME: 1.0\nTIME: 2.0\nTIME: 3.5\n");

        let table = parse_results(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table["TIME"], 3.5);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "\nTIME: 1.0\n\n   \nNUM_DEADLOCK: 2\n");

        let table = parse_results(&path).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_file_yields_empty_table() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "");

        let table = parse_results(&path).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_table() {
        let dir = tempdir().unwrap();
        let table = parse_results(dir.path().join("no_such_file")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let dir = tempdir().unwrap();
        // Second colon belongs to the value and fails the number parse.
        let path = write_results(dir.path(), "TIME: 1:2\n");

        let err = parse_results(&path).unwrap_err();
        assert!(matches!(err, ResultsError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_line_without_colon_is_malformed() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "TIME: 1.0\ngarbage line\n");

        let err = parse_results(&path).unwrap_err();
        match err {
            ResultsError::Malformed { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "garbage line");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_value_is_malformed() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "TIME: fast\n");

        assert!(matches!(
            parse_results(&path),
            Err(ResultsError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_trailer_line_is_skipped() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "TIME: 1.0\nUNITTEST: passed\n");

        let table = parse_results(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table["TIME"], 1.0);
    }

    #[test]
    fn test_append_outcome_passed() {
        let dir = tempdir().unwrap();
        let path = write_results(dir.path(), "TIME: 1.0\n");

        append_outcome(&path, UnitTestOutcome::Passed).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "TIME: 1.0\nUNITTEST: passed\n");
    }

    #[test]
    fn test_append_outcome_failed_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE);

        append_outcome(&path, UnitTestOutcome::Failed).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "UNITTEST: failed\n");
    }
}
