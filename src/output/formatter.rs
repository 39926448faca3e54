//! Output formatters
//!
//! Provides Table and JSON output for metrics tables and run reports.

use crate::models::RawMetrics;
use crate::results::{RunReport, RunStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a parsed metrics table
    pub fn format_metrics(&self, metrics: &RawMetrics) -> String {
        match self.format {
            OutputFormat::Table => self.format_metrics_table(metrics),
            OutputFormat::Json => serde_json::to_string(metrics).unwrap_or_default(),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(metrics).unwrap_or_default()
            }
        }
    }

    fn format_metrics_table(&self, metrics: &RawMetrics) -> String {
        if metrics.is_empty() {
            return "(empty results table)".to_string();
        }

        let width = metrics.keys().map(|k| k.len()).max().unwrap_or(0);
        metrics
            .iter()
            .map(|(name, value)| format!("{name:width$}  {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a run report summary
    pub fn format_report(&self, report: &RunReport) -> String {
        match self.format {
            OutputFormat::Table => self.format_report_table(report),
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(report).unwrap_or_default()
            }
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut out = format!("Test '{}' (seed {})\n", report.test, report.seed);

        match report.status {
            RunStatus::MissingExecutable => {
                out.push_str("  executable not found, run skipped\n");
                return out;
            }
            RunStatus::Completed => {}
        }

        for it in &report.iterations {
            out.push_str(&format!(
                "  iteration {}: exit={} time={}\n",
                it.iteration,
                it.exit_code.map_or("signal".to_string(), |c| c.to_string()),
                it.metrics.elapsed
            ));
        }

        if let Some(metrics) = report.final_metrics() {
            out.push_str(&format!("  final: {metrics}\n"));
        }

        if let Some(unit_test) = &report.unit_test {
            out.push_str(&format!("  unit test: {}\n", unit_test.outcome));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::from_str("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_metrics_table_rendering() {
        let mut metrics = RawMetrics::new();
        metrics.insert("TIME".to_string(), 12.5);
        metrics.insert("NUM_DEADLOCK".to_string(), 3.0);

        let out = ResultFormatter::new(OutputFormat::Table).format_metrics(&metrics);
        assert!(out.contains("NUM_DEADLOCK  3"));
        assert!(out.contains("TIME"));
    }

    #[test]
    fn test_empty_metrics_table() {
        let out = ResultFormatter::new(OutputFormat::Table).format_metrics(&RawMetrics::new());
        assert_eq!(out, "(empty results table)");
    }

    #[test]
    fn test_metrics_json_round_trips() {
        let mut metrics = RawMetrics::new();
        metrics.insert("TIME".to_string(), 12.5);

        let out = ResultFormatter::new(OutputFormat::Json).format_metrics(&metrics);
        let back: RawMetrics = serde_json::from_str(&out).unwrap();
        assert_eq!(back, metrics);
    }
}
