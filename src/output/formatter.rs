//! Output formatters for suite results
//!
//! Provides table, JSON and summary output formats.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::executor::AggregateResult;
use crate::models::{SuiteResult, TestRecord, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        if self.format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }

    /// Format a single test record
    pub fn format_record(&self, record: &TestRecord) -> String {
        match self.format {
            OutputFormat::Table => self.format_record_table(record),
            OutputFormat::Json | OutputFormat::JsonPretty => self.to_json(record),
            OutputFormat::Summary => record.to_string(),
        }
    }

    fn status_label(&self, status: TestStatus) -> String {
        let plain = format!("{} {}", status.symbol(), status);
        if !self.colorize {
            return plain;
        }
        match status {
            TestStatus::Passed => format!("\x1b[32m{plain}\x1b[0m"),
            TestStatus::Failed => format!("\x1b[31m{plain}\x1b[0m"),
            TestStatus::Pending | TestStatus::Running => format!("\x1b[33m{plain}\x1b[0m"),
        }
    }

    fn format_record_table(&self, record: &TestRecord) -> String {
        let mut line = format!(
            "{:24} {} [{:>6}ms]",
            record.name,
            self.status_label(record.status),
            record.duration_ms
        );
        if let Some(cause) = &record.cause {
            line.push_str(&format!(" - {cause}"));
        }
        for extra in &record.additional_causes {
            line.push_str(&format!("; {extra}"));
        }
        line
    }

    /// Format a suite result
    pub fn format_suite(&self, result: &SuiteResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_suite_table(result),
            OutputFormat::Json | OutputFormat::JsonPretty => self.to_json(result),
            OutputFormat::Summary => self.format_suite_brief(result),
        }
    }

    fn format_suite_table(&self, result: &SuiteResult) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  Suite: {:30} mode: {:17} ║\n",
            result.suite,
            result.mode.name()
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for record in &result.tests {
            output.push_str(&format!("║  {}\n", self.format_record_table(record)));
        }
        for failure in &result.hook_failures {
            output.push_str(&format!("║  ! {failure}\n"));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let fail_str = if self.colorize && result.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", result.failed)
        } else {
            result.failed.to_string()
        };
        output.push_str(&format!(
            "║  Total: {:2} | Pass: {:2} | Fail: {} | Hook failures: {}\n",
            result.total,
            result.passed,
            fail_str,
            result.hook_failures.len()
        ));
        output.push_str(&format!(
            "║  Status: {} | Duration: {}ms\n",
            result.status(),
            result.duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_suite_brief(&self, result: &SuiteResult) -> String {
        let mut line = format!(
            "{} [{}] {}: {}/{} passed in {}ms",
            result.suite,
            result.mode,
            result.status(),
            result.passed,
            result.total,
            result.duration_ms
        );
        let failed: Vec<_> = result.failed_tests().map(|t| t.name.as_str()).collect();
        if !failed.is_empty() {
            line.push_str(&format!(" (failed: {})", failed.join(", ")));
        }
        line
    }

    /// Format aggregate results across rounds
    pub fn format_aggregate(&self, aggregate: &AggregateResult) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => self.to_json(aggregate),
            _ => self.format_aggregate_table(aggregate),
        }
    }

    fn format_aggregate_table(&self, aggregate: &AggregateResult) -> String {
        let mut output = String::new();

        output.push_str("\n═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Aggregate Results: {} ({} rounds)\n",
            aggregate.suite, aggregate.total_rounds
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Overall Pass Rate: {:.1}%\n\n",
            aggregate.overall_pass_rate
        ));

        output.push_str(" Test Pass Rates:\n");
        output.push_str(" ───────────────────────────────────────────────────────────\n");

        for (name, stats) in &aggregate.test_stats {
            let rate = stats.pass_rate();
            let bar_len = ((rate / 5.0) as usize).min(20);
            let bar = "█".repeat(bar_len);
            let empty = "░".repeat(20 - bar_len);

            let rate_str = if self.colorize {
                if rate >= 90.0 {
                    format!("\x1b[32m{rate:5.1}%\x1b[0m")
                } else if rate >= 50.0 {
                    format!("\x1b[33m{rate:5.1}%\x1b[0m")
                } else {
                    format!("\x1b[31m{rate:5.1}%\x1b[0m")
                }
            } else {
                format!("{rate:5.1}%")
            };

            output.push_str(&format!(
                " {:24} {}{} {} (avg {}ms)\n",
                name,
                bar,
                empty,
                rate_str,
                stats.avg_duration_ms()
            ));
        }

        output.push_str(" ───────────────────────────────────────────────────────────\n");

        let flaky = aggregate.flaky_tests();
        if !flaky.is_empty() {
            output.push_str("\n Flaky Tests (< 100% pass rate):\n");
            for (name, rate) in flaky.iter().take(5) {
                output.push_str(&format!("   - {name} ({rate:.1}%)\n"));
            }
        }

        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write results to a file, uncolored
///
/// JSON formats produce a single array; the others join suites with a blank
/// line.
pub fn write_results_to_file(
    path: impl AsRef<Path>,
    results: &[SuiteResult],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = match format {
        OutputFormat::Json | OutputFormat::JsonPretty => formatter.to_json(&results),
        _ => results
            .iter()
            .map(|r| formatter.format_suite(r))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
