// Report - markdown summary of a test run

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Outcome of a single test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub status: String,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Totals plus per-test outcomes, as read from a results JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub passed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub tests: Vec<TestOutcome>,
}

impl TestResults {
    /// Records `outcome` and bumps the matching counters.
    pub fn record(&mut self, outcome: TestOutcome) {
        self.total += 1;
        match outcome.status.to_ascii_lowercase().as_str() {
            "passed" => self.passed += 1,
            "failed" => self.failed += 1,
            "skipped" => self.skipped += 1,
            _ => {}
        }
        self.tests.push(outcome);
    }
}

/// Renders `results` as markdown stamped with `generated`.
pub fn render_report(results: &TestResults, generated: NaiveDateTime) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "# Test Execution Report");
    let _ = writeln!(report);
    let _ = writeln!(report, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(report);
    let _ = writeln!(report, "## Summary");
    let _ = writeln!(report, "- Total Tests: {}", results.total);
    let _ = writeln!(report, "- Passed: {}", results.passed);
    let _ = writeln!(report, "- Failed: {}", results.failed);
    let _ = writeln!(report, "- Skipped: {}", results.skipped);
    let _ = writeln!(report);
    let _ = writeln!(report, "## Test Details");

    for test in &results.tests {
        let _ = writeln!(report);
        let _ = writeln!(report, "### {}", test.name);
        let _ = writeln!(report, "- Status: {}", test.status);
        let _ = writeln!(report, "- Duration: {}s", test.duration);
        let _ = writeln!(
            report,
            "- Error: {}",
            test.error.as_deref().unwrap_or("None")
        );
    }
    report
}

/// Renders `results` stamped with the current local time.
pub fn generate_test_report(results: &TestResults) -> String {
    render_report(results, Local::now().naive_local())
}
