//! Test outcome models
//!
//! Defines test statuses, per-test records, and the suite result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FailureCause;
use crate::models::{HookKind, Mode};

/// Test execution status
///
/// `Pending -> Running -> {Passed, Failed}`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pending => "○",
            TestStatus::Running => "…",
            TestStatus::Passed => "✓",
            TestStatus::Failed => "✗",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TestStatus::Passed | TestStatus::Failed)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pending => write!(f, "PENDING"),
            TestStatus::Running => write!(f, "RUNNING"),
            TestStatus::Passed => write!(f, "PASS"),
            TestStatus::Failed => write!(f, "FAIL"),
        }
    }
}

/// Final record of a single test case
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub status: TestStatus,
    /// First failure observed for this test
    pub cause: Option<FailureCause>,
    /// Failures from per-test hooks that ran after the first failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_causes: Vec<FailureCause>,
    pub duration_ms: u64,
    /// Offset from suite start
    pub started_at_ms: u64,
    pub finished_at_ms: u64,
}

impl TestRecord {
    pub fn passed(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            cause: None,
            additional_causes: Vec::new(),
            duration_ms,
            started_at_ms: 0,
            finished_at_ms: duration_ms,
        }
    }

    pub fn failed(name: impl Into<String>, duration_ms: u64, cause: FailureCause) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            cause: Some(cause),
            additional_causes: Vec::new(),
            duration_ms,
            started_at_ms: 0,
            finished_at_ms: duration_ms,
        }
    }

    pub fn with_window(mut self, started_at_ms: u64, finished_at_ms: u64) -> Self {
        self.started_at_ms = started_at_ms;
        self.finished_at_ms = finished_at_ms;
        self
    }

    pub fn error_message(&self) -> Option<String> {
        self.cause.as_ref().map(|c| c.to_string())
    }
}

impl fmt::Display for TestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.name,
            self.duration_ms
        )?;
        if let Some(cause) = &self.cause {
            write!(f, " - {cause}")?;
        }
        for extra in &self.additional_causes {
            write!(f, "; {extra}")?;
        }
        Ok(())
    }
}

/// Failure of a suite-level hook (`beforeAll` / `afterAll`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookFailure {
    pub hook: HookKind,
    pub cause: FailureCause,
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.hook, self.cause)
    }
}

/// Aggregate status of a suite
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteStatus {
    Passed,
    Failed,
}

impl fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteStatus::Passed => write!(f, "PASSED"),
            SuiteStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Result of one suite run, immutable once produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub suite: String,
    pub mode: Mode,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Records in declaration order
    pub tests: Vec<TestRecord>,
    pub hook_failures: Vec<HookFailure>,
}

impl SuiteResult {
    pub fn new(
        suite: impl Into<String>,
        mode: Mode,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        tests: Vec<TestRecord>,
        hook_failures: Vec<HookFailure>,
    ) -> Self {
        let total = tests.len();
        let passed = tests
            .iter()
            .filter(|t| t.status == TestStatus::Passed)
            .count();
        let failed = tests
            .iter()
            .filter(|t| t.status == TestStatus::Failed)
            .count();

        Self {
            suite: suite.into(),
            mode,
            started_at,
            duration_ms,
            total,
            passed,
            failed,
            tests,
            hook_failures,
        }
    }

    pub fn status(&self) -> SuiteStatus {
        if self.failed == 0 && self.hook_failures.is_empty() {
            SuiteStatus::Passed
        } else {
            SuiteStatus::Failed
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == SuiteStatus::Passed
    }

    pub fn test(&self, name: &str) -> Option<&TestRecord> {
        self.tests.iter().find(|t| t.name == name)
    }

    pub fn failed_tests(&self) -> impl Iterator<Item = &TestRecord> {
        self.tests.iter().filter(|t| t.status == TestStatus::Failed)
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}

impl fmt::Display for SuiteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Suite {} ({} mode)", self.suite, self.mode)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for test in &self.tests {
            writeln!(f, "  {test}")?;
        }
        for failure in &self.hook_failures {
            writeln!(f, "  ! {failure}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Hook failures: {}",
            self.total,
            self.passed,
            self.failed,
            self.hook_failures.len()
        )?;
        writeln!(
            f,
            "Status: {} | Duration: {}ms",
            self.status(),
            self.duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hook_failures: Vec<HookFailure>) -> SuiteResult {
        let tests = vec![
            TestRecord::failed("Test 1", 0, FailureCause::test("Test 1 failed")),
            TestRecord::passed("Test 2", 3000),
        ];
        SuiteResult::new("parallel-fail", Mode::Parallel, Utc::now(), 3000, tests, hook_failures)
    }

    #[test]
    fn test_status_terminal() {
        assert!(!TestStatus::Pending.is_terminal());
        assert!(!TestStatus::Running.is_terminal());
        assert!(TestStatus::Passed.is_terminal());
        assert!(TestStatus::Failed.is_terminal());
        assert!(TestStatus::Passed.is_success());
    }

    #[test]
    fn test_suite_counts() {
        let result = sample(Vec::new());
        assert_eq!(result.total, 2);
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.status(), SuiteStatus::Failed);
        assert_eq!(result.pass_rate(), 50.0);

        let failed: Vec<_> = result.failed_tests().map(|t| t.name.as_str()).collect();
        assert_eq!(failed, vec!["Test 1"]);
        assert_eq!(
            result.test("Test 1").and_then(|t| t.error_message()),
            Some("Test 1 failed".to_string())
        );
    }

    #[test]
    fn test_after_all_failure_fails_suite() {
        let tests = vec![TestRecord::passed("Test 1", 10)];
        let result = SuiteResult::new(
            "teardown",
            Mode::Serial,
            Utc::now(),
            10,
            tests,
            vec![HookFailure {
                hook: HookKind::AfterAll,
                cause: FailureCause::hook(HookKind::AfterAll, "cleanup failed"),
            }],
        );

        assert_eq!(result.failed, 0);
        assert!(!result.is_success());
    }

    #[test]
    fn test_record_display() {
        let record = TestRecord::failed("Test 1", 5, FailureCause::test("boom"));
        assert_eq!(record.to_string(), "✗ Test 1 [5ms] - boom");
    }
}
