//! Log-line reporter
//!
//! Renders events through `tracing` in the `[START] Test 1` style.

use tracing::{debug, error, info, warn};

use super::{Event, Reporter};
use crate::models::TestStatus;

/// Default reporter: every event becomes a log line
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for TracingReporter {
    fn on_event(&self, event: &Event) {
        match event {
            Event::SuiteStarted { suite, mode, tests } => {
                info!("Running suite '{}' ({} tests, {} mode)", suite, tests, mode);
            }
            Event::HookStarted { hook, test: None } => info!("[{}]", hook),
            Event::HookStarted {
                hook,
                test: Some(test),
            } => debug!("[{}] {}", hook, test),
            Event::HookFinished {
                hook,
                test,
                error: Some(err),
            } => match test {
                Some(test) => warn!("[{}] {} failed: {}", hook, test, err),
                None => error!("[{}] failed: {}", hook, err),
            },
            Event::HookFinished { .. } => {}
            Event::TestStarted { test } => info!("[START] {}", test),
            Event::TestOutput { test, line } => match test {
                Some(test) => info!("  {} | {}", test, line),
                None => info!("  {}", line),
            },
            Event::TestFinished {
                test,
                status,
                error,
                duration_ms,
            } => match (status, error) {
                (TestStatus::Failed, Some(err)) => {
                    warn!("[FAIL] {} ({}ms): {}", test, duration_ms, err)
                }
                _ => info!("[END] {} {} ({}ms)", test, status, duration_ms),
            },
            Event::SuiteFinished { result } => {
                info!(
                    "Suite '{}' {}: {}/{} passed in {}ms",
                    result.suite,
                    result.status(),
                    result.passed,
                    result.total,
                    result.duration_ms
                );
            }
        }
    }
}
