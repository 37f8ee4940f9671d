//! Built-in demonstration suites
//!
//! - `default-mode`: two tests that each wait, run one after another
//! - `parallel-fail`: the first test fails immediately, the second still passes
//! - `setup-fail`: a failing `beforeAll` fails every test without running it

use anyhow::bail;
use std::time::Duration;

use crate::context::TestContext;
use crate::error::SuiteError;
use crate::models::{Mode, Suite};

/// Simulated work duration used by the scenarios
pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);

/// Names of all built-in scenarios
pub const NAMES: [&str; 3] = ["default-mode", "parallel-fail", "setup-fail"];

/// Short description of a scenario
pub fn describe(name: &str) -> Option<&'static str> {
    match name {
        "default-mode" => Some("serial: Test 2 starts only after Test 1 ends"),
        "parallel-fail" => Some("parallel: Test 1 fails immediately, Test 2 is unaffected"),
        "setup-fail" => Some("serial: beforeAll fails, no test body runs"),
        _ => None,
    }
}

async fn announce(ctx: TestContext) -> anyhow::Result<()> {
    ctx.log("[beforeAll]");
    Ok(())
}

/// Log start, wait `delay`, log end
async fn simulated_work(ctx: TestContext, delay: Duration) -> anyhow::Result<()> {
    let name = ctx.test_name().unwrap_or("?").to_string();
    ctx.log(format!("[START] {name}"));
    ctx.clock().after(delay).await;
    ctx.log(format!("[END] {name}"));
    Ok(())
}

pub fn default_mode(delay: Duration) -> Result<Suite, SuiteError> {
    Suite::builder("default-mode")
        .mode(Mode::Serial)
        .before_all(announce)
        .test("Test 1", move |ctx| simulated_work(ctx, delay))
        .test("Test 2", move |ctx| simulated_work(ctx, delay))
        .build()
}

pub fn parallel_fail(delay: Duration) -> Result<Suite, SuiteError> {
    Suite::builder("parallel-fail")
        .mode(Mode::Parallel)
        .before_all(announce)
        .test("Test 1", |ctx| async move {
            ctx.log("[START] Test 1");
            bail!("Test 1 failed")
        })
        .test("Test 2", move |ctx| simulated_work(ctx, delay))
        .build()
}

pub fn setup_fail(delay: Duration) -> Result<Suite, SuiteError> {
    Suite::builder("setup-fail")
        .mode(Mode::Serial)
        .before_all(|ctx| async move {
            ctx.log("[beforeAll]");
            bail!("fixture server unreachable")
        })
        .test("Test 1", move |ctx| simulated_work(ctx, delay))
        .test("Test 2", move |ctx| simulated_work(ctx, delay))
        .build()
}

/// Build a scenario by name
pub fn by_name(name: &str, delay: Duration) -> Option<Result<Suite, SuiteError>> {
    match name {
        "default-mode" => Some(default_mode(delay)),
        "parallel-fail" => Some(parallel_fail(delay)),
        "setup-fail" => Some(setup_fail(delay)),
        _ => None,
    }
}

/// Build every scenario
pub fn all(delay: Duration) -> Result<Vec<Suite>, SuiteError> {
    NAMES
        .iter()
        .filter_map(|name| by_name(name, delay))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureCause;
    use crate::executor::Scheduler;
    use crate::models::TestStatus;
    use crate::reporter::EventLog;
    use std::sync::Arc;

    fn scheduler(log: &Arc<EventLog>) -> Scheduler {
        Scheduler::default().with_reporter(log.clone())
    }

    #[test]
    fn test_all_scenarios_build() {
        let suites = all(DEFAULT_DELAY).unwrap();
        let names: Vec<_> = suites.iter().map(|s| s.name()).collect();
        assert_eq!(names, NAMES.to_vec());
        assert!(NAMES.iter().all(|n| describe(n).is_some()));
        assert!(by_name("nope", DEFAULT_DELAY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_mode_scenario() {
        let log = Arc::new(EventLog::new());
        let mut suite = default_mode(DEFAULT_DELAY).unwrap();

        let result = scheduler(&log).run(&mut suite).await;

        assert!(result.is_success());
        assert_eq!(result.duration_ms, 6000);
        let first = result.test("Test 1").unwrap();
        let second = result.test("Test 2").unwrap();
        assert!(second.started_at_ms >= first.finished_at_ms);
        assert_eq!(
            log.lines(),
            vec![
                "[beforeAll]",
                "[START] Test 1",
                "[END] Test 1",
                "[START] Test 2",
                "[END] Test 2"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_fail_scenario() {
        let log = Arc::new(EventLog::new());
        let mut suite = parallel_fail(DEFAULT_DELAY).unwrap();

        let result = scheduler(&log).run(&mut suite).await;

        assert_eq!(
            result.test("Test 1").unwrap().cause,
            Some(FailureCause::test("Test 1 failed"))
        );
        assert_eq!(result.test("Test 2").unwrap().status, TestStatus::Passed);
        assert_eq!(result.duration_ms, 3000);

        let lines = log.lines();
        assert!(lines.contains(&"[END] Test 2".to_string()));
        assert!(!lines.contains(&"[END] Test 1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_setup_fail_scenario() {
        let log = Arc::new(EventLog::new());
        let mut suite = setup_fail(DEFAULT_DELAY).unwrap();

        let result = scheduler(&log).run(&mut suite).await;

        assert_eq!(result.failed, 2);
        assert_eq!(result.duration_ms, 0);
        for test in &result.tests {
            assert_eq!(
                test.cause,
                Some(FailureCause::setup(
                    "beforeAll hook failed: fixture server unreachable"
                ))
            );
        }
        assert_eq!(log.lines(), vec!["[beforeAll]"]);
    }
}
