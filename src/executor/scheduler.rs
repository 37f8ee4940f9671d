//! Suite scheduler
//!
//! Runs suite hooks, dispatches test cases according to the suite's mode and
//! collects their outcomes into a [`SuiteResult`].

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::lifecycle::{begin_case, run_case, run_hook, RunEnv};
use super::parallel::run_parallel;
use crate::clock::Clock;
use crate::config::RunnerConfig;
use crate::context::TestContext;
use crate::error::FailureCause;
use crate::models::{HookFailure, HookKind, Mode, Suite, SuiteResult, TestRecord, TestStatus};
use crate::reporter::{Event, Reporter, TracingReporter};
use crate::utils::Timer;

/// Scheduling knobs shared by every suite a scheduler runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Upper bound on concurrently running cases in parallel mode (0 = unbounded)
    pub max_concurrent: usize,
    /// Limit applied to each body and each hook
    pub test_timeout: Option<Duration>,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            test_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl From<&RunnerConfig> for ScheduleOptions {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent,
            test_timeout: config.test_timeout(),
        }
    }
}

/// Runs suites and reports their progress
#[derive(Clone)]
pub struct Scheduler {
    options: ScheduleOptions,
    reporter: Arc<dyn Reporter>,
}

impl Scheduler {
    pub fn new(options: ScheduleOptions) -> Self {
        Self {
            options,
            reporter: Arc::new(TracingReporter::new()),
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(ScheduleOptions::from(config))
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.test_timeout = timeout;
        self
    }

    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.options.max_concurrent = max_concurrent;
        self
    }

    pub fn options(&self) -> ScheduleOptions {
        self.options
    }

    /// Run a suite to completion
    ///
    /// Statuses are written back into `suite` as cases progress. Failures of
    /// individual cases never abort the run.
    pub async fn run(&self, suite: &mut Suite) -> SuiteResult {
        suite.reset();

        let started_at = Utc::now();
        let timer = Timer::start(format!("suite {}", suite.name()));
        let clock = Clock::new();
        let env = RunEnv {
            ctx: TestContext::new(suite.name().into(), clock, self.reporter.clone()),
            timeout: self.options.test_timeout,
        };

        env.emit(Event::SuiteStarted {
            suite: suite.name().to_string(),
            mode: suite.mode(),
            tests: suite.len(),
        });

        let mut hook_failures = Vec::new();
        let mut setup_failure = None;

        for hook in &suite.hooks().before_all {
            if let Some(cause) = run_hook(HookKind::BeforeAll, hook, &env.ctx, env.timeout).await {
                hook_failures.push(HookFailure {
                    hook: HookKind::BeforeAll,
                    cause: cause.clone(),
                });
                setup_failure = Some(cause);
                break;
            }
        }

        let tests = match setup_failure {
            Some(cause) => fail_all(suite, &cause, &env),
            None => match suite.mode() {
                Mode::Serial => run_serial(suite, &env).await,
                Mode::Parallel => run_parallel(suite, &env, self.options.max_concurrent).await,
            },
        };

        for hook in &suite.hooks().after_all {
            if let Some(cause) = run_hook(HookKind::AfterAll, hook, &env.ctx, env.timeout).await {
                hook_failures.push(HookFailure {
                    hook: HookKind::AfterAll,
                    cause,
                });
            }
        }

        let result = SuiteResult::new(
            suite.name(),
            suite.mode(),
            started_at,
            timer.stop().as_millis() as u64,
            tests,
            hook_failures,
        );

        env.emit(Event::SuiteFinished {
            result: result.clone(),
        });

        result
    }

    /// Run several suites one after another
    pub async fn run_all(&self, suites: &mut [Suite]) -> Vec<SuiteResult> {
        let mut results = Vec::with_capacity(suites.len());
        for suite in suites.iter_mut() {
            results.push(self.run(suite).await);
        }

        info!(
            "Ran {} suites - {} failed",
            results.len(),
            results.iter().filter(|r| !r.is_success()).count()
        );
        results
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(ScheduleOptions::default())
    }
}

/// One case at a time, declaration order, each awaited to completion
async fn run_serial(suite: &mut Suite, env: &RunEnv) -> Vec<TestRecord> {
    let mut records = Vec::with_capacity(suite.len());

    for index in 0..suite.len() {
        let plan = begin_case(suite, index, env);
        let outcome = run_case(plan, env.clone()).await;

        debug!("Serial case {} finished: {}", index, outcome.record.status);
        suite.cases_mut()[index].set_status(outcome.record.status);
        records.push(outcome.record);
    }

    records
}

/// `beforeAll` failed: every case fails without its body running
fn fail_all(suite: &mut Suite, cause: &FailureCause, env: &RunEnv) -> Vec<TestRecord> {
    let reason = cause.to_string();

    suite
        .cases_mut()
        .iter_mut()
        .map(|case| {
            case.set_status(TestStatus::Failed);
            let record = TestRecord::failed(case.name(), 0, FailureCause::setup(reason.as_str()));

            env.emit(Event::TestFinished {
                test: record.name.clone(),
                status: record.status,
                error: record.error_message(),
                duration_ms: 0,
            });
            record
        })
        .collect()
}
