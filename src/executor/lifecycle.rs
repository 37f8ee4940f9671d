//! Per-test lifecycle
//!
//! Runs `beforeEach`, the body and `afterEach` for one test case. Every unit of
//! work is guarded: errors, panics and timeouts are caught at the unit
//! boundary and turned into a [`FailureCause`] for that test only.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::context::TestContext;
use crate::error::FailureCause;
use crate::models::{HookKind, Suite, TestRecord, TestStatus, Work};
use crate::reporter::Event;

/// Shared, cheaply clonable state for one suite run
#[derive(Clone, Debug)]
pub(crate) struct RunEnv {
    /// Suite-scoped context; narrowed per test with `for_test`
    pub ctx: TestContext,
    pub timeout: Option<Duration>,
}

impl RunEnv {
    pub fn emit(&self, event: Event) {
        self.ctx.reporter().on_event(&event);
    }
}

/// How a single unit of work failed
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum UnitFailure {
    Error(String),
    Panicked(String),
    TimedOut(Duration),
}

impl UnitFailure {
    fn message(self) -> Result<String, Duration> {
        match self {
            UnitFailure::Error(message) => Ok(message),
            UnitFailure::Panicked(message) => Ok(format!("panicked: {message}")),
            UnitFailure::TimedOut(limit) => Err(limit),
        }
    }

    pub fn into_test_cause(self) -> FailureCause {
        match self.message() {
            Ok(message) => FailureCause::test(message),
            Err(limit) => FailureCause::Timeout {
                during: "test body".to_string(),
                limit_ms: limit.as_millis() as u64,
            },
        }
    }

    pub fn into_hook_cause(self, hook: HookKind) -> FailureCause {
        match self.message() {
            Ok(message) => FailureCause::hook(hook, message),
            Err(limit) => FailureCause::Timeout {
                during: format!("{hook} hook"),
                limit_ms: limit.as_millis() as u64,
            },
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run one unit of work to completion, catching everything it can throw
pub(crate) async fn run_unit(
    work: &Work,
    ctx: TestContext,
    limit: Option<Duration>,
) -> Result<(), UnitFailure> {
    let work = work.clone();
    // The call itself happens inside the guarded future, so a panic raised
    // before the first suspension is caught as well.
    let guarded = AssertUnwindSafe(async move { (work)(ctx).await }).catch_unwind();

    let outcome = match limit {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => return Err(UnitFailure::TimedOut(limit)),
        },
        None => guarded.await,
    };

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(UnitFailure::Error(format!("{e:#}"))),
        Err(payload) => Err(UnitFailure::Panicked(panic_message(payload))),
    }
}

/// Run a hook with start/finish events, returning its failure if any
pub(crate) async fn run_hook(
    kind: HookKind,
    hook: &Work,
    ctx: &TestContext,
    limit: Option<Duration>,
) -> Option<FailureCause> {
    let test = ctx.test_name().map(str::to_string);
    ctx.reporter().on_event(&Event::HookStarted {
        hook: kind,
        test: test.clone(),
    });

    let cause = run_unit(hook, ctx.clone(), limit)
        .await
        .err()
        .map(|failure| failure.into_hook_cause(kind));

    ctx.reporter().on_event(&Event::HookFinished {
        hook: kind,
        test,
        error: cause.as_ref().map(|c| c.to_string()),
    });
    cause
}

/// Everything a test case needs to run away from its suite
pub(crate) struct CasePlan {
    pub index: usize,
    pub name: Arc<str>,
    pub body: Work,
    pub before_each: Vec<Work>,
    pub after_each: Vec<Work>,
    pub started: Instant,
}

/// Terminal outcome of a test case, tagged with its declaration index
#[derive(Debug)]
pub(crate) struct CaseOutcome {
    pub index: usize,
    pub record: TestRecord,
}

/// Mark a case `Running`, announce it and detach what it needs to run
pub(crate) fn begin_case(suite: &mut Suite, index: usize, env: &RunEnv) -> CasePlan {
    let before_each = suite.hooks().before_each.clone();
    let after_each = suite.hooks().after_each.clone();

    let case = &mut suite.cases_mut()[index];
    case.set_status(TestStatus::Running);
    let name: Arc<str> = case.name().into();

    env.emit(Event::TestStarted {
        test: name.to_string(),
    });

    CasePlan {
        index,
        name,
        body: case.body().clone(),
        before_each,
        after_each,
        started: Instant::now(),
    }
}

/// Run `beforeEach`, body and `afterEach` for one case
///
/// `afterEach` always runs. The first failure becomes the test's cause; later
/// `afterEach` failures are kept as additional causes.
pub(crate) async fn run_case(plan: CasePlan, env: RunEnv) -> CaseOutcome {
    let ctx = env.ctx.for_test(plan.name.clone());
    let mut cause: Option<FailureCause> = None;
    let mut additional = Vec::new();

    for hook in &plan.before_each {
        if let Some(failure) = run_hook(HookKind::BeforeEach, hook, &ctx, env.timeout).await {
            cause = Some(failure);
            break;
        }
    }

    if cause.is_none() {
        if let Err(failure) = run_unit(&plan.body, ctx.clone(), env.timeout).await {
            debug!("Body of '{}' failed: {:?}", plan.name, failure);
            cause = Some(failure.into_test_cause());
        }
    }

    for hook in &plan.after_each {
        if let Some(failure) = run_hook(HookKind::AfterEach, hook, &ctx, env.timeout).await {
            if cause.is_none() {
                cause = Some(failure);
            } else {
                additional.push(failure);
            }
        }
    }

    let clock = ctx.clock();
    let finished = Instant::now();
    let duration_ms = finished.saturating_duration_since(plan.started).as_millis() as u64;

    let record = match cause {
        None => TestRecord::passed(plan.name.as_ref(), duration_ms),
        Some(cause) => {
            let mut record = TestRecord::failed(plan.name.as_ref(), duration_ms, cause);
            record.additional_causes = additional;
            record
        }
    }
    .with_window(clock.offset_ms(plan.started), clock.offset_ms(finished));

    env.emit(Event::TestFinished {
        test: record.name.clone(),
        status: record.status,
        error: record.error_message(),
        duration_ms,
    });

    CaseOutcome {
        index: plan.index,
        record,
    }
}
