//! Execution context handed to test bodies and hooks

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::reporter::{Event, Reporter};

/// What a unit of work can see about its surroundings
#[derive(Clone)]
pub struct TestContext {
    suite: Arc<str>,
    test: Option<Arc<str>>,
    clock: Clock,
    reporter: Arc<dyn Reporter>,
}

impl TestContext {
    pub(crate) fn new(suite: Arc<str>, clock: Clock, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            suite,
            test: None,
            clock,
            reporter,
        }
    }

    /// Same context scoped to one test case
    pub(crate) fn for_test(&self, test: Arc<str>) -> Self {
        Self {
            test: Some(test),
            ..self.clone()
        }
    }

    pub fn suite_name(&self) -> &str {
        &self.suite
    }

    /// `None` inside `beforeAll` / `afterAll`
    pub fn test_name(&self) -> Option<&str> {
        self.test.as_deref()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Suspend for `duration` without blocking sibling tests
    pub async fn sleep(&self, duration: Duration) {
        self.clock.after(duration).await
    }

    /// Emit an output line attributed to the current test
    pub fn log(&self, line: impl Into<String>) {
        self.reporter.on_event(&Event::TestOutput {
            test: self.test.as_deref().map(str::to_string),
            line: line.into(),
        });
    }

    pub(crate) fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("suite", &self.suite)
            .field("test", &self.test)
            .finish_non_exhaustive()
    }
}
