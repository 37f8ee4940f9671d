//! Reporter interface
//!
//! The scheduler emits [`Event`]s as a suite runs. Under parallel mode events
//! from different test cases arrive in the order they actually happen, so
//! reporters must tolerate interleaving.

mod console;
mod log;

pub use console::TracingReporter;
pub use log::{EventLog, LoggedEvent};

use serde::Serialize;
use std::sync::Arc;

use crate::models::{HookKind, Mode, SuiteResult, TestStatus};

/// Lifecycle event emitted during a suite run
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SuiteStarted {
        suite: String,
        mode: Mode,
        tests: usize,
    },
    HookStarted {
        hook: HookKind,
        test: Option<String>,
    },
    HookFinished {
        hook: HookKind,
        test: Option<String>,
        error: Option<String>,
    },
    TestStarted {
        test: String,
    },
    /// A line logged by a body or hook through its context
    TestOutput {
        test: Option<String>,
        line: String,
    },
    TestFinished {
        test: String,
        status: TestStatus,
        error: Option<String>,
        duration_ms: u64,
    },
    SuiteFinished {
        result: SuiteResult,
    },
}

/// Consumer of scheduler events
///
/// Called concurrently from parallel test cases.
pub trait Reporter: Send + Sync {
    fn on_event(&self, event: &Event);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn on_event(&self, event: &Event) {
        (**self).on_event(event)
    }
}
