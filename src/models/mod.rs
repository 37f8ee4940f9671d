//! Data models for suites and their results
//!
//! This module contains the declaration side (suites, test cases, hooks) and
//! the reporting side (statuses, records, suite results).

mod outcome;
mod suite;

pub use outcome::{HookFailure, SuiteResult, SuiteStatus, TestRecord, TestStatus};
pub use suite::{work, HookKind, Hooks, Mode, Suite, SuiteBuilder, TestCase, Work, WorkFuture};
