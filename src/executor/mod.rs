//! Test execution engine
//!
//! Provides serial and parallel dispatch of a suite's test cases, plus
//! repeated rounds.

mod batch;
mod lifecycle;
mod parallel;
mod scheduler;

pub use batch::{AggregateResult, BatchRunner, TestStats};
pub use scheduler::{ScheduleOptions, Scheduler};
