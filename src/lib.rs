//! Suite Runner - test suite scheduler
//!
//! Runs named test cases grouped into suites, either one at a time in
//! declaration order (`default` mode) or all at once (`parallel` mode), with
//! lifecycle hooks and strict failure isolation between test cases.
//!
//! ## Features
//!
//! - `beforeAll` / `afterAll` / `beforeEach` / `afterEach` hooks
//! - Serial and parallel dispatch on tokio
//! - Errors, panics and timeouts contained to the failing test case
//! - Event stream for reporters, with a tracing-based default
//! - Repeated rounds with flaky-test aggregation
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use suite_runner::{Scheduler, Suite};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut suite = Suite::builder("checkout")
//!     .parallel()
//!     .before_all(|ctx| async move {
//!         ctx.log("[beforeAll]");
//!         Ok(())
//!     })
//!     .test("Test 1", |_| async { anyhow::bail!("Test 1 failed") })
//!     .test("Test 2", |ctx| async move {
//!         ctx.sleep(Duration::from_secs(3)).await;
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let result = Scheduler::default().run(&mut suite).await;
//! assert_eq!(result.failed, 1);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod reporter;
pub mod scenarios;
pub mod utils;

pub use clock::Clock;
pub use config::RunnerConfig;
pub use context::TestContext;
pub use error::{FailureCause, SuiteError};
pub use executor::{AggregateResult, BatchRunner, ScheduleOptions, Scheduler};
pub use models::{
    HookKind, Mode, Suite, SuiteBuilder, SuiteResult, SuiteStatus, TestCase, TestRecord,
    TestStatus,
};
pub use reporter::{Event, EventLog, Reporter, TracingReporter};
