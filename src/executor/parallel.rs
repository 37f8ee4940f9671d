//! Parallel dispatch
//!
//! Every test case gets its own tokio task. Permits are taken in declaration
//! order before each spawn, so launch order follows declaration order while
//! completion order is left to the cases themselves. Dropping the run aborts
//! every case it has spawned.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::lifecycle::{begin_case, run_case, CaseOutcome, RunEnv};
use crate::error::FailureCause;
use crate::models::{Suite, TestRecord};
use crate::reporter::Event;

/// Spawned cases, aborted if the owning run is dropped before they finish
struct CaseTasks(Vec<JoinHandle<CaseOutcome>>);

impl Drop for CaseTasks {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Launch all cases concurrently and wait for every one of them
pub(crate) async fn run_parallel(
    suite: &mut Suite,
    env: &RunEnv,
    max_concurrent: usize,
) -> Vec<TestRecord> {
    let permits = if max_concurrent == 0 {
        suite.len().max(1)
    } else {
        max_concurrent
    };
    let semaphore = Arc::new(Semaphore::new(permits));

    let mut launched = Vec::with_capacity(suite.len());
    let mut tasks = CaseTasks(Vec::with_capacity(suite.len()));

    for index in 0..suite.len() {
        let permit = semaphore.clone().acquire_owned().await.ok();
        let plan = begin_case(suite, index, env);

        debug!("Launching '{}' ({} permits)", plan.name, permits);
        launched.push((plan.name.clone(), plan.started));

        let env = env.clone();
        tasks.0.push(tokio::spawn(async move {
            let _permit = permit;
            run_case(plan, env).await
        }));
    }

    let clock = *env.ctx.clock();
    let mut records = Vec::with_capacity(launched.len());

    for (index, (joined, (name, started))) in join_all(tasks.0.iter_mut())
        .await
        .into_iter()
        .zip(launched)
        .enumerate()
    {
        let record = match joined {
            Ok(CaseOutcome { index: done, record }) => {
                debug_assert_eq!(done, index);
                record
            }
            Err(e) => {
                // Panics are caught inside the task; this only fires if the
                // task itself was cancelled.
                error!("Task for '{}' did not complete: {}", name, e);
                let now = tokio::time::Instant::now();
                let record = TestRecord::failed(
                    name.as_ref(),
                    now.saturating_duration_since(started).as_millis() as u64,
                    FailureCause::test(format!("test task aborted: {e}")),
                )
                .with_window(clock.offset_ms(started), clock.offset_ms(now));

                env.emit(Event::TestFinished {
                    test: record.name.clone(),
                    status: record.status,
                    error: record.error_message(),
                    duration_ms: record.duration_ms,
                });
                record
            }
        };

        suite.cases_mut()[index].set_status(record.status);
        records.push(record);
    }

    records
}
