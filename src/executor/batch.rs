//! Repeated runs of one suite
//!
//! Runs the same suite for several rounds and aggregates per-test statistics,
//! which is how flaky cases show up.

use serde::Serialize;
use tracing::info;

use super::Scheduler;
use crate::models::{Suite, SuiteResult, TestStatus};

/// Batch test runner for multiple rounds
pub struct BatchRunner {
    scheduler: Scheduler,
    rounds: u32,
}

impl BatchRunner {
    pub fn new(scheduler: Scheduler, rounds: u32) -> Self {
        Self {
            scheduler,
            rounds: rounds.max(1),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Run the suite `rounds` times; statuses are reset before each round
    pub async fn run_rounds(&self, suite: &mut Suite) -> Vec<SuiteResult> {
        let mut results = Vec::with_capacity(self.rounds as usize);

        for round in 1..=self.rounds {
            if self.rounds > 1 {
                info!("=== Round {}/{} of '{}' ===", round, self.rounds, suite.name());
            }

            let result = self.scheduler.run(suite).await;

            if self.rounds > 1 {
                info!(
                    "Round {} completed: {}/{} passed ({:.1}%)",
                    round,
                    result.passed,
                    result.total,
                    result.pass_rate()
                );
            }
            results.push(result);
        }

        results
    }

    /// Aggregate results across rounds of the same suite
    pub fn aggregate_results(results: &[SuiteResult]) -> AggregateResult {
        let suite = results
            .first()
            .map(|r| r.suite.clone())
            .unwrap_or_default();
        let mut test_stats: Vec<(String, TestStats)> = Vec::new();

        for result in results {
            for record in &result.tests {
                let idx = match test_stats.iter().position(|(name, _)| *name == record.name) {
                    Some(idx) => idx,
                    None => {
                        test_stats.push((record.name.clone(), TestStats::default()));
                        test_stats.len() - 1
                    }
                };
                let stats = &mut test_stats[idx].1;

                match record.status {
                    TestStatus::Passed => stats.passes += 1,
                    TestStatus::Failed => stats.failures += 1,
                    TestStatus::Pending | TestStatus::Running => {}
                }
                stats.total_duration_ms += record.duration_ms;
            }
        }

        let overall_pass_rate = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.pass_rate()).sum::<f64>() / results.len() as f64
        };

        AggregateResult {
            suite,
            total_rounds: results.len() as u32,
            test_stats,
            overall_pass_rate,
        }
    }
}

/// Statistics for a single test case across rounds
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TestStats {
    pub passes: u32,
    pub failures: u32,
    pub total_duration_ms: u64,
}

impl TestStats {
    pub fn runs(&self) -> u32 {
        self.passes + self.failures
    }

    pub fn pass_rate(&self) -> f64 {
        if self.runs() > 0 {
            (self.passes as f64 / self.runs() as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_duration_ms(&self) -> u64 {
        if self.runs() > 0 {
            self.total_duration_ms / self.runs() as u64
        } else {
            0
        }
    }
}

/// Aggregate results across multiple rounds
#[derive(Clone, Debug, Serialize)]
pub struct AggregateResult {
    pub suite: String,
    pub total_rounds: u32,
    /// Per-test stats in declaration order
    pub test_stats: Vec<(String, TestStats)>,
    pub overall_pass_rate: f64,
}

impl AggregateResult {
    pub fn stats(&self, test: &str) -> Option<&TestStats> {
        self.test_stats
            .iter()
            .find(|(name, _)| name == test)
            .map(|(_, stats)| stats)
    }

    /// Tests that both passed and failed, lowest pass rate first
    pub fn flaky_tests(&self) -> Vec<(&str, f64)> {
        let mut tests: Vec<_> = self
            .test_stats
            .iter()
            .filter(|(_, s)| s.passes > 0 && s.failures > 0)
            .map(|(name, s)| (name.as_str(), s.pass_rate()))
            .collect();
        tests.sort_by(|a, b| a.1.total_cmp(&b.1));
        tests
    }

    /// Tests that passed in every round
    pub fn stable_tests(&self) -> Vec<&str> {
        self.test_stats
            .iter()
            .filter(|(_, s)| s.failures == 0 && s.passes > 0)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureCause;
    use crate::models::{Mode, TestRecord};
    use crate::reporter::EventLog;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn round(records: Vec<TestRecord>) -> SuiteResult {
        SuiteResult::new("flaky", Mode::Serial, Utc::now(), 0, records, Vec::new())
    }

    #[test]
    fn test_aggregate_results() {
        let results = vec![
            round(vec![
                TestRecord::passed("Test 1", 100),
                TestRecord::failed("Test 2", 50, FailureCause::test("failed")),
            ]),
            round(vec![
                TestRecord::passed("Test 1", 120),
                TestRecord::passed("Test 2", 60),
            ]),
        ];

        let aggregate = BatchRunner::aggregate_results(&results);
        assert_eq!(aggregate.total_rounds, 2);
        assert_eq!(aggregate.suite, "flaky");
        assert_eq!(aggregate.stats("Test 1").map(|s| s.pass_rate()), Some(100.0));
        assert_eq!(aggregate.stats("Test 1").map(|s| s.avg_duration_ms()), Some(110));
        assert_eq!(aggregate.stats("Test 2").map(|s| s.pass_rate()), Some(50.0));
        assert_eq!(aggregate.flaky_tests(), vec![("Test 2", 50.0)]);
        assert_eq!(aggregate.stable_tests(), vec!["Test 1"]);
        assert_eq!(aggregate.overall_pass_rate, 75.0);
    }

    #[test]
    fn test_aggregate_empty() {
        let aggregate = BatchRunner::aggregate_results(&[]);
        assert_eq!(aggregate.total_rounds, 0);
        assert_eq!(aggregate.overall_pass_rate, 0.0);
        assert!(aggregate.test_stats.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_rounds_detects_flaky_case() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let mut suite = Suite::builder("flaky")
            .test("every other run", move |_| {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                        anyhow::bail!("unlucky");
                    }
                    Ok(())
                }
            })
            .test("always", |_| async { Ok(()) })
            .build()
            .unwrap();

        let scheduler = Scheduler::default().with_reporter(Arc::new(EventLog::new()));
        let runner = BatchRunner::new(scheduler, 4);
        let results = runner.run_rounds(&mut suite).await;

        assert_eq!(results.len(), 4);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);

        let aggregate = BatchRunner::aggregate_results(&results);
        assert_eq!(aggregate.flaky_tests(), vec![("every other run", 50.0)]);
        assert_eq!(aggregate.stable_tests(), vec!["always"]);
    }

    #[test]
    fn test_zero_rounds_clamped() {
        assert_eq!(BatchRunner::new(Scheduler::default(), 0).rounds(), 1);
    }
}
