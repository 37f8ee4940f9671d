//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Test suite scheduler with serial and parallel execution modes
#[derive(Parser, Debug)]
#[command(name = "suite-runner")]
#[command(version)]
#[command(about = "Run test suites in serial or parallel mode")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run built-in suites
    Run(RunArgs),

    /// List built-in suites and their tests
    List(ListArgs),

    /// Show the effective configuration
    Config,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suites to run (repeatable; all when omitted)
    #[arg(short, long)]
    pub suite: Vec<String>,

    /// Force a mode on every suite (default, parallel)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Max concurrent tests in parallel mode (0 = unbounded)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-test timeout in milliseconds (0 disables)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Run each suite this many times
    #[arg(short, long)]
    pub repeat: Option<u32>,

    /// Simulated work per test in milliseconds
    #[arg(long, default_value = "3000")]
    pub delay: u64,

    /// Only run tests whose name contains this text
    #[arg(short, long)]
    pub grep: Option<String>,

    /// Output format (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show the tests in each suite
    #[arg(short, long)]
    pub detailed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let args = Args::parse_from([
            "suite-runner",
            "run",
            "--suite",
            "parallel-fail",
            "--suite",
            "setup-fail",
            "--mode",
            "parallel",
            "--workers",
            "2",
            "--delay",
            "10",
        ]);

        match args.command {
            Command::Run(run) => {
                assert_eq!(run.suite, vec!["parallel-fail", "setup-fail"]);
                assert_eq!(run.mode.as_deref(), Some("parallel"));
                assert_eq!(run.workers, Some(2));
                assert_eq!(run.delay, 10);
                assert_eq!(run.timeout, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_verbose() {
        let args = Args::parse_from(["suite-runner", "list", "--detailed", "-v"]);
        assert!(args.verbose);
        assert!(matches!(args.command, Command::List(ListArgs { detailed: true })));
    }
}
