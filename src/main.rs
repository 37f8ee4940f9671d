//! suite-runner - run demonstration suites from the command line
//!
//! ```bash
//! # Run every built-in suite
//! suite-runner run
//!
//! # Run one suite in parallel mode, 5 rounds
//! suite-runner run --suite default-mode --mode parallel --repeat 5
//!
//! # List suites and their tests
//! suite-runner list --detailed
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use suite_runner::cli::{self, Args};
use suite_runner::config::{EnvConfig, RunnerConfig};
use suite_runner::models::{Mode, Suite};
use suite_runner::output::{write_results_to_file, OutputFormat, ResultFormatter};
use suite_runner::utils::{init_logger, LogLevel};
use suite_runner::{scenarios, BatchRunner, Scheduler};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = RunnerConfig::from_env();
    if args.verbose {
        config.log_level = LogLevel::Debug;
    }
    init_logger(config.log_level);

    match args.command {
        cli::Command::Run(run_args) => run_suites(run_args, config).await,
        cli::Command::List(list_args) => {
            list_suites(list_args)?;
            Ok(ExitCode::SUCCESS)
        }
        cli::Command::Config => {
            show_config(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Fold command-line flags over the environment-derived configuration
fn apply_args(config: &mut RunnerConfig, args: &cli::RunArgs) -> Result<()> {
    if let Some(mode) = &args.mode {
        let mode = Mode::from_str(mode).ok_or_else(|| anyhow::anyhow!("Unknown mode: {mode}"))?;
        config.mode_override = Some(mode);
    }
    if let Some(workers) = args.workers {
        config.max_concurrent = workers;
    }
    if let Some(timeout) = args.timeout {
        config.test_timeout_ms = if timeout == 0 { None } else { Some(timeout) };
    }
    if let Some(repeat) = args.repeat {
        config.repeat_each = repeat;
    }
    if let Some(grep) = &args.grep {
        config.grep = Some(grep.clone());
    }
    if let Some(format) = &args.format {
        config.format = format.clone();
    }
    config.validate()
}

fn select_suites(names: &[String], delay: Duration) -> Result<Vec<Suite>> {
    if names.is_empty() {
        return Ok(scenarios::all(delay)?);
    }

    names
        .iter()
        .map(|name| {
            scenarios::by_name(name, delay)
                .ok_or_else(|| anyhow::anyhow!("Unknown suite: {name}"))?
                .with_context(|| format!("Failed to build suite {name}"))
        })
        .collect()
}

async fn run_suites(args: cli::RunArgs, mut config: RunnerConfig) -> Result<ExitCode> {
    apply_args(&mut config, &args)?;

    let format = OutputFormat::from_str(&config.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", config.format))?;
    let formatter = ResultFormatter::new(format);

    let mut suites = select_suites(&args.suite, Duration::from_millis(args.delay))?;
    for suite in &mut suites {
        if let Some(mode) = config.mode_override {
            suite.set_mode(mode);
        }
        if let Some(pattern) = &config.grep {
            suite.retain(|case| case.name().contains(pattern.as_str()));
        }
    }
    suites.retain(|suite| {
        if suite.is_empty() {
            warn!("Suite '{}' has no tests matching the filter", suite.name());
        }
        !suite.is_empty()
    });

    info!(
        "Running {} suites (workers: {}, timeout: {:?}, rounds: {})",
        suites.len(),
        config.max_concurrent,
        config.test_timeout(),
        config.repeat_each
    );

    let runner = BatchRunner::new(Scheduler::from_config(&config), config.repeat_each);
    let mut all_results = Vec::new();

    for suite in &mut suites {
        let results = runner.run_rounds(suite).await;

        for result in &results {
            println!("{}", formatter.format_suite(result));
        }
        if results.len() > 1 {
            let aggregate = BatchRunner::aggregate_results(&results);
            println!("{}", formatter.format_aggregate(&aggregate));
        }

        all_results.extend(results);
    }

    if let Some(path) = &args.output {
        write_results_to_file(path, &all_results, format)
            .with_context(|| format!("Failed to write results to {path}"))?;
        info!("Saved results to {}", path);
    }

    let failed = all_results.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        warn!("{} of {} suite runs failed", failed, all_results.len());
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn list_suites(args: cli::ListArgs) -> Result<()> {
    let suites = scenarios::all(scenarios::DEFAULT_DELAY)?;

    println!("\nBuilt-in suites ({} total)\n", suites.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for suite in &suites {
        println!(
            "  {:16} [{:8}] {}",
            suite.name(),
            suite.mode().name(),
            scenarios::describe(suite.name()).unwrap_or("")
        );

        if args.detailed {
            for case in suite.cases() {
                println!("      - {}", case.name());
            }
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    Ok(())
}

fn show_config(config: &RunnerConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    let env = EnvConfig::load();
    if env.has_any() {
        println!();
        env.print_summary();
    }
    Ok(())
}
