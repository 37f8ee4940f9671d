//! Configuration module
//!
//! Runner settings with defaults, environment overrides and validation.

mod env;

pub use env::EnvConfig;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Mode;
use crate::utils::LogLevel;

/// Runner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum concurrently running test cases in parallel mode (0 = unbounded)
    pub max_concurrent: usize,

    /// Per-unit timeout in milliseconds; `None` disables it
    pub test_timeout_ms: Option<u64>,

    /// Number of times each suite is run
    pub repeat_each: u32,

    /// Force every suite into this mode
    pub mode_override: Option<Mode>,

    /// Only run tests whose name contains this substring
    pub grep: Option<String>,

    pub log_level: LogLevel,

    /// Output format name (table, json, json-pretty, summary)
    pub format: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            test_timeout_ms: Some(30_000),
            repeat_each: 1,
            mode_override: None,
            grep: None,
            log_level: LogLevel::Info,
            format: "table".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Defaults overlaid with `SUITE_RUNNER_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(&EnvConfig::load());
        config
    }

    /// Overlay values present in `env`
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(workers) = env.workers {
            self.max_concurrent = workers;
        }
        if let Some(timeout) = env.timeout_ms {
            self.test_timeout_ms = if timeout == 0 { None } else { Some(timeout) };
        }
        if let Some(repeat) = env.repeat {
            self.repeat_each = repeat;
        }
        if let Some(mode) = env.mode.as_deref().and_then(Mode::from_str) {
            self.mode_override = Some(mode);
        }
        if let Some(grep) = &env.grep {
            self.grep = Some(grep.clone());
        }
        if let Some(level) = env.log.as_deref().and_then(LogLevel::from_str) {
            self.log_level = level;
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
    }

    pub fn test_timeout(&self) -> Option<Duration> {
        self.test_timeout_ms.map(Duration::from_millis)
    }

    /// Check the configuration for values the runner cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.repeat_each == 0 {
            bail!("repeat_each must be at least 1");
        }
        if self.test_timeout_ms == Some(0) {
            bail!("test timeout must be positive (omit it to disable)");
        }
        if let Some(grep) = &self.grep {
            if grep.is_empty() {
                bail!("grep pattern must not be empty");
            }
        }
        Ok(())
    }
}
