//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::str::FromStr;

/// Environment variable prefix
const ENV_PREFIX: &str = "SUITE_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Max concurrent tests from SUITE_RUNNER_WORKERS
    pub workers: Option<usize>,
    /// Timeout in ms from SUITE_RUNNER_TIMEOUT (0 disables)
    pub timeout_ms: Option<u64>,
    /// Rounds from SUITE_RUNNER_REPEAT
    pub repeat: Option<u32>,
    /// Mode override from SUITE_RUNNER_MODE
    pub mode: Option<String>,
    /// Test name filter from SUITE_RUNNER_GREP
    pub grep: Option<String>,
    /// Log level from SUITE_RUNNER_LOG
    pub log: Option<String>,
    /// Output format from SUITE_RUNNER_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(format!("{ENV_PREFIX}_{name}")).ok())
    }

    /// Build from an arbitrary lookup of unprefixed names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            workers: parse_var(&lookup, "WORKERS"),
            timeout_ms: parse_var(&lookup, "TIMEOUT"),
            repeat: parse_var(&lookup, "REPEAT"),
            mode: lookup("MODE"),
            grep: lookup("GREP"),
            log: lookup("LOG"),
            format: lookup("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.workers.is_some()
            || self.timeout_ms.is_some()
            || self.repeat.is_some()
            || self.mode.is_some()
            || self.grep.is_some()
            || self.log.is_some()
            || self.format.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_WORKERS:  {:?}", ENV_PREFIX, self.workers);
        println!("  {}_TIMEOUT:  {:?}", ENV_PREFIX, self.timeout_ms);
        println!("  {}_REPEAT:   {:?}", ENV_PREFIX, self.repeat);
        println!("  {}_MODE:     {:?}", ENV_PREFIX, self.mode);
        println!("  {}_GREP:     {:?}", ENV_PREFIX, self.grep);
        println!("  {}_LOG:      {:?}", ENV_PREFIX, self.log);
        println!("  {}_FORMAT:   {:?}", ENV_PREFIX, self.format);
    }
}

/// Look up a variable and parse it, ignoring unparsable values
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("WORKERS", "8"),
            ("TIMEOUT", " 1500 "),
            ("REPEAT", "nope"),
            ("MODE", "parallel"),
        ]
        .into_iter()
        .collect();

        let config = EnvConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.workers, Some(8));
        assert_eq!(config.timeout_ms, Some(1500));
        assert_eq!(config.repeat, None);
        assert_eq!(config.mode.as_deref(), Some("parallel"));
        assert!(config.has_any());
    }

    #[test]
    fn test_empty_lookup() {
        let config = EnvConfig::from_lookup(|_| None);
        assert_eq!(config, EnvConfig::default());
        assert!(!config.has_any());
    }
}
