//! Error types
//!
//! `FailureCause` describes why a test case (or a suite-level hook) failed.
//! `SuiteError` covers mistakes made while declaring a suite.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::HookKind;

/// Why a unit of work ended in failure
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// The test body returned an error or panicked
    #[error("{message}")]
    Test { message: String },

    /// A per-test hook (`beforeEach` / `afterEach`) or a suite hook failed
    #[error("{hook} hook failed: {message}")]
    Hook { hook: HookKind, message: String },

    /// A `beforeAll` hook failed, so the body never ran
    #[error("setup failed: {message}")]
    Setup { message: String },

    /// A unit of work exceeded its time limit
    #[error("{during} timed out after {limit_ms}ms")]
    Timeout { during: String, limit_ms: u64 },
}

impl FailureCause {
    pub fn test(message: impl Into<String>) -> Self {
        FailureCause::Test {
            message: message.into(),
        }
    }

    pub fn hook(hook: HookKind, message: impl Into<String>) -> Self {
        FailureCause::Hook {
            hook,
            message: message.into(),
        }
    }

    pub fn setup(message: impl Into<String>) -> Self {
        FailureCause::Setup {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FailureCause::Timeout { .. })
    }
}

/// Errors raised while building a suite
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SuiteError {
    #[error("Suite name must not be empty")]
    EmptySuiteName,

    #[error("Test name must not be empty in suite '{0}'")]
    EmptyTestName(String),

    #[error("Duplicate test name '{test}' in suite '{suite}'")]
    DuplicateTest { suite: String, test: String },
}
