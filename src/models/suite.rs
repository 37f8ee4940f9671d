//! Suite and test case declarations
//!
//! A [`Suite`] is built with [`SuiteBuilder`] by registering hooks and test
//! cases in order, then handed to the scheduler.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::TestContext;
use crate::error::SuiteError;
use crate::models::TestStatus;

/// Future produced by a unit of work
pub type WorkFuture = BoxFuture<'static, anyhow::Result<()>>;

/// A test body or hook: called once per execution with a fresh context
pub type Work = Arc<dyn Fn(TestContext) -> WorkFuture + Send + Sync>;

/// Wrap an async closure as a [`Work`]
pub fn work<F, Fut>(f: F) -> Work
where
    F: Fn(TestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

/// Concurrency mode of a suite
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One test case at a time, in declaration order
    #[default]
    Serial,
    /// All test cases launched concurrently
    Parallel,
}

impl Mode {
    /// Parse a mode name; `default` is an alias for serial
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "serial" => Some(Mode::Serial),
            "parallel" => Some(Mode::Parallel),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Serial => "default",
            Mode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lifecycle point a hook is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookKind {
    BeforeAll,
    AfterAll,
    BeforeEach,
    AfterEach,
}

impl HookKind {
    pub fn name(&self) -> &'static str {
        match self {
            HookKind::BeforeAll => "beforeAll",
            HookKind::AfterAll => "afterAll",
            HookKind::BeforeEach => "beforeEach",
            HookKind::AfterEach => "afterEach",
        }
    }

    /// Hooks that run once per suite rather than once per test
    pub fn is_suite_level(&self) -> bool {
        matches!(self, HookKind::BeforeAll | HookKind::AfterAll)
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Hooks registered on a suite, in registration order per lifecycle point
#[derive(Clone, Default)]
pub struct Hooks {
    pub before_all: Vec<Work>,
    pub after_all: Vec<Work>,
    pub before_each: Vec<Work>,
    pub after_each: Vec<Work>,
}

impl Hooks {
    pub fn get(&self, kind: HookKind) -> &[Work] {
        match kind {
            HookKind::BeforeAll => &self.before_all,
            HookKind::AfterAll => &self.after_all,
            HookKind::BeforeEach => &self.before_each,
            HookKind::AfterEach => &self.after_each,
        }
    }

    fn push(&mut self, kind: HookKind, hook: Work) {
        match kind {
            HookKind::BeforeAll => self.before_all.push(hook),
            HookKind::AfterAll => self.after_all.push(hook),
            HookKind::BeforeEach => self.before_each.push(hook),
            HookKind::AfterEach => self.after_each.push(hook),
        }
    }

    pub fn count(&self) -> usize {
        self.before_all.len() + self.after_all.len() + self.before_each.len() + self.after_each.len()
    }
}

/// A named unit of work with a single outcome
#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: Work,
    status: TestStatus,
}

impl TestCase {
    pub fn new(name: impl Into<String>, body: Work) -> Self {
        Self {
            name: name.into(),
            body,
            status: TestStatus::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub(crate) fn body(&self) -> &Work {
        &self.body
    }

    pub(crate) fn set_status(&mut self, status: TestStatus) {
        self.status = status;
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// An ordered collection of test cases sharing hooks and a mode
#[derive(Clone)]
pub struct Suite {
    name: String,
    mode: Mode,
    cases: Vec<TestCase>,
    hooks: Hooks,
}

impl Suite {
    pub fn builder(name: impl Into<String>) -> SuiteBuilder {
        SuiteBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Keep only the test cases matching `predicate`
    pub fn retain(&mut self, mut predicate: impl FnMut(&TestCase) -> bool) {
        self.cases.retain(|c| predicate(c));
    }

    /// Put every test case back to `Pending` before a new run
    pub(crate) fn reset(&mut self) {
        for case in &mut self.cases {
            case.set_status(TestStatus::Pending);
        }
    }

    pub(crate) fn cases_mut(&mut self) -> &mut [TestCase] {
        &mut self.cases
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("cases", &self.cases)
            .field("hooks", &self.hooks.count())
            .finish()
    }
}

/// Builder for [`Suite`]
pub struct SuiteBuilder {
    name: String,
    mode: Mode,
    cases: Vec<TestCase>,
    hooks: Hooks,
}

impl SuiteBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::default(),
            cases: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn parallel(self) -> Self {
        self.mode(Mode::Parallel)
    }

    pub fn hook<F, Fut>(mut self, kind: HookKind, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.push(kind, work(f));
        self
    }

    pub fn before_all<F, Fut>(self, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::BeforeAll, f)
    }

    pub fn after_all<F, Fut>(self, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::AfterAll, f)
    }

    pub fn before_each<F, Fut>(self, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::BeforeEach, f)
    }

    pub fn after_each<F, Fut>(self, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::AfterEach, f)
    }

    /// Register a test case
    pub fn test<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.cases.push(TestCase::new(name, work(f)));
        self
    }

    /// Register an already-wrapped test body
    pub fn test_work(mut self, name: impl Into<String>, body: Work) -> Self {
        self.cases.push(TestCase::new(name, body));
        self
    }

    /// Validate names and produce the suite
    pub fn build(self) -> Result<Suite, SuiteError> {
        if self.name.trim().is_empty() {
            return Err(SuiteError::EmptySuiteName);
        }

        let mut seen = HashSet::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err(SuiteError::EmptyTestName(self.name.clone()));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(SuiteError::DuplicateTest {
                    suite: self.name.clone(),
                    test: case.name.clone(),
                });
            }
        }

        Ok(Suite {
            name: self.name,
            mode: self.mode,
            cases: self.cases,
            hooks: self.hooks,
        })
    }
}
