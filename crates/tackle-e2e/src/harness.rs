//! Suite harness.
//!
//! A [`Suite`] is a named, tagged group of tests sharing one [`Session`],
//! with hooks for setup and teardown. [`SuiteRunner`] runs suites
//! sequentially and collects a [`SuiteResults`] per suite.

use crate::config::TackleConfig;
use crate::result::{TackleError, TackleResult};
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

// =============================================================================
// SUITE
// =============================================================================

/// A group of tests run against one session
///
/// `before` runs once before the first test, `before_each` before every
/// test, `after` once at the end, even when `before` failed.
#[async_trait]
pub trait Suite: Send {
    /// Suite name, unique within a registry
    fn name(&self) -> &'static str;

    /// Tags used to select the suite, e.g. `@tier2`
    fn tags(&self) -> &'static [&'static str];

    /// Test names in run order
    fn tests(&self) -> &'static [&'static str];

    async fn before(&mut self, _session: &Session) -> TackleResult<()> {
        Ok(())
    }

    async fn before_each(&mut self, _session: &Session) -> TackleResult<()> {
        Ok(())
    }

    /// Run the test named `test`
    async fn run_test(&mut self, session: &Session, test: &str) -> TackleResult<()>;

    async fn after(&mut self, _session: &Session) -> TackleResult<()> {
        Ok(())
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// How a test ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    /// Not run because an earlier step failed
    Skipped,
}

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name
    pub name: String,
    pub status: TestStatus,
    /// Error message if failed
    pub error: Option<String>,
    /// Test duration in milliseconds
    pub duration_ms: u64,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            error: None,
            duration_ms: 0,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    #[must_use]
    pub fn skip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            error: None,
            duration_ms: 0,
        }
    }

    /// Set duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Results from running a test suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    pub tags: Vec<String>,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Failure of `before` or `after`
    pub hook_error: Option<String>,
    /// Suite not selected by the tag filter
    pub skipped: bool,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteResults {
    fn new(suite: &dyn Suite) -> Self {
        Self {
            suite_name: suite.name().to_string(),
            tags: suite.tags().iter().map(|t| (*t).to_string()).collect(),
            results: Vec::new(),
            hook_error: None,
            skipped: false,
            duration_ms: 0,
        }
    }

    /// Check if all tests passed and both hooks succeeded
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.hook_error.is_none() && self.results.iter().all(TestResult::passed)
    }

    /// Count passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Count failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Failed)
            .collect()
    }

    fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Receives progress while suites run
pub trait RunObserver: Send {
    fn suite_started(&mut self, _suite: &str, _tests: usize) {}
    fn test_finished(&mut self, _suite: &str, _result: &TestResult) {}
    fn suite_finished(&mut self, _results: &SuiteResults) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Runs suites sequentially against one session
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    /// Stop at the first failing test
    pub fail_fast: bool,
    /// Upper bound for a single test, hooks included
    pub test_timeout_ms: Option<u64>,
    /// Only run suites carrying one of these tags; `None` runs all
    pub grep_tags: Option<Vec<String>>,
}

impl SuiteRunner {
    /// Create a new runner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner taking its tag filter from `config`
    #[must_use]
    pub fn from_config(config: &TackleConfig) -> Self {
        Self {
            grep_tags: config.grep_tags.clone(),
            ..Self::default()
        }
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    #[must_use]
    pub const fn with_test_timeout(mut self, ms: u64) -> Self {
        self.test_timeout_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn with_grep_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grep_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the tag filter selects `suite`
    #[must_use]
    pub fn selects(&self, suite: &dyn Suite) -> bool {
        self.grep_tags.as_ref().map_or(true, |wanted| {
            suite.tags().iter().any(|tag| wanted.iter().any(|w| w == tag))
        })
    }

    /// Run every suite in order
    ///
    /// With fail-fast set, suites after the first failing one are not run.
    pub async fn run_all(
        &self,
        session: &Session,
        suites: &mut [Box<dyn Suite>],
        observer: &mut dyn RunObserver,
    ) -> Vec<SuiteResults> {
        let mut all = Vec::with_capacity(suites.len());
        for suite in suites.iter_mut() {
            let results = self.run(session, suite.as_mut(), observer).await;
            let failed = !results.all_passed();
            all.push(results);
            if failed && self.fail_fast {
                warn!("fail-fast: stopping after failed suite");
                break;
            }
        }
        all
    }

    /// Run one suite
    #[instrument(skip_all, fields(suite = suite.name()))]
    pub async fn run(
        &self,
        session: &Session,
        suite: &mut dyn Suite,
        observer: &mut dyn RunObserver,
    ) -> SuiteResults {
        let start = Instant::now();
        let mut results = SuiteResults::new(suite);
        if !self.selects(suite) {
            info!(suite = suite.name(), "suite not selected by tags");
            results.skipped = true;
            observer.suite_finished(&results);
            return results;
        }
        let tests = suite.tests();
        observer.suite_started(suite.name(), tests.len());
        info!(suite = suite.name(), tests = tests.len(), "suite started");

        match self.bounded("before", suite.before(session)).await {
            Ok(()) => {
                let mut stop = false;
                for test in tests {
                    let result = if stop {
                        TestResult::skip(*test)
                    } else {
                        self.run_test(session, suite, test).await
                    };
                    stop |= self.fail_fast && result.status == TestStatus::Failed;
                    observer.test_finished(suite.name(), &result);
                    results.results.push(result);
                }
            }
            Err(e) => {
                warn!(suite = suite.name(), error = %e, "before hook failed");
                results.hook_error = Some(format!("before: {e}"));
                for test in tests {
                    let result = TestResult::skip(*test);
                    observer.test_finished(suite.name(), &result);
                    results.results.push(result);
                }
            }
        }

        if let Err(e) = self.bounded("after", suite.after(session)).await {
            warn!(suite = suite.name(), error = %e, "after hook failed");
            let after = format!("after: {e}");
            results.hook_error = Some(match results.hook_error.take() {
                Some(before) => format!("{before}; {after}"),
                None => after,
            });
        }
        results.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            suite = suite.name(),
            passed = results.passed_count(),
            failed = results.failed_count(),
            skipped = results.skipped_count(),
            "suite finished"
        );
        observer.suite_finished(&results);
        results
    }

    #[instrument(skip(self, session, suite))]
    async fn run_test(&self, session: &Session, suite: &mut dyn Suite, test: &str) -> TestResult {
        let start = Instant::now();
        let outcome = self
            .bounded(test, async {
                session.reset_between_tests().await?;
                suite.before_each(session).await?;
                suite.run_test(session, test).await
            })
            .await;
        let result = match outcome {
            Ok(()) => {
                info!(test, "test passed");
                TestResult::pass(test)
            }
            Err(e) => {
                warn!(test, error = %e, "test failed");
                TestResult::fail(test, e.to_string())
            }
        };
        result.with_duration(start.elapsed())
    }

    async fn bounded<F>(&self, step: &str, fut: F) -> TackleResult<()>
    where
        F: std::future::Future<Output = TackleResult<()>>,
    {
        match self.test_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), fut)
                .await
                .unwrap_or_else(|_| {
                    Err(TackleError::Timeout {
                        ms,
                        waited_for: format!("`{step}` to finish"),
                    })
                }),
            None => fut.await,
        }
    }
}
