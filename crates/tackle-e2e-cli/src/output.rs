//! Output formatting and progress reporting

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tackle_e2e::{RunObserver, SuiteResults, TestResult, TestStatus};

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document printed once the run ends
    Json,
}

/// Summary of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub suites: Vec<SuiteResults>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub hook_errors: usize,
}

impl RunReport {
    /// Tally `suites`
    #[must_use]
    pub fn new(suites: Vec<SuiteResults>) -> Self {
        let passed = suites.iter().map(SuiteResults::passed_count).sum();
        let failed = suites.iter().map(SuiteResults::failed_count).sum();
        let skipped = suites.iter().map(SuiteResults::skipped_count).sum();
        let hook_errors = suites.iter().filter(|s| s.hook_error.is_some()).count();
        Self {
            suites,
            passed,
            failed,
            skipped,
            hook_errors,
        }
    }

    /// Every executed test passed and every hook succeeded
    #[must_use]
    pub fn success(&self) -> bool {
        self.suites.iter().all(SuiteResults::all_passed)
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        );
        if self.hook_errors > 0 {
            line.push_str(&format!(", {} hook error(s)", self.hook_errors));
        }
        line
    }
}

/// Progress reporter for suite execution
///
/// Result lines go to stdout, the progress bar to stderr. With JSON output
/// nothing is printed while the run is in progress.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
    /// Output format
    pub format: OutputFormat,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            progress_bar: None,
            use_color,
            quiet,
            format: OutputFormat::Text,
        }
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn silent(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn write_line(&self, line: &str) {
        let write = || {
            let _ = self.term.write_line(line);
        };
        match &self.progress_bar {
            Some(pb) => pb.suspend(write),
            None => write(),
        }
    }

    /// Colored or plain status tag
    #[must_use]
    pub fn status_tag(&self, status: TestStatus) -> String {
        let (plain, styled) = match status {
            TestStatus::Passed => ("PASS", style("PASS").green().bold()),
            TestStatus::Failed => ("FAIL", style("FAIL").red().bold()),
            TestStatus::Skipped => ("SKIP", style("SKIP").yellow()),
        };
        if self.use_color {
            styled.to_string()
        } else {
            plain.to_string()
        }
    }

    /// Line printed for one finished test
    #[must_use]
    pub fn result_line(&self, suite: &str, result: &TestResult) -> String {
        let mut line = format!(
            "{} {suite} > {} ({}ms)",
            self.status_tag(result.status),
            result.name,
            result.duration_ms
        );
        if let Some(error) = &result.error {
            line.push_str(&format!("\n    {error}"));
        }
        line
    }

    /// Print the final summary, or the JSON report
    pub fn finish(&self, report: &RunReport) -> serde_json::Result<()> {
        if self.silent() {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }
        let summary = report.summary();
        let line = if !self.use_color {
            summary
        } else if report.success() {
            style(summary).green().bold().to_string()
        } else {
            style(summary).red().bold().to_string()
        };
        self.write_line(&line);
        Ok(())
    }
}

impl RunObserver for ProgressReporter {
    fn suite_started(&mut self, suite: &str, tests: usize) {
        if self.silent() || self.quiet {
            return;
        }
        let pb = ProgressBar::new(tests as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(suite.to_string());
        self.progress_bar = Some(pb);
    }

    fn test_finished(&mut self, suite: &str, result: &TestResult) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
        if self.silent() {
            return;
        }
        // Failures are printed even in quiet mode
        if self.quiet && result.status != TestStatus::Failed {
            return;
        }
        self.write_line(&self.result_line(suite, result));
    }

    fn suite_finished(&mut self, results: &SuiteResults) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
        if self.silent() {
            return;
        }
        if let Some(error) = &results.hook_error {
            let tag = self.status_tag(TestStatus::Failed);
            self.write_line(&format!("{tag} {} hook: {error}", results.suite_name));
        } else if results.skipped && !self.quiet {
            let tag = self.status_tag(TestStatus::Skipped);
            self.write_line(&format!("{tag} {} (not selected)", results.suite_name));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn suite(results: Vec<TestResult>) -> SuiteResults {
        SuiteResults {
            suite_name: "tag-types-sort".to_string(),
            tags: vec!["@tier3".to_string()],
            results,
            hook_error: None,
            skipped: false,
            duration_ms: 0,
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_tallies() {
            let report = RunReport::new(vec![suite(vec![
                TestResult::pass("rank sort"),
                TestResult::fail("tag count sort", "out of order"),
                TestResult::skip("tag type sort"),
            ])]);
            assert_eq!(report.passed, 1);
            assert_eq!(report.failed, 1);
            assert_eq!(report.skipped, 1);
            assert!(!report.success());
            assert_eq!(report.summary(), "1 passed, 1 failed, 1 skipped");
        }

        #[test]
        fn test_hook_error_fails_the_run() {
            let mut broken = suite(vec![TestResult::pass("rank sort")]);
            broken.hook_error = Some("login failed".to_string());
            let report = RunReport::new(vec![broken]);
            assert!(!report.success());
            assert!(report.summary().contains("1 hook error(s)"));
        }

        #[test]
        fn test_empty_run_succeeds() {
            assert!(RunReport::new(Vec::new()).success());
        }
    }

    mod line_tests {
        use super::*;

        #[test]
        fn test_plain_tags() {
            let reporter = ProgressReporter::new(false, false);
            assert_eq!(reporter.status_tag(TestStatus::Passed), "PASS");
            assert_eq!(reporter.status_tag(TestStatus::Failed), "FAIL");
            assert_eq!(reporter.status_tag(TestStatus::Skipped), "SKIP");
        }

        #[test]
        fn test_failure_line_carries_error() {
            let reporter = ProgressReporter::new(false, false);
            let line = reporter.result_line(
                "tag-types-sort",
                &TestResult::fail("rank sort", "expected 1 before 2"),
            );
            assert!(line.starts_with("FAIL tag-types-sort > rank sort"));
            assert!(line.contains("expected 1 before 2"));
        }
    }
}
