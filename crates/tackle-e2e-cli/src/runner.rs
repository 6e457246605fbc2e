//! Run orchestration: resolve configuration, start a driver, run suites.

use crate::commands::{DriverArg, RunArgs};
use crate::error::{CliError, CliResult};
use crate::output::{ProgressReporter, RunReport};
use std::path::Path;
use std::sync::Arc;
use tackle_e2e::mock::FakeTackle;
use tackle_e2e::{suites, Session, SuiteRunner, TackleConfig, TackleDriver};
use tracing::{info, warn};

/// Load the layered configuration and apply the URL flag
pub fn resolve_config(path: Option<&Path>, url: Option<&str>) -> CliResult<TackleConfig> {
    let config = TackleConfig::load(path)?;
    match url {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
            CliError::invalid_argument(format!("--url must be an http(s) URL, got `{url}`")),
        ),
        Some(url) => Ok(config.with_base_url(url)),
        None => Ok(config),
    }
}

/// Everything a run needs, resolved from flags and configuration
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub config: TackleConfig,
    pub suites: Vec<String>,
    pub driver: DriverArg,
    pub headful: bool,
    pub no_sandbox: bool,
    pub fail_fast: bool,
    pub test_timeout_ms: Option<u64>,
}

impl RunPlan {
    /// Resolve `args`; `--tags` replaces any configured tag filter
    pub fn from_args(args: &RunArgs) -> CliResult<Self> {
        let mut config = resolve_config(args.config.as_deref(), args.url.as_deref())?;
        if !args.tags.is_empty() {
            config = config.with_grep_tags(args.tags.iter().cloned());
        }
        Ok(Self {
            config,
            suites: args.suites.clone(),
            driver: args.driver,
            headful: args.headful,
            no_sandbox: args.no_sandbox,
            fail_fast: args.fail_fast,
            test_timeout_ms: args.test_timeout,
        })
    }

    fn runner(&self) -> SuiteRunner {
        let mut runner = SuiteRunner::from_config(&self.config);
        if self.fail_fast {
            runner = runner.with_fail_fast();
        }
        if let Some(ms) = self.test_timeout_ms {
            runner = runner.with_test_timeout(ms);
        }
        runner
    }
}

/// Driver and the configuration that matches it
///
/// The fake application only answers at its own address, so its
/// configuration replaces the URL and login while keeping the tag filter.
async fn start_driver(plan: &RunPlan) -> CliResult<(Arc<dyn TackleDriver>, TackleConfig)> {
    match plan.driver {
        DriverArg::Fake => {
            let fake = Arc::new(FakeTackle::new());
            let mut config = fake.config();
            config.grep_tags.clone_from(&plan.config.grep_tags);
            let driver: Arc<dyn TackleDriver> = fake;
            Ok((driver, config))
        }
        DriverArg::Chromium => start_chromium(plan).await,
    }
}

#[cfg(feature = "browser")]
async fn start_chromium(plan: &RunPlan) -> CliResult<(Arc<dyn TackleDriver>, TackleConfig)> {
    let driver_config = tackle_e2e::DriverConfig::new()
        .headless(!plan.headful)
        .no_sandbox(plan.no_sandbox);
    let driver: Arc<dyn TackleDriver> =
        Arc::new(tackle_e2e::ChromiumDriver::launch(&driver_config).await?);
    Ok((driver, plan.config.clone()))
}

#[cfg(not(feature = "browser"))]
async fn start_chromium(_plan: &RunPlan) -> CliResult<(Arc<dyn TackleDriver>, TackleConfig)> {
    Err(CliError::config(
        "Chromium driver not enabled. Rebuild with --features browser or use --driver fake",
    ))
}

/// Run the selected suites and report through `reporter`
pub async fn execute(plan: &RunPlan, reporter: &mut ProgressReporter) -> CliResult<RunReport> {
    let mut selected = suites::select(&plan.suites)?;
    let (driver, config) = start_driver(plan).await?;
    info!(
        url = %config.base_url,
        suites = selected.len(),
        driver = ?plan.driver,
        "starting run"
    );
    let session = Session::new(Arc::clone(&driver), config);
    let results = plan.runner().run_all(&session, &mut selected, reporter).await;
    if let Err(e) = driver.close().await {
        warn!(error = %e, "driver did not close cleanly");
    }
    Ok(RunReport::new(results))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["tackle-e2e", "run"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_url_flag_overrides_config() {
        let config = resolve_config(None, Some("https://tackle.example.com")).unwrap();
        assert_eq!(config.base_url, "https://tackle.example.com");
    }

    #[test]
    fn test_url_flag_must_be_http() {
        let err = resolve_config(None, Some("tackle.example.com")).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_tags_flag_replaces_filter() {
        let plan = RunPlan::from_args(&run_args(&["--tags", "@tier2"])).unwrap();
        assert_eq!(plan.config.grep_tags, Some(vec!["@tier2".to_string()]));
        assert!(plan.config.has_to_be_skipped("@tier3"));
    }

    #[tokio::test]
    async fn test_fake_run_passes() {
        let plan =
            RunPlan::from_args(&run_args(&["--driver", "fake", "--suite", "tag-types-sort"]))
                .unwrap();
        let mut reporter = ProgressReporter::new(false, true);
        let report = execute(&plan, &mut reporter).await.unwrap();
        assert!(report.success(), "{report:?}");
        assert_eq!(report.suites.len(), 1);
        assert_eq!(report.passed, 3);
    }

    #[tokio::test]
    async fn test_unknown_suite_is_rejected_before_driver_start() {
        let plan = RunPlan::from_args(&run_args(&["--driver", "fake", "--suite", "nope"])).unwrap();
        let mut reporter = ProgressReporter::new(false, true);
        let err = execute(&plan, &mut reporter).await.unwrap_err();
        assert!(err.to_string().contains("unknown suite"));
    }
}
