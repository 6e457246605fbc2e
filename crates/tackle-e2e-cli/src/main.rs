//! tackle-e2e: run the Tackle end-to-end suites
//!
//! ## Usage
//!
//! ```bash
//! tackle-e2e run                                  # every suite, Chromium
//! tackle-e2e run --tags @tier2 --url https://tackle.example.com
//! tackle-e2e run --driver fake --format json      # in-process fake
//! tackle-e2e list                                 # suites, tags and tests
//! tackle-e2e config --config tackle.yaml          # resolved settings
//! ```

use clap::Parser;
use std::process::ExitCode;
use tackle_e2e::suites;
use tackle_e2e_cli::{
    execute, logging, resolve_config, Cli, CliConfig, CliError, CliResult, Commands, ConfigArgs,
    FormatArg, ListArgs, ProgressReporter, RunArgs, RunPlan, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(config.verbosity, config.log_format)?;
    let use_color = config.color.should_color();
    console::set_colors_enabled(use_color);
    console::set_colors_enabled_stderr(use_color);

    match cli.command {
        Commands::Run(args) => run_suites(&config, &args),
        Commands::List(args) => run_list(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_log_format(cli.log_format.into())
}

fn run_suites(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let plan = RunPlan::from_args(args)?;
    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet())
            .with_format(args.format.into());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(execute(&plan, &mut reporter))?;
    reporter.finish(&report)?;

    if report.success() {
        Ok(())
    } else {
        Err(CliError::test_execution(report.summary()))
    }
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let catalog = suites::catalog();
    if args.format == FormatArg::Json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }
    for suite in catalog {
        println!("{} [{}]", suite.name, suite.tags.join(", "));
        for test in suite.tests {
            println!("  - {test}");
        }
    }
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let config = resolve_config(args.config.as_deref(), args.url.as_deref())?;
    print!("{}", serde_yaml_ng::to_string(&config.redacted())?);
    Ok(())
}
