//! CLI command definitions using clap

use crate::config::{ColorChoice, LogFormat};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tackle-e2e: browser-driven end-to-end suites for the Tackle UI
#[derive(Parser, Debug)]
#[command(name = "tackle-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run suites against a Tackle instance
    Run(RunArgs),

    /// List the built-in suites with their tags and tests
    List(ListArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Suite to run (repeatable; all suites when omitted)
    #[arg(short, long = "suite", value_name = "NAME")]
    pub suites: Vec<String>,

    /// Only run suites carrying one of these tags (repeatable or comma separated)
    #[arg(short, long = "tags", value_name = "TAG", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the Tackle UI
    #[arg(long)]
    pub url: Option<String>,

    /// Browser driver
    #[arg(long, default_value = "chromium")]
    pub driver: DriverArg,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Disable the Chromium sandbox
    #[arg(long)]
    pub no_sandbox: bool,

    /// Stop after the first failing test
    #[arg(long)]
    pub fail_fast: bool,

    /// Upper bound for a single test in milliseconds
    #[arg(long, value_name = "MS")]
    pub test_timeout: Option<u64>,

    /// Result output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the Tackle UI
    #[arg(long)]
    pub url: Option<String>,
}

/// Driver argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Chromium over CDP
    #[default]
    Chromium,
    /// In-process fake application
    Fake,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON lines
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["tackle-e2e", "run"]).unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(args.suites.is_empty());
            assert_eq!(args.driver, DriverArg::Chromium);
            assert_eq!(args.format, FormatArg::Text);
            assert!(!args.fail_fast);
        }

        #[test]
        fn test_repeated_and_comma_separated_values() {
            let cli = Cli::try_parse_from([
                "tackle-e2e",
                "run",
                "--suite",
                "tag-types-sort",
                "-s",
                "business-services-pagination",
                "--tags",
                "@tier2,@tier3",
                "--driver",
                "fake",
            ])
            .unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.suites.len(), 2);
            assert_eq!(args.tags, vec!["@tier2", "@tier3"]);
            assert_eq!(args.driver, DriverArg::Fake);
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from(["tackle-e2e", "run", "-vv", "--log-format", "json"])
                .unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.log_format, LogFormatArg::Json));
        }

        #[test]
        fn test_unknown_driver_rejected() {
            assert!(Cli::try_parse_from(["tackle-e2e", "run", "--driver", "firefox"]).is_err());
        }
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
    }
}
