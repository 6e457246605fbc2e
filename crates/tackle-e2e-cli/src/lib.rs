//! tackle-e2e CLI library
//!
//! Argument parsing, logging setup, progress output and run orchestration
//! for the `tackle-e2e` binary.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, DriverArg, FormatArg, ListArgs, LogFormatArg, RunArgs,
};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, ProgressReporter, RunReport};
pub use runner::{execute, resolve_config, RunPlan};

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
