//! Subscriber setup for the `tracing` events the library emits.
//!
//! Logs go to stderr so that stdout stays parseable with `--format json`.

use crate::config::{LogFormat, Verbosity};
use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Filter directives for `verbosity` when `RUST_LOG` is unset
#[must_use]
pub fn default_directives(verbosity: Verbosity) -> String {
    match verbosity {
        Verbosity::Quiet => "error".to_string(),
        level => format!("warn,tackle_e2e={}", level.log_level()),
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init(verbosity: Verbosity, format: LogFormat) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Text => builder.with_target(verbosity.is_verbose()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| CliError::config(format!("logging: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(Verbosity::Quiet), "error");
        assert_eq!(default_directives(Verbosity::Normal), "warn,tackle_e2e=warn");
        assert_eq!(default_directives(Verbosity::Verbose), "warn,tackle_e2e=info");
        assert_eq!(default_directives(Verbosity::Debug), "warn,tackle_e2e=debug");
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Debug] {
            assert!(EnvFilter::try_new(default_directives(verbosity)).is_ok());
        }
    }
}
