//! Result and error types for tackle-e2e.

use thiserror::Error;

/// Result type for tackle-e2e operations
pub type TackleResult<T> = Result<T, TackleError>;

/// Errors that can occur while driving the Tackle UI
#[derive(Debug, Error)]
pub enum TackleError {
    /// No element matched within the wait window
    #[error("No element matched `{selector}` within {timeout_ms}ms")]
    ElementNotFound {
        /// Selector that was looked up
        selector: String,
        /// Wait window in milliseconds
        timeout_ms: u64,
    },

    /// A polled condition never became true
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Human readable condition
        waited_for: String,
    },

    /// Element handle no longer resolves in the live view
    #[error("Element `{id}` is no longer attached to the page")]
    StaleElement {
        /// Driver key of the element
        id: String,
    },

    /// Element exists but cannot receive the action
    #[error("Element `{selector}` is not actionable: {reason}")]
    NotActionable {
        /// Selector or key of the element
        selector: String,
        /// Why the action was refused
        reason: String,
    },

    /// Assertion failed (row count, order, filtered set)
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Driver-level failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl TackleError {
    /// Create an assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a driver failure
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fixture error
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Create a not-found error for a selector
    pub fn not_found(selector: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
            timeout_ms,
        }
    }

    /// Whether a retry may observe a different outcome
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StaleElement { .. } | Self::NotActionable { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_selector() {
        let err = TackleError::not_found("td[data-label=\"Name\"]", 5000);
        let text = err.to_string();
        assert!(text.contains("td[data-label=\"Name\"]"));
        assert!(text.contains("5000ms"));
    }

    #[test]
    fn test_timeout_message() {
        let err = TackleError::Timeout {
            ms: 250,
            waited_for: "row `alpha` to disappear".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for row `alpha` to disappear"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(TackleError::StaleElement { id: "n1".into() }.is_transient());
        assert!(!TackleError::assertion("x").is_transient());
        assert!(!TackleError::not_found("a", 1).is_transient());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TackleError = io.into();
        assert!(matches!(err, TackleError::Io(_)));
    }

    #[test]
    fn test_yaml_conversion() {
        let parsed: Result<u32, serde_yaml_ng::Error> = serde_yaml_ng::from_str("[not, a, number]");
        let err: TackleError = parsed.unwrap_err().into();
        assert!(err.to_string().starts_with("YAML error"));
    }
}
