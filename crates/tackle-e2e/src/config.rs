//! Run configuration.
//!
//! Layered as defaults, then an optional YAML file, then `TACKLE_*`
//! environment variables. CLI flags are applied last by the binary through
//! the `with_*` setters.

use crate::result::{TackleError, TackleResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default Tackle UI address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default command timeout (120 seconds), used for clicks and text lookups
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 120_000;

/// Default element lookup timeout (10 seconds)
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 10_000;

/// Default short timeout (5 seconds), used for negative assertions
pub const DEFAULT_SHORT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default settle window: a table is settled once its rows stop changing for this long
pub const DEFAULT_SETTLE_MS: u64 = 500;

/// Environment variables read by [`TackleConfig::apply_env`]
pub const ENV_URL: &str = "TACKLE_URL";
/// Login user
pub const ENV_USER: &str = "TACKLE_USER";
/// Login password
pub const ENV_PASS: &str = "TACKLE_PASS";
/// Password set on first login
pub const ENV_NEW_PASS: &str = "TACKLE_NEW_PASS";
/// Space or comma separated tags to run
pub const ENV_GREP_TAGS: &str = "TACKLE_GREP_TAGS";

/// Wait windows for every kind of bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Clicks and text lookups
    pub command_ms: u64,
    /// Plain element lookups
    pub lookup_ms: u64,
    /// Negative assertions and quick checks
    pub short_ms: u64,
    /// Delay between polls
    pub poll_interval_ms: u64,
    /// Row-set stability window
    pub settle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            command_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            lookup_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            short_ms: DEFAULT_SHORT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl Timeouts {
    /// Uniform short windows for in-process runs against the fake application
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            command_ms: 1_000,
            lookup_ms: 1_000,
            short_ms: 300,
            poll_interval_ms: 5,
            settle_ms: 0,
        }
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Configuration for a run against one Tackle instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TackleConfig {
    /// Base URL of the Tackle UI
    pub base_url: String,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
    /// Password to set when the server asks for a change on first login
    pub new_password: Option<String>,
    /// Only suites carrying one of these tags run; `None` runs everything
    pub grep_tags: Option<Vec<String>>,
    /// Wait windows
    pub timeouts: Timeouts,
}

impl Default for TackleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            new_password: None,
            grep_tags: None,
            timeouts: Timeouts::default(),
        }
    }
}

impl TackleConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> TackleResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Parse a YAML config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> TackleResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse YAML text
    pub fn from_yaml(text: &str) -> TackleResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TACKLE_*` overrides read through `lookup`
    pub fn apply_env<F>(mut self, lookup: F) -> TackleResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.base_url = url;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.username = user;
        }
        if let Some(pass) = lookup(ENV_PASS) {
            self.password = pass;
        }
        if let Some(pass) = lookup(ENV_NEW_PASS) {
            self.new_password = Some(pass);
        }
        if let Some(tags) = lookup(ENV_GREP_TAGS) {
            self.grep_tags = parse_tags(&tags);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> TackleResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TackleError::config(format!(
                "base_url must be an http(s) URL, got `{}`",
                self.base_url
            )));
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(TackleError::config("timeouts.poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set login credentials
    #[must_use]
    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the first-login replacement password
    #[must_use]
    pub fn with_new_password(mut self, password: impl Into<String>) -> Self {
        self.new_password = Some(password.into());
        self
    }

    /// Restrict runs to the given tags
    #[must_use]
    pub fn with_grep_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.grep_tags = if tags.is_empty() { None } else { Some(tags) };
        self
    }

    /// Replace all wait windows
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Join a path onto the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// True when tag filtering is active and `tag` is not selected
    #[must_use]
    pub fn has_to_be_skipped(&self, tag: &str) -> bool {
        self.grep_tags
            .as_ref()
            .is_some_and(|tags| !tags.iter().any(|t| t == tag))
    }

    /// Copy with the password fields masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.password = "********".to_string();
        if copy.new_password.is_some() {
            copy.new_password = Some("********".to_string());
        }
        copy
    }
}

fn parse_tags(raw: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}
