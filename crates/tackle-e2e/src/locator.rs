//! Locator abstraction for element selection.
//!
//! A locator is an opaque CSS selector plus an optional text filter. The
//! utility layer never interprets the CSS itself; it hands it to the driver
//! and filters the returned snapshots by text.

use std::fmt;
use std::time::Duration;

/// Default timeout for auto-waiting (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// How a text filter compares against an element's text content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Text content contains the needle
    #[default]
    Contains,
    /// Trimmed text content equals the needle
    Exact,
}

impl TextMatch {
    /// Apply the comparison
    #[must_use]
    pub fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::Contains => haystack.contains(needle),
            Self::Exact => haystack.trim() == needle.trim(),
        }
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., `button[aria-label="delete"]`)
    Css(String),
    /// CSS selector narrowed to elements whose text matches
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
        /// Comparison mode
        mode: TextMatch,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// The CSS part handed to the driver
    #[must_use]
    pub fn css_part(&self) -> &str {
        match self {
            Self::Css(css) | Self::CssWithText { css, .. } => css,
        }
    }

    /// Whether an element with `text` content passes the text filter
    #[must_use]
    pub fn accepts_text(&self, text: &str) -> bool {
        match self {
            Self::Css(_) => true,
            Self::CssWithText {
                text: needle, mode, ..
            } => mode.matches(text, needle),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{css}"),
            Self::CssWithText {
                css,
                text,
                mode: TextMatch::Contains,
            } => write!(f, "{css} containing {text:?}"),
            Self::CssWithText {
                css,
                text,
                mode: TextMatch::Exact,
            } => write!(f, "{css} with text {text:?}"),
        }
    }
}

/// Options for locator behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Wait window for at least one match
    pub timeout: Duration,
    /// Skip actionability checks when clicking
    pub force: bool,
    /// Pick the nth match instead of the first
    pub index: Option<usize>,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            force: false,
            index: None,
        }
    }
}

/// A selector with its wait and click options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Selector::Css(selector.into()),
            options: LocatorOptions::default(),
        }
    }

    /// Create a locator from a Selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Narrow to elements containing `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_text_mode(text, TextMatch::Contains)
    }

    /// Narrow to elements whose trimmed text equals `text`
    #[must_use]
    pub fn with_exact_text(self, text: impl Into<String>) -> Self {
        self.with_text_mode(text, TextMatch::Exact)
    }

    fn with_text_mode(self, text: impl Into<String>, mode: TextMatch) -> Self {
        let css = self.selector.css_part().to_string();
        Self {
            selector: Selector::CssWithText {
                css,
                text: text.into(),
                mode,
            },
            options: self.options,
        }
    }

    /// Set the wait window
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the wait window in milliseconds
    #[must_use]
    pub const fn with_timeout_ms(self, ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(ms))
    }

    /// Click without actionability checks
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.options.force = force;
        self
    }

    /// Pick the nth match
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.options.index = Some(index);
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Timeout in whole milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.options.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.options.index {
            Some(i) => write!(f, "{} (eq {i})", self.selector),
            None => write!(f, "{}", self.selector),
        }
    }
}

impl From<&str> for Locator {
    fn from(css: &str) -> Self {
        Self::new(css)
    }
}

impl From<String> for Locator {
    fn from(css: String) -> Self {
        Self::new(css)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_accepts_any_text() {
            assert!(Selector::css("td").accepts_text("anything"));
        }

        #[test]
        fn test_contains_vs_exact() {
            let contains = Locator::new("a").with_text("Tag");
            let exact = Locator::new("a").with_exact_text("Tag");
            assert!(contains.selector().accepts_text("Tag type"));
            assert!(!exact.selector().accepts_text("Tag type"));
            assert!(exact.selector().accepts_text("  Tag \n"));
        }

        #[test]
        fn test_with_text_keeps_css() {
            let loc = Locator::new("button").with_text("Delete");
            assert_eq!(loc.selector().css_part(), "button");
        }

        #[test]
        fn test_display() {
            assert_eq!(
                Locator::new("button").with_text("Delete").nth(1).to_string(),
                "button containing \"Delete\" (eq 1)"
            );
        }
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let loc = Locator::new("div");
            assert_eq!(loc.timeout_ms(), DEFAULT_TIMEOUT_MS);
            assert!(!loc.options().force);
            assert_eq!(loc.options().index, None);
        }

        #[test]
        fn test_builders_survive_text_filter() {
            let loc = Locator::new("span")
                .with_timeout_ms(250)
                .with_force(true)
                .with_text("x");
            assert_eq!(loc.timeout_ms(), 250);
            assert!(loc.options().force);
        }
    }
}
