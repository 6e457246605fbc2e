//! TackleDriver - Abstract Browser Automation Trait
//!
//! Every browser interaction goes through this trait so the utility layer can
//! run against Chromium over CDP or against the in-process fake application.
//!
//! Element handles are snapshots keyed by a driver-assigned id. A driver must
//! re-resolve the id on every call and report [`TackleError::StaleElement`]
//! once the element has left the page.
//!
//! [`TackleError::StaleElement`]: crate::result::TackleError::StaleElement

use crate::result::TackleResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Snapshot of one element, taken when it was queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver key for the element
    pub id: String,
    /// Element tag name, lowercase
    pub tag_name: String,
    /// Element text content
    #[serde(default)]
    pub text: String,
    /// Attributes at snapshot time
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Class list
    #[serde(default)]
    pub classes: Vec<String>,
    /// `disabled` property
    #[serde(default)]
    pub disabled: bool,
    /// `checked` property
    #[serde(default)]
    pub checked: bool,
    /// `value` property for form controls
    #[serde(default)]
    pub value: Option<String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text: String::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            disabled: false,
            checked: false,
            value: None,
        }
    }

    /// Attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the class list contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Disabled through the property, `aria-disabled` or the PatternFly modifier
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
            || self.attr("aria-disabled") == Some("true")
            || self.has_class("pf-m-disabled")
    }

    /// Trimmed text content
    #[must_use]
    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Browser cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Cookie domain, when known
    #[serde(default)]
    pub domain: Option<String>,
}

impl Cookie {
    /// Create a cookie
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
        }
    }
}

/// Keys that can be pressed on a focused element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
}

impl Key {
    /// CDP key name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Tab => "Tab",
        }
    }
}

/// Browser configuration for driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Disable the Chromium sandbox (containers)
    pub no_sandbox: bool,
    /// Executable path override
    pub executable_path: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            navigation_timeout: Duration::from_secs(60),
            no_sandbox: false,
            executable_path: None,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Disable the sandbox
    #[must_use]
    pub const fn no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    /// Use a specific browser binary
    #[must_use]
    pub fn executable(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }
}

/// Abstract browser driver trait
///
/// All methods take `&self`; implementations synchronize internally. Calls
/// are issued strictly one at a time by the utility layer.
#[async_trait]
pub trait TackleDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&self, url: &str) -> TackleResult<()>;

    /// Current page URL
    async fn current_url(&self) -> TackleResult<String>;

    /// All elements matching `selector`, in document order; descendants of
    /// `scope` only when given. Never waits.
    async fn query_all(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> TackleResult<Vec<ElementHandle>>;

    /// Nearest ancestor-or-self matching `selector`
    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> TackleResult<Option<ElementHandle>>;

    /// Next element sibling
    async fn next_sibling(&self, element: &ElementHandle) -> TackleResult<Option<ElementHandle>>;

    /// Fresh snapshot of `element`
    async fn refresh(&self, element: &ElementHandle) -> TackleResult<ElementHandle>;

    /// Click an element; `force` skips visibility checks
    async fn click(&self, element: &ElementHandle, force: bool) -> TackleResult<()>;

    /// Clear a text input
    async fn clear(&self, element: &ElementHandle) -> TackleResult<()>;

    /// Type text into an input
    async fn type_text(&self, element: &ElementHandle, text: &str) -> TackleResult<()>;

    /// Press a key on a focused element
    async fn press_key(&self, element: &ElementHandle, key: Key) -> TackleResult<()>;

    /// Submit a form element
    async fn submit(&self, form: &ElementHandle) -> TackleResult<()>;

    /// Cookies visible to the current page
    async fn cookies(&self) -> TackleResult<Vec<Cookie>>;

    /// Add cookies
    async fn set_cookies(&self, cookies: &[Cookie]) -> TackleResult<()>;

    /// Remove every cookie
    async fn clear_cookies(&self) -> TackleResult<()>;

    /// Close the browser
    async fn close(&self) -> TackleResult<()>;
}
