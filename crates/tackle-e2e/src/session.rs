//! Session context and selector/action primitives.
//!
//! A [`Session`] bundles the driver, the run configuration and the cookie
//! preservation policy. Every page object, table helper and lifecycle
//! operation takes `&Session` explicitly; nothing is global.
//!
//! Lookups auto-wait: [`Session::get`] polls until at least one element
//! matches or the locator's timeout elapses. [`Session::query`] never waits.

use crate::config::{TackleConfig, Timeouts};
use crate::driver::{ElementHandle, Key, TackleDriver};
use crate::locator::{Locator, TextMatch};
use crate::result::{TackleError, TackleResult};
use crate::views;
use crate::wait::{poll_until, wait_for, WaitOptions};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Cookie kept across tests unless configured otherwise
pub const DEFAULT_PRESERVED_COOKIE: &str = "SESSION";

/// Landing page heading after login
pub const LANDING_HEADING: &str = "Application inventory";

/// User perspectives offered by the masthead switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    /// Application inventory, controls, reports
    Developer,
    /// Credentials, repositories, proxy
    Administrator,
}

impl Perspective {
    /// Label shown in the switcher
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Developer => "Developer",
            Self::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Explicit per-run context passed to every operation
pub struct Session {
    driver: Arc<dyn TackleDriver>,
    config: TackleConfig,
    preserve: RwLock<Option<Regex>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.config.base_url)
            .field("username", &self.config.username)
            .finish_non_exhaustive()
    }
}

enum LoginScreen {
    Form,
    Rejected,
    ChangePassword,
    Landing,
}

impl Session {
    /// Create a session over a driver
    #[must_use]
    pub fn new(driver: Arc<dyn TackleDriver>, config: TackleConfig) -> Self {
        Self {
            driver,
            config,
            preserve: RwLock::new(None),
        }
    }

    /// The driver
    #[must_use]
    pub fn driver(&self) -> &dyn TackleDriver {
        self.driver.as_ref()
    }

    /// Run configuration
    #[must_use]
    pub const fn config(&self) -> &TackleConfig {
        &self.config
    }

    /// Wait windows
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.config.timeouts
    }

    /// Wait options with the configured poll interval
    #[must_use]
    pub const fn wait_options(&self, timeout_ms: u64) -> WaitOptions {
        WaitOptions::new(timeout_ms, self.config.timeouts.poll_interval_ms)
    }

    /// Locator with the lookup timeout
    #[must_use]
    pub fn lookup(&self, css: &str) -> Locator {
        Locator::new(css).with_timeout_ms(self.config.timeouts.lookup_ms)
    }

    /// Forced locator with the command timeout
    #[must_use]
    pub fn command(&self, css: &str) -> Locator {
        Locator::new(css)
            .with_timeout_ms(self.config.timeouts.command_ms)
            .with_force(true)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Immediate lookup, may be empty
    pub async fn query(
        &self,
        scope: Option<&ElementHandle>,
        css: &str,
    ) -> TackleResult<Vec<ElementHandle>> {
        self.driver.query_all(scope, css).await
    }

    /// Immediate lookup applying the locator's text filter and index
    pub async fn resolve(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> TackleResult<Vec<ElementHandle>> {
        let selector = locator.selector();
        let found: Vec<ElementHandle> = self
            .driver
            .query_all(scope, selector.css_part())
            .await?
            .into_iter()
            .filter(|el| selector.accepts_text(&el.text))
            .collect();
        Ok(match locator.options().index {
            Some(i) => found.into_iter().nth(i).into_iter().collect(),
            None => found,
        })
    }

    /// Wait until at least one element matches
    pub async fn get(&self, locator: &Locator) -> TackleResult<Vec<ElementHandle>> {
        self.get_in(None, locator).await
    }

    /// Wait until at least one descendant of `scope` matches
    pub async fn get_in(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> TackleResult<Vec<ElementHandle>> {
        let timeout_ms = locator.timeout_ms();
        let waited_for = locator.to_string();
        let found = poll_until(self.wait_options(timeout_ms), &waited_for, move || async move {
            let found = self.resolve(scope, locator).await?;
            Ok((!found.is_empty()).then_some(found))
        })
        .await;
        match found {
            Err(TackleError::Timeout { .. }) => Err(TackleError::not_found(waited_for, timeout_ms)),
            other => other,
        }
    }

    /// First element matching the locator, waiting for it
    pub async fn first(&self, locator: &Locator) -> TackleResult<ElementHandle> {
        self.first_in(None, locator).await
    }

    /// First descendant of `scope` matching the locator, waiting for it
    pub async fn first_in(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> TackleResult<ElementHandle> {
        let mut found = self.get_in(scope, locator).await?;
        Ok(found.swap_remove(0))
    }

    /// First element matching `css` whose text matches `text`, waiting for it
    pub async fn get_by_text(
        &self,
        css: &str,
        text: &str,
        mode: TextMatch,
    ) -> TackleResult<ElementHandle> {
        match mode {
            TextMatch::Contains => self.by_text(css, text).await,
            TextMatch::Exact => self.by_exact_text(css, text).await,
        }
    }

    /// First element matching `css` whose text contains `text`
    pub async fn by_text(&self, css: &str, text: &str) -> TackleResult<ElementHandle> {
        self.first(&self.command(css).with_text(text)).await
    }

    /// First element matching `css` whose trimmed text equals `text`
    pub async fn by_exact_text(&self, css: &str, text: &str) -> TackleResult<ElementHandle> {
        self.first(&self.command(css).with_exact_text(text)).await
    }

    /// Whether `css` matches anything right now
    pub async fn is_present(&self, css: &str) -> TackleResult<bool> {
        Ok(!self.query(None, css).await?.is_empty())
    }

    /// Current URL path, relative to the configured base URL
    pub async fn current_path(&self) -> TackleResult<String> {
        let url = self.driver.current_url().await?;
        let base = self.config.base_url.trim_end_matches('/');
        let path = url.strip_prefix(base).unwrap_or(&url);
        Ok(if path.is_empty() { "/".to_string() } else { path.to_string() })
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Navigate to a path under the base URL, or to an absolute URL
    pub async fn visit(&self, path: &str) -> TackleResult<()> {
        let url = self.config.url_for(path);
        debug!(%url, "visit");
        self.driver.navigate(&url).await
    }

    /// Click a resolved element
    pub async fn click_element(&self, element: &ElementHandle, force: bool) -> TackleResult<()> {
        debug!(id = %element.id, tag = %element.tag_name, force, "click");
        self.driver.click(element, force).await
    }

    /// Click the first element matching `css`
    pub async fn click(&self, css: &str) -> TackleResult<()> {
        let element = self.first(&self.command(css)).await?;
        self.click_element(&element, true).await
    }

    /// Click the first element matching `css` that contains `text`
    pub async fn click_by_text(&self, css: &str, text: &str) -> TackleResult<()> {
        let element = self.by_text(css, text).await?;
        self.click_element(&element, true).await
    }

    /// Click the first element matching `css` whose text is exactly `text`
    pub async fn click_by_exact_text(&self, css: &str, text: &str) -> TackleResult<()> {
        let element = self.by_exact_text(css, text).await?;
        self.click_element(&element, true).await
    }

    /// Click `css` inside the first `parent`
    pub async fn click_within(&self, parent: &str, css: &str) -> TackleResult<()> {
        let scope = self.first(&self.lookup(parent)).await?;
        let element = self.first_in(Some(&scope), &self.command(css)).await?;
        self.click_element(&element, true).await
    }

    /// Click `css` inside the open modal
    pub async fn select_within_modal(&self, css: &str) -> TackleResult<()> {
        self.click_within(views::MODAL, css).await
    }

    /// Click, clear and type into an input
    pub async fn input_text(&self, css: &str, text: &str) -> TackleResult<()> {
        let element = self.first(&self.lookup(css)).await?;
        debug!(selector = css, text, "input text");
        self.fill(&element, text).await
    }

    /// Click, clear and type into a resolved input
    pub async fn fill(&self, element: &ElementHandle, text: &str) -> TackleResult<()> {
        self.driver.click(element, true).await?;
        self.driver.clear(element).await?;
        if !text.is_empty() {
            self.driver.type_text(element, text).await?;
        }
        Ok(())
    }

    /// Press a key on a resolved element
    pub async fn press(&self, element: &ElementHandle, key: Key) -> TackleResult<()> {
        debug!(id = %element.id, key = key.name(), "press key");
        self.driver.press_key(element, key).await
    }

    /// Clear an input
    pub async fn clear_input(&self, css: &str) -> TackleResult<()> {
        let element = self.first(&self.lookup(css)).await?;
        self.driver.clear(&element).await
    }

    /// Value of the first input matching `css`
    pub async fn value_of(&self, css: &str) -> TackleResult<String> {
        let element = self.first(&self.lookup(css)).await?;
        Ok(element.value.unwrap_or_default())
    }

    /// Wait for the submit button to be enabled, then submit the form
    pub async fn submit_form(&self) -> TackleResult<()> {
        let submit = self.first(&self.lookup(views::SUBMIT_BUTTON)).await?;
        let driver = self.driver();
        let button = &submit;
        wait_for(
            self.wait_options(self.timeouts().lookup_ms),
            "submit button to be enabled",
            move || async move { Ok(!driver.refresh(button).await?.is_disabled()) },
        )
        .await?;
        let form = self.first(&self.lookup(views::CONTROLS_FORM)).await?;
        debug!("submit form");
        driver.submit(&form).await
    }

    /// Cancel the open form or dialog
    pub async fn cancel_form(&self) -> TackleResult<()> {
        self.click(views::CANCEL_BUTTON).await
    }

    /// Accept the confirm dialog and wait for it to close
    pub async fn confirm(&self) -> TackleResult<()> {
        self.click(views::CONFIRM_BUTTON).await?;
        self.wait_until_idle().await
    }

    /// Wait until no modal is open
    pub async fn wait_until_idle(&self) -> TackleResult<()> {
        wait_for(
            self.wait_options(self.timeouts().lookup_ms),
            "open dialogs to close",
            move || async move { Ok(!self.is_present(views::MODAL).await?) },
        )
        .await
        .map(|_| ())
    }

    /// Open a form select and pick `item` by exact text
    pub async fn select_form_items(&self, field: &str, item: &str) -> TackleResult<()> {
        self.click(field).await?;
        self.click_by_exact_text(views::SELECT_MENU_OPTION, item).await
    }

    /// Wait until an element matching `css` contains `text`
    pub async fn expect_text(&self, css: &str, text: &str) -> TackleResult<()> {
        let locator = self.lookup(css).with_text(text);
        match self.get(&locator).await {
            Ok(_) => Ok(()),
            Err(TackleError::ElementNotFound { .. }) => Err(TackleError::assertion(format!(
                "expected `{css}` to contain {text:?}"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Wait until no element matching `css` contains `text`
    pub async fn expect_no_text(&self, css: &str, text: &str) -> TackleResult<()> {
        let locator = self.lookup(css).with_text(text);
        let waited_for = format!("`{css}` to stop containing {text:?}");
        let locator = &locator;
        wait_for(
            self.wait_options(self.timeouts().short_ms),
            &waited_for,
            move || async move { Ok(self.resolve(None, locator).await?.is_empty()) },
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            TackleError::Timeout { .. } => {
                TackleError::assertion(format!("expected `{css}` not to contain {text:?}"))
            }
            other => other,
        })
    }

    /// Wait for the success alert carrying `message`
    pub async fn check_success_alert(&self, css: &str, message: &str) -> TackleResult<()> {
        self.expect_text(css, message).await
    }

    /// Check a checkbox unless it already is
    pub async fn select_check_box(&self, css: &str) -> TackleResult<()> {
        self.set_check_box(css, true).await
    }

    /// Uncheck a checkbox unless it already is
    pub async fn unselect_check_box(&self, css: &str) -> TackleResult<()> {
        self.set_check_box(css, false).await
    }

    async fn set_check_box(&self, css: &str, checked: bool) -> TackleResult<()> {
        let element = self.first(&self.lookup(css)).await?;
        if element.checked == checked {
            return Ok(());
        }
        self.click_element(&element, true).await?;
        wait_for(
            self.wait_options(self.timeouts().lookup_ms),
            &format!("`{css}` checked={checked}"),
            move || async move { Ok(self.first(&self.lookup(css)).await?.checked == checked) },
        )
        .await
        .map(|_| ())
    }

    /// Assert an input holds `value`; an empty expectation is skipped
    pub async fn validate_value(&self, css: &str, value: &str) -> TackleResult<()> {
        if value.is_empty() {
            info!(selector = css, "value is not defined, skipping check");
            return Ok(());
        }
        let actual = self.value_of(css).await?;
        if actual == value {
            Ok(())
        } else {
            Err(TackleError::assertion(format!(
                "expected `{css}` to have value {value:?}, found {actual:?}"
            )))
        }
    }

    /// Switch the masthead perspective, a no-op when already selected
    pub async fn select_user_perspective(&self, perspective: Perspective) -> TackleResult<()> {
        let toggle = self.first(&self.lookup(views::PERSPECTIVE_TOGGLE)).await?;
        if TextMatch::Exact.matches(&toggle.text, perspective.label()) {
            return Ok(());
        }
        debug!(%perspective, "switch perspective");
        self.click_element(&toggle, true).await?;
        self.click_by_exact_text(views::PERSPECTIVE_ITEM, perspective.label())
            .await?;
        let label = perspective.label();
        wait_for(
            self.wait_options(self.timeouts().lookup_ms),
            &format!("perspective {label}"),
            move || async move {
                let toggle = self.query(None, views::PERSPECTIVE_TOGGLE).await?;
                Ok(toggle
                    .first()
                    .is_some_and(|t| TextMatch::Exact.matches(&t.text, label)))
            },
        )
        .await
        .map(|_| ())
    }

    // =========================================================================
    // LOGIN
    // =========================================================================

    async fn login_screen(&self, submitted: bool) -> TackleResult<LoginScreen> {
        poll_until(
            self.wait_options(self.timeouts().command_ms),
            "login form or landing page",
            move || async move {
                if submitted && self.is_present(views::LOGIN_ERROR).await? {
                    return Ok(Some(LoginScreen::Rejected));
                }
                let headings = self.query(None, "h1").await?;
                if headings.iter().any(|h| h.text.contains("Update password")) {
                    return Ok(Some(LoginScreen::ChangePassword));
                }
                if headings.iter().any(|h| h.text.contains(LANDING_HEADING)) {
                    return Ok(Some(LoginScreen::Landing));
                }
                if !submitted && self.is_present(views::LOGIN_USERNAME).await? {
                    return Ok(Some(LoginScreen::Form));
                }
                Ok(None)
            },
        )
        .await
    }

    /// Log in with the configured user, handling a first-login password change
    pub async fn login(&self) -> TackleResult<()> {
        self.visit("/").await?;
        if matches!(self.login_screen(false).await?, LoginScreen::Landing) {
            debug!("already logged in");
            return Ok(());
        }
        info!(user = %self.config.username, "login");
        self.input_text(views::LOGIN_USERNAME, &self.config.username)
            .await?;
        self.input_text(views::LOGIN_PASSWORD, &self.config.password)
            .await?;
        self.click(views::LOGIN_BUTTON).await?;

        match self.login_screen(true).await? {
            LoginScreen::Landing | LoginScreen::Form => {}
            LoginScreen::ChangePassword => {
                let new_password = self.config.new_password.as_deref().ok_or_else(|| {
                    TackleError::config(
                        "server requested a password change but no new_password is configured",
                    )
                })?;
                self.input_text(views::NEW_PASSWORD, new_password).await?;
                self.input_text(views::CONFIRM_PASSWORD, new_password)
                    .await?;
                self.click(views::CHANGE_PASSWORD_SUBMIT).await?;
            }
            LoginScreen::Rejected => {
                return Err(TackleError::assertion(format!(
                    "login as `{}` was rejected",
                    self.config.username
                )));
            }
        }
        self.expect_text("h1", LANDING_HEADING).await
    }

    /// Log out through the masthead menu
    pub async fn logout(&self) -> TackleResult<()> {
        info!(user = %self.config.username, "logout");
        self.click(views::USER_MENU_TOGGLE).await?;
        self.click_by_text(views::USER_MENU_ITEM, "Logout").await?;
        self.first(&self.lookup(views::LOGIN_USERNAME)).await.map(|_| ())
    }

    // =========================================================================
    // COOKIES
    // =========================================================================

    /// Keep cookies whose name matches `pattern` across tests
    pub fn preserve_cookies(&self, pattern: &str) -> TackleResult<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| TackleError::config(format!("invalid cookie pattern `{pattern}`: {e}")))?;
        *self.preserve.write().unwrap_or_else(PoisonError::into_inner) = Some(regex);
        Ok(())
    }

    /// Clear every cookie except the preserved ones
    pub async fn reset_between_tests(&self) -> TackleResult<()> {
        let pattern = self
            .preserve
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let keep = match pattern {
            Some(re) => self
                .driver
                .cookies()
                .await?
                .into_iter()
                .filter(|c| re.is_match(&c.name))
                .collect(),
            None => Vec::new(),
        };
        debug!(kept = keep.len(), "reset cookies");
        self.driver.clear_cookies().await?;
        if !keep.is_empty() {
            self.driver.set_cookies(&keep).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::FakeTackle;

    fn session(fake: &Arc<FakeTackle>) -> Session {
        let driver: Arc<dyn TackleDriver> = fake.clone();
        Session::new(driver, fake.config())
    }

    mod lookup_tests {
        use super::*;

        #[tokio::test]
        async fn test_get_times_out_with_not_found() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            let err = s.get(&s.lookup("#does-not-exist")).await.unwrap_err();
            assert!(matches!(err, TackleError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_current_path_strips_base() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            s.visit("/applications").await.unwrap();
            assert_eq!(s.current_path().await.unwrap(), "/applications");
        }
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_login_and_logout() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            s.login().await.unwrap();
            s.expect_text("h1", LANDING_HEADING).await.unwrap();
            s.logout().await.unwrap();
            assert!(s.is_present(views::LOGIN_USERNAME).await.unwrap());
        }

        #[tokio::test]
        async fn test_wrong_password_is_reported() {
            let fake = Arc::new(FakeTackle::new());
            let driver: Arc<dyn TackleDriver> = fake.clone();
            let s = Session::new(driver, fake.config().with_login("admin", "nope"));
            let err = s.login().await.unwrap_err();
            assert!(matches!(err, TackleError::AssertionFailed { .. }));
        }

        #[tokio::test]
        async fn test_first_login_password_change() {
            let fake = Arc::new(FakeTackle::new().require_password_change());
            let driver: Arc<dyn TackleDriver> = fake.clone();
            let s = Session::new(driver, fake.config().with_new_password("Passw0rd!"));
            s.login().await.unwrap();
            s.logout().await.unwrap();

            let driver: Arc<dyn TackleDriver> = fake.clone();
            let again = Session::new(driver, fake.config().with_login("admin", "Passw0rd!"));
            again.login().await.unwrap();
        }

        #[tokio::test]
        async fn test_password_change_without_new_password_fails() {
            let fake = Arc::new(FakeTackle::new().require_password_change());
            let s = session(&fake);
            let err = s.login().await.unwrap_err();
            assert!(matches!(err, TackleError::Config { .. }));
        }
    }

    mod cookie_tests {
        use super::*;

        #[tokio::test]
        async fn test_preserved_session_survives_reset() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            s.login().await.unwrap();
            s.preserve_cookies(DEFAULT_PRESERVED_COOKIE).unwrap();
            s.reset_between_tests().await.unwrap();
            s.login().await.unwrap();
            assert!(!s.is_present(views::LOGIN_USERNAME).await.unwrap());
        }

        #[tokio::test]
        async fn test_reset_without_preservation_logs_out() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            s.login().await.unwrap();
            s.reset_between_tests().await.unwrap();
            s.visit("/").await.unwrap();
            assert!(s.is_present(views::LOGIN_USERNAME).await.unwrap());
        }

        #[test]
        fn test_invalid_pattern() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            assert!(s.preserve_cookies("(").is_err());
        }
    }

    mod perspective_tests {
        use super::*;

        #[tokio::test]
        async fn test_switch_perspective() {
            let fake = Arc::new(FakeTackle::new());
            let s = session(&fake);
            s.login().await.unwrap();
            s.select_user_perspective(Perspective::Administrator)
                .await
                .unwrap();
            s.click_by_text(views::NAV_MENU, "Proxy").await.unwrap();
            s.expect_text("h1", "Proxy configuration").await.unwrap();
            s.select_user_perspective(Perspective::Administrator)
                .await
                .unwrap();
        }
    }
}
