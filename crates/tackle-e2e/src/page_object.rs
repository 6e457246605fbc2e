//! List-view navigation.
//!
//! Every entity page object opens its list through a [`ListView`]: switch to
//! the owning perspective, follow the sidebar link, pick the tab when the
//! view lives under one, and wait for the heading. Opening is skipped when
//! the browser already shows the view.

use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::table::Table;
use crate::views;
use crate::wait::wait_for;
use tracing::debug;

/// Matches URL paths against a view path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlMatcher<'a> {
    path: &'a str,
}

impl<'a> UrlMatcher<'a> {
    /// Matcher for `path`
    #[must_use]
    pub const fn new(path: &'a str) -> Self {
        Self { path }
    }

    /// Whether `current` is the view path or a sub path of it
    ///
    /// Query strings and fragments are ignored.
    #[must_use]
    pub fn matches(&self, current: &str) -> bool {
        let current = current
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let path = self.path.trim_end_matches('/');
        current == path
            || current
                .strip_prefix(path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// How to reach a list view from anywhere in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListView {
    /// Page heading shown once the view is open
    pub title: &'static str,
    /// Perspective that owns the sidebar link
    pub perspective: Perspective,
    /// Sidebar link text
    pub nav: &'static str,
    /// Tab label, for views grouped under tabs
    pub tab: Option<&'static str>,
    /// Path the view is served under
    pub path: &'static str,
}

impl ListView {
    /// View reached by a sidebar link
    #[must_use]
    pub const fn new(
        title: &'static str,
        perspective: Perspective,
        nav: &'static str,
        path: &'static str,
    ) -> Self {
        Self {
            title,
            perspective,
            nav,
            tab: None,
            path,
        }
    }

    /// The view sits under a tab of the sidebar page
    #[must_use]
    pub const fn with_tab(mut self, tab: &'static str) -> Self {
        self.tab = Some(tab);
        self
    }

    /// Matcher for the view path
    #[must_use]
    pub const fn matcher(&self) -> UrlMatcher<'static> {
        UrlMatcher::new(self.path)
    }

    /// Whether the browser shows this view right now
    pub async fn is_open(&self, session: &Session) -> TackleResult<bool> {
        Ok(self.matcher().matches(&session.current_path().await?))
    }

    /// Navigate to the view unless it is already open
    pub async fn open(&self, session: &Session) -> TackleResult<()> {
        if self.is_open(session).await? {
            debug!(path = self.path, "list view already open");
            return Ok(());
        }
        debug!(path = self.path, nav = self.nav, tab = ?self.tab, "open list view");
        session.select_user_perspective(self.perspective).await?;
        session.click_by_text(views::NAV_MENU, self.nav).await?;
        if let Some(tab) = self.tab {
            session.click_by_exact_text(views::NAV_TAB, tab).await?;
        }
        let view = *self;
        wait_for(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("location {}", self.path),
            move || async move { view.is_open(session).await },
        )
        .await?;
        session.expect_text("h1", self.title).await
    }

    /// Open the view and pick a page size
    pub async fn open_with_items_per_page(&self, session: &Session, n: usize) -> TackleResult<()> {
        self.open(session).await?;
        Table::main(session).select_items_per_page(n).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;

    const JOB_FUNCTIONS: ListView = ListView::new(
        "Controls",
        Perspective::Developer,
        "Controls",
        "/controls/job-functions",
    )
    .with_tab("Job functions");

    const CREDENTIALS: ListView = ListView::new(
        "Credentials",
        Perspective::Administrator,
        "Credentials",
        "/identities",
    );

    mod matcher_tests {
        use super::*;

        #[test]
        fn test_exact_and_sub_paths() {
            let m = UrlMatcher::new("/controls/tags");
            assert!(m.matches("/controls/tags"));
            assert!(m.matches("/controls/tags/"));
            assert!(m.matches("/controls/tags/12"));
            assert!(m.matches("/controls/tags?page=2"));
            assert!(!m.matches("/controls/tags-archive"));
            assert!(!m.matches("/controls"));
        }
    }

    mod open_tests {
        use super::*;

        #[tokio::test]
        async fn test_open_through_tab() {
            let (_fake, s) = logged_in().await;
            JOB_FUNCTIONS.open(&s).await.unwrap();
            assert_eq!(s.current_path().await.unwrap(), "/controls/job-functions");
        }

        #[tokio::test]
        async fn test_open_switches_perspective() {
            let (_fake, s) = logged_in().await;
            CREDENTIALS.open(&s).await.unwrap();
            assert_eq!(s.current_path().await.unwrap(), "/identities");
            s.expect_text(views::PERSPECTIVE_TOGGLE, "Administrator")
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_open_is_skipped_when_already_there() {
            let (fake, s) = logged_in().await;
            JOB_FUNCTIONS.open(&s).await.unwrap();
            let navigations = fake.history().len();
            JOB_FUNCTIONS.open(&s).await.unwrap();
            assert_eq!(fake.history().len(), navigations);
        }
    }
}
