//! Pagination controls of a list view.
//!
//! The header pagination lives in [`views::DIV_HEADER`]; the bottom copy only
//! carries the navigation buttons. Every control is looked up inside the
//! header container so the two copies never get mixed up.

use super::Table;
use crate::driver::{ElementHandle, Key};
use crate::result::{TackleError, TackleResult};
use crate::views;
use crate::wait::wait_for;
use tracing::{debug, info};

/// Page sizes offered by the per-page menu
pub const PER_PAGE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Largest page size, used before reading whole columns
pub const MAX_PER_PAGE: usize = 100;

/// The offered page size closest to `n`; ties go to the smaller size
#[must_use]
pub fn closest_per_page(n: usize) -> usize {
    PER_PAGE_OPTIONS
        .iter()
        .copied()
        .min_by_key(|option| option.abs_diff(n))
        .unwrap_or(MAX_PER_PAGE)
}

impl Table<'_> {
    async fn header_control(&self, css: &str) -> TackleResult<ElementHandle> {
        let session = self.session;
        let header = session.first(&session.lookup(views::DIV_HEADER)).await?;
        session.first_in(Some(&header), &session.lookup(css)).await
    }

    /// Pick a page size and wait until at most that many rows render
    ///
    /// Sizes not offered by the menu snap to the closest offered one. When
    /// the per-page toggle is disabled (everything fits on one page) nothing
    /// is clicked.
    pub async fn select_items_per_page(&self, n: usize) -> TackleResult<()> {
        let session = self.session;
        let size = closest_per_page(n);
        if size != n {
            debug!(requested = n, size, "page size snapped to offered option");
        }
        let toggle = self.header_control(views::ITEMS_PER_PAGE_TOGGLE).await?;
        if toggle.is_disabled() {
            debug!(size, "per-page toggle disabled, all rows already shown");
            return Ok(());
        }
        session.click_element(&toggle, true).await?;
        let menu = session
            .first(&session.lookup(views::ITEMS_PER_PAGE_OPTIONS))
            .await?;
        let option = session
            .first_in(Some(&menu), &session.command(&views::per_page_option(size)))
            .await?;
        session.click_element(&option, true).await?;
        wait_for(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("at most {size} rows per page"),
            move || async move {
                Ok(!session.is_present(views::ITEMS_PER_PAGE_OPTIONS).await?
                    && self.row_count().await? <= size)
            },
        )
        .await?;
        self.wait_until_settled().await
    }

    /// Type a page number into the page input and confirm it
    ///
    /// A no-op when the view has a single page. Numbers past the last page
    /// land on the last page.
    pub async fn go_to_page(&self, page: usize) -> TackleResult<()> {
        let session = self.session;
        let first = self.header_control(views::FIRST_PAGE_BUTTON).await?;
        let last = self.header_control(views::LAST_PAGE_BUTTON).await?;
        if first.is_disabled() && last.is_disabled() {
            debug!(page, "single page, nothing to navigate");
            return Ok(());
        }
        let input = self.header_control(views::PAGE_NUM_INPUT).await?;
        session.fill(&input, &page.to_string()).await?;
        session.press(&input, Key::Enter).await?;
        info!(page, "go to page");
        self.wait_until_settled().await
    }

    /// Jump to the last page, a no-op when already there
    pub async fn go_to_last_page(&self) -> TackleResult<()> {
        let session = self.session;
        let last = self.header_control(views::LAST_PAGE_BUTTON).await?;
        if last.is_disabled() {
            return Ok(());
        }
        session.click_element(&last, true).await?;
        self.expect_control(views::LAST_PAGE_BUTTON, false).await?;
        self.wait_until_settled().await
    }

    /// Current page as shown in the header page input
    pub async fn current_page(&self) -> TackleResult<usize> {
        let input = self.header_control(views::PAGE_NUM_INPUT).await?;
        let value = input.value.unwrap_or_default();
        value.trim().parse().map_err(|_| {
            TackleError::assertion(format!("page input holds {value:?}, not a page number"))
        })
    }

    /// Walk the navigation controls on a view with more than one page
    ///
    /// On the first page next and last must be enabled with previous and
    /// first disabled; after one step forward previous and first must be
    /// enabled; going back to the first page disables previous again.
    pub async fn validate_pagination(&self) -> TackleResult<()> {
        self.expect_control(views::NEXT_PAGE_BUTTON, true).await?;
        self.expect_control(views::LAST_PAGE_BUTTON, true).await?;
        self.expect_control(views::PREV_PAGE_BUTTON, false).await?;
        self.expect_control(views::FIRST_PAGE_BUTTON, false).await?;

        let next = self.header_control(views::NEXT_PAGE_BUTTON).await?;
        self.session.click_element(&next, false).await?;
        self.expect_control(views::PREV_PAGE_BUTTON, true).await?;
        self.expect_control(views::FIRST_PAGE_BUTTON, true).await?;

        let first = self.header_control(views::FIRST_PAGE_BUTTON).await?;
        self.session.click_element(&first, false).await?;
        self.expect_control(views::PREV_PAGE_BUTTON, false).await?;
        self.wait_until_settled().await
    }

    /// Wait until every copy of a navigation control has the given state
    async fn expect_control(&self, css: &str, enabled: bool) -> TackleResult<()> {
        let session = self.session;
        let state = if enabled { "enabled" } else { "disabled" };
        wait_for(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("`{css}` to be {state}"),
            move || async move {
                let controls = session.query(None, css).await?;
                Ok(!controls.is_empty() && controls.iter().all(|c| c.is_disabled() != enabled))
            },
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            TackleError::Timeout { .. } => {
                TackleError::assertion(format!("expected `{css}` to be {state}"))
            }
            other => other,
        })
    }
}
