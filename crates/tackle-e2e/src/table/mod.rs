//! List-table helpers: pagination, column extraction and row operations.
//!
//! A [`Table`] is a thin view over a table root selector and a session. It
//! holds no element handles; every operation re-resolves rows from the live
//! view, so a re-render between two calls is never observed as a stale row.

mod columns;
mod pagination;
mod rows;

pub use pagination::{closest_per_page, MAX_PER_PAGE, PER_PAGE_OPTIONS};

use crate::driver::ElementHandle;
use crate::result::TackleResult;
use crate::session::Session;
use crate::views;
use crate::wait::wait_until_stable;
use std::time::Duration;

/// A list table on the current page
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    session: &'a Session,
    root: &'static str,
    compact: bool,
    /// Column a row key is matched in; any cell when unset
    key_column: Option<&'a str>,
}

impl<'a> Table<'a> {
    /// The main list table of a list view
    #[must_use]
    pub const fn main(session: &'a Session) -> Self {
        Self {
            session,
            root: views::APP_TABLE,
            compact: false,
            key_column: None,
        }
    }

    /// A compact table, such as the tag list inside an expanded tag type
    #[must_use]
    pub const fn compact(session: &'a Session) -> Self {
        Self {
            session,
            root: views::COMPACT_TABLE,
            compact: true,
            key_column: None,
        }
    }

    /// Match row keys only in `column`
    #[must_use]
    pub const fn with_key_column(mut self, column: &'a str) -> Self {
        self.key_column = Some(column);
        self
    }

    /// Session the table is bound to
    #[must_use]
    pub const fn session(&self) -> &'a Session {
        self.session
    }

    /// Root selector
    #[must_use]
    pub const fn root(&self) -> &'static str {
        self.root
    }

    /// Column row keys are matched in, if restricted
    #[must_use]
    pub const fn key_column(&self) -> Option<&'a str> {
        self.key_column
    }

    /// Whether cell text is always extracted as lowercase text
    #[must_use]
    pub const fn is_compact(&self) -> bool {
        self.compact
    }

    /// Selector for every body row, detail rows included
    #[must_use]
    pub fn rows_css(&self) -> String {
        format!("{} > tbody > tr", self.root)
    }

    /// Selector for the header cell of `column`
    #[must_use]
    pub fn header_css(&self, column: &str) -> String {
        format!("{} > thead > tr > th[data-label=\"{column}\"]", self.root)
    }

    /// Selector for the cell of `column`, relative to a row
    #[must_use]
    pub fn cell_css(column: &str) -> String {
        format!("td[data-label=\"{column}\"]")
    }

    /// Body rows right now, without detail rows
    pub async fn rows(&self) -> TackleResult<Vec<ElementHandle>> {
        let rows = self.session.query(None, &self.rows_css()).await?;
        Ok(rows
            .into_iter()
            .filter(|row| !row.has_class(views::EXPANDABLE_ROW_CLASS))
            .collect())
    }

    /// Number of body rows right now
    pub async fn row_count(&self) -> TackleResult<usize> {
        Ok(self.rows().await?.len())
    }

    /// Whether the view shows its empty-state marker instead of rows
    pub async fn is_empty(&self) -> TackleResult<bool> {
        let table = self.session.first(&self.session.lookup(self.root)).await?;
        let next = self.session.driver().next_sibling(&table).await?;
        Ok(next.is_some_and(|el| el.has_class(views::EMPTY_STATE_CLASS)))
    }

    /// Wait until the rendered rows stop changing for the settle window
    pub async fn wait_until_settled(&self) -> TackleResult<()> {
        let session = self.session;
        let rows_css = self.rows_css();
        let rows_css = rows_css.as_str();
        wait_until_stable(
            session.wait_options(session.timeouts().lookup_ms),
            Duration::from_millis(session.timeouts().settle_ms),
            "table rows to settle",
            move || async move {
                let rows = session.query(None, rows_css).await?;
                Ok(rows.into_iter().map(|row| row.text).collect::<Vec<_>>())
            },
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;

    #[tokio::test]
    async fn test_empty_state_is_detected() {
        let (_fake, s) = logged_in().await;
        let table = Table::main(&s);
        assert!(table.is_empty().await.unwrap());
        assert_eq!(table.row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_detail_rows_are_not_counted() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::Application, &[("name", "billing")]);
        let table = Table::main(&s);
        assert!(!table.is_empty().await.unwrap());
        table.expand_row_details("billing").await.unwrap();
        assert_eq!(s.query(None, &table.rows_css()).await.unwrap().len(), 2);
        assert_eq!(table.row_count().await.unwrap(), 1);
    }

    #[test]
    fn test_selectors() {
        let s = crate::session::Session::new(
            std::sync::Arc::new(crate::mock::FakeTackle::new()),
            crate::config::TackleConfig::new(),
        );
        let table = Table::compact(&s);
        assert_eq!(table.rows_css(), ".pf-c-table.pf-m-compact > tbody > tr");
        assert_eq!(
            Table::main(&s).header_css("Name"),
            "table[aria-label=\"main-table\"] > thead > tr > th[data-label=\"Name\"]"
        );
        assert_eq!(Table::cell_css("Tag count"), "td[data-label=\"Tag count\"]");
    }
}
