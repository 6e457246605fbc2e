//! Row lookup and row actions.
//!
//! Rows are addressed by a business key: the trimmed text of one of their
//! cells. A key is resolved to the live row right before each action.

use super::Table;
use crate::driver::ElementHandle;
use crate::result::{TackleError, TackleResult};
use crate::views;
use crate::wait::{poll_until, wait_for};
use tracing::{debug, info};

impl Table<'_> {
    /// The row with a cell whose trimmed text is exactly `key`, if rendered
    ///
    /// With a key column set, only the cell of that column is compared.
    pub async fn find_row(&self, key: &str) -> TackleResult<Option<ElementHandle>> {
        let session = self.session;
        let cell_css = self.key_column.map_or_else(|| views::TD.to_string(), Self::cell_css);
        for row in self.rows().await? {
            let cells = session.query(Some(&row), &cell_css).await?;
            if cells.iter().any(|cell| cell.text_trimmed() == key) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// The row keyed by `key`, waiting for it to render
    pub async fn row(&self, key: &str) -> TackleResult<ElementHandle> {
        let session = self.session;
        let timeout_ms = session.timeouts().lookup_ms;
        poll_until(
            session.wait_options(timeout_ms),
            &format!("row `{key}`"),
            move || async move { self.find_row(key).await },
        )
        .await
        .map_err(|e| match e {
            TackleError::Timeout { .. } => {
                TackleError::not_found(format!("{} keyed {key:?}", self.rows_css()), timeout_ms)
            }
            other => other,
        })
    }

    /// The detail row rendered under the row keyed by `key`, if expanded
    pub async fn detail_row(&self, key: &str) -> TackleResult<Option<ElementHandle>> {
        let row = self.row(key).await?;
        let next = self.session.driver().next_sibling(&row).await?;
        Ok(next.filter(|el| el.has_class(views::EXPANDABLE_ROW_CLASS)))
    }

    /// Assert some row of the table contains `value`
    ///
    /// Fails on an empty table.
    pub async fn exists(&self, value: &str) -> TackleResult<()> {
        self.session.expect_text(&self.rows_css(), value).await
    }

    /// Assert no row of the table contains `value`
    pub async fn not_exists(&self, value: &str) -> TackleResult<()> {
        self.session.expect_no_text(&self.rows_css(), value).await
    }

    /// Wait for the row keyed by `key` to disappear
    pub async fn wait_row_gone(&self, key: &str) -> TackleResult<()> {
        let session = self.session;
        wait_for(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("row `{key}` to disappear"),
            move || async move { Ok(self.find_row(key).await?.is_none()) },
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            TackleError::Timeout { .. } => {
                TackleError::assertion(format!("row `{key}` is still present"))
            }
            other => other,
        })
    }

    /// Click the button labelled `action` in the row keyed by `key`
    pub async fn perform_row_action(&self, key: &str, action: &str) -> TackleResult<()> {
        let session = self.session;
        let row = self.row(key).await?;
        let button = session
            .first_in(Some(&row), &session.command(views::BUTTON).with_text(action))
            .await?;
        debug!(key, action, "row action");
        session.click_element(&button, true).await
    }

    /// Click the icon button matching `css` in the row keyed by `key`
    pub async fn perform_row_action_by_icon(&self, key: &str, css: &str) -> TackleResult<()> {
        let session = self.session;
        let row = self.row(key).await?;
        let button = session.first_in(Some(&row), &session.command(css)).await?;
        debug!(key, icon = css, "row icon action");
        session.click_element(&button, true).await
    }

    /// Open the kebab menu of the row keyed by `key` and pick `action`
    pub async fn apply_action(&self, key: &str, action: &str) -> TackleResult<()> {
        let session = self.session;
        let row = self.row(key).await?;
        let kebab = session
            .first_in(Some(&row), &session.command(views::ACTION_BUTTON))
            .await?;
        session.click_element(&kebab, true).await?;
        let row = self.row(key).await?;
        let item = session
            .first_in(
                Some(&row),
                &session.command(views::KEBAB_MENU_ITEM).with_exact_text(action),
            )
            .await?;
        info!(key, action, "kebab action");
        session.click_element(&item, true).await
    }

    /// Expand the detail row of `key`, a no-op when already expanded
    pub async fn expand_row_details(&self, key: &str) -> TackleResult<()> {
        self.set_row_expanded(key, true).await
    }

    /// Collapse the detail row of `key`, a no-op when already collapsed
    pub async fn close_row_details(&self, key: &str) -> TackleResult<()> {
        self.set_row_expanded(key, false).await
    }

    async fn set_row_expanded(&self, key: &str, expanded: bool) -> TackleResult<()> {
        let session = self.session;
        let row = self.row(key).await?;
        let toggle = session
            .first_in(Some(&row), &session.lookup(views::EXPAND_ROW))
            .await?;
        if is_expanded(&toggle) == expanded {
            return Ok(());
        }
        session.click_element(&toggle, true).await?;
        let toggle = &toggle;
        wait_for(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("row `{key}` expanded={expanded}"),
            move || async move {
                let refreshed = session.driver().refresh(toggle).await?;
                Ok(is_expanded(&refreshed) == expanded)
            },
        )
        .await
        .map(|_| ())
    }

    /// Assert an element matching `css` inside the row keyed by `key`, or
    /// its detail row, contains `value`
    pub async fn exists_within_row(&self, key: &str, css: &str, value: &str) -> TackleResult<()> {
        let session = self.session;
        poll_until(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("`{css}` in row `{key}` to contain {value:?}"),
            move || async move {
                Ok(self
                    .row_contains(key, css, value)
                    .await?
                    .then_some(()))
            },
        )
        .await
        .map_err(|e| match e {
            TackleError::Timeout { .. } => TackleError::assertion(format!(
                "expected `{css}` in row `{key}` to contain {value:?}"
            )),
            other => other,
        })
    }

    /// Assert nothing matching `css` inside the row keyed by `key`, or its
    /// detail row, contains `value`
    pub async fn not_exists_within_row(
        &self,
        key: &str,
        css: &str,
        value: &str,
    ) -> TackleResult<()> {
        let session = self.session;
        wait_for(
            session.wait_options(session.timeouts().short_ms),
            &format!("`{css}` in row `{key}` to stop containing {value:?}"),
            move || async move { Ok(!self.row_contains(key, css, value).await?) },
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            TackleError::Timeout { .. } => TackleError::assertion(format!(
                "expected `{css}` in row `{key}` not to contain {value:?}"
            )),
            other => other,
        })
    }

    async fn row_contains(&self, key: &str, css: &str, value: &str) -> TackleResult<bool> {
        let session = self.session;
        let Some(row) = self.find_row(key).await? else {
            return Err(TackleError::StaleElement {
                id: format!("row {key:?}"),
            });
        };
        let detail = session
            .driver()
            .next_sibling(&row)
            .await?
            .filter(|el| el.has_class(views::EXPANDABLE_ROW_CLASS));
        for scope in std::iter::once(&row).chain(detail.as_ref()) {
            let found = session.query(Some(scope), css).await?;
            if found.iter().any(|el| el.text.contains(value)) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Delete the rows of the current page that carry a delete icon
    ///
    /// The count is taken when the call starts; rows moving up from later
    /// pages are left alone. Each deletion waits until its row's key is gone
    /// from the key cell. Returns how many rows were deleted.
    pub async fn delete_table_rows(&self) -> TackleResult<usize> {
        let session = self.session;
        let mut pending = 0;
        for row in self.rows().await? {
            if !session.query(Some(&row), views::DELETE_BUTTON).await?.is_empty() {
                pending += 1;
            }
        }
        let mut deleted = 0;
        while deleted < pending {
            let Some((button, column, key)) = self.next_deletable_row().await? else {
                break;
            };
            debug!(key = %key, column = %column, "deleting row");
            session.click_element(&button, true).await?;
            session.confirm().await?;
            let keyed = Table {
                session,
                root: self.root,
                compact: self.compact,
                key_column: Some(column.as_str()),
            };
            keyed.wait_row_gone(&key).await?;
            deleted += 1;
        }
        info!(deleted, table = self.root, "deleted table rows");
        Ok(deleted)
    }

    /// Delete button of the first deletable row, with the label and text of its key cell
    async fn next_deletable_row(&self) -> TackleResult<Option<(ElementHandle, String, String)>> {
        let session = self.session;
        for row in self.rows().await? {
            let Some(button) = session
                .query(Some(&row), views::DELETE_BUTTON)
                .await?
                .into_iter()
                .next()
            else {
                continue;
            };
            for cell in session.query(Some(&row), views::TD).await? {
                let Some(label) = cell.attr("data-label") else {
                    continue;
                };
                if self.key_column.is_some_and(|column| column != label) {
                    continue;
                }
                let key = cell.text_trimmed();
                if !key.is_empty() {
                    return Ok(Some((button, label.to_string(), key.to_string())));
                }
            }
        }
        Ok(None)
    }
}

fn is_expanded(toggle: &ElementHandle) -> bool {
    toggle.attr("aria-expanded") == Some("true")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;

    mod lookup_tests {
        use super::*;

        #[tokio::test]
        async fn test_key_matches_whole_cell() {
            let (fake, s) = logged_in().await;
            fake.seed(EntityKind::Application, &[("name", "app-10")]);
            fake.seed(EntityKind::Application, &[("name", "app-1")]);
            let table = Table::main(&s);
            let row = table.row("app-1").await.unwrap();
            let name = s.query(Some(&row), "td[data-label=\"Name\"]").await.unwrap();
            assert_eq!(name[0].text_trimmed(), "app-1");
        }

        #[tokio::test]
        async fn test_key_column_ignores_other_cells() {
            let (fake, s) = logged_in().await;
            fake.seed(
                EntityKind::BusinessService,
                &[("name", "ledger"), ("description", "payroll")],
            );
            fake.seed(EntityKind::BusinessService, &[("name", "payroll")]);
            s.visit("/controls/business-services").await.unwrap();
            let table = Table::main(&s).with_key_column("Name");
            let row = table.row("payroll").await.unwrap();
            let name = s.query(Some(&row), "td[data-label=\"Name\"]").await.unwrap();
            assert_eq!(name[0].text_trimmed(), "payroll");
            assert!(table.find_row("ledger").await.unwrap().is_some());
            let by_description = Table::main(&s).with_key_column("Description");
            assert!(by_description.find_row("ledger").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_missing_row_is_not_found() {
            let (_fake, s) = logged_in().await;
            let err = Table::main(&s).row("ghost").await.unwrap_err();
            assert!(matches!(err, TackleError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_exists_and_not_exists() {
            let (fake, s) = logged_in().await;
            fake.seed(EntityKind::Application, &[("name", "ledger")]);
            let table = Table::main(&s);
            table.exists("ledger").await.unwrap();
            table.not_exists("payroll").await.unwrap();
            assert!(table.not_exists("ledger").await.is_err());
        }

        #[tokio::test]
        async fn test_exists_fails_on_empty_table() {
            let (_fake, s) = logged_in().await;
            let err = Table::main(&s).exists("anything").await.unwrap_err();
            assert!(matches!(err, TackleError::AssertionFailed { .. }));
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_kebab_delete() {
            let (fake, s) = logged_in().await;
            fake.seed(EntityKind::Application, &[("name", "legacy")]);
            let table = Table::main(&s);
            table.apply_action("legacy", "Delete").await.unwrap();
            s.confirm().await.unwrap();
            table.wait_row_gone("legacy").await.unwrap();
            assert!(fake.keys(EntityKind::Application).is_empty());
        }

        #[tokio::test]
        async fn test_text_button_action() {
            let (fake, s) = logged_in().await;
            fake.seed(EntityKind::Credential, &[("name", "git-creds"), ("type", "Source Control")]);
            s.visit("/identities").await.unwrap();
            let table = Table::main(&s);
            table.perform_row_action("git-creds", "Delete").await.unwrap();
            s.confirm().await.unwrap();
            table.wait_row_gone("git-creds").await.unwrap();
        }

        #[tokio::test]
        async fn test_row_still_present_is_an_assertion() {
            let (fake, s) = logged_in().await;
            fake.seed(EntityKind::Application, &[("name", "sticky")]);
            let err = Table::main(&s).wait_row_gone("sticky").await.unwrap_err();
            assert!(err.to_string().contains("still present"));
        }

        #[tokio::test]
        async fn test_delete_table_rows() {
            let (fake, s) = logged_in().await;
            for name in ["one", "two", "three"] {
                fake.seed(EntityKind::JobFunction, &[("name", name)]);
            }
            s.visit("/controls/job-functions").await.unwrap();
            let deleted = Table::main(&s).delete_table_rows().await.unwrap();
            assert_eq!(deleted, 3);
            assert!(Table::main(&s).is_empty().await.unwrap());
        }

        #[tokio::test]
        async fn test_delete_table_rows_clears_current_page_only() {
            let (fake, s) = logged_in().await;
            for i in 0..11 {
                let name = format!("role-{i:02}");
                fake.seed(EntityKind::JobFunction, &[("name", name.as_str())]);
            }
            s.visit("/controls/job-functions").await.unwrap();
            let table = Table::main(&s);
            assert_eq!(table.row_count().await.unwrap(), 10);
            assert_eq!(table.delete_table_rows().await.unwrap(), 10);
            assert_eq!(fake.keys(EntityKind::JobFunction).len(), 1);
            assert_eq!(table.row_count().await.unwrap(), 1);
        }
    }

    mod detail_tests {
        use super::*;

        #[tokio::test]
        async fn test_expand_and_close_are_idempotent() {
            let (fake, s) = logged_in().await;
            fake.seed(EntityKind::Application, &[("name", "orders")]);
            let table = Table::main(&s);
            table.expand_row_details("orders").await.unwrap();
            table.expand_row_details("orders").await.unwrap();
            assert!(table.detail_row("orders").await.unwrap().is_some());
            table.close_row_details("orders").await.unwrap();
            table.close_row_details("orders").await.unwrap();
            assert!(table.detail_row("orders").await.unwrap().is_none());
            let toggles = fake
                .history()
                .iter()
                .filter(|h| h.starts_with("ToggleExpand"))
                .count();
            assert_eq!(toggles, 2);
        }

        #[tokio::test]
        async fn test_within_row_reads_detail_row() {
            let (fake, s) = logged_in().await;
            fake.seed(
                EntityKind::Application,
                &[("name", "orders"), ("comments", "owned by billing")],
            );
            let table = Table::main(&s);
            table.expand_row_details("orders").await.unwrap();
            table
                .exists_within_row("orders", "dd", "owned by billing")
                .await
                .unwrap();
            table
                .not_exists_within_row("orders", "dd", "owned by shipping")
                .await
                .unwrap();
            table
                .exists_within_row("orders", "td[data-label=\"Tag count\"]", "0")
                .await
                .unwrap();
        }
    }
}
