//! Column extraction and header sorting.

use super::{Table, MAX_PER_PAGE};
use crate::result::{TackleError, TackleResult};
use crate::sort::{ColumnKind, ColumnValue, SortDirection};
use crate::views;
use crate::wait::poll_until;
use tracing::{debug, warn};

const SORT_ATTR: &str = "aria-sort";
const MAX_SORT_CLICKS: usize = 2;

impl Table<'_> {
    /// Trimmed text of `column` for every row on the current page
    ///
    /// Rows without the cell are skipped; empty cells are kept as `""`.
    pub async fn cell_values_on_page(&self, column: &str) -> TackleResult<Vec<String>> {
        let session = self.session;
        let cell_css = Self::cell_css(column);
        let mut values = Vec::new();
        for row in self.rows().await? {
            if let Some(cell) = session.query(Some(&row), &cell_css).await?.first() {
                values.push(cell.text_trimmed().to_string());
            }
        }
        Ok(values)
    }

    /// Every value of `column`, coerced for comparison
    ///
    /// The main table is switched to the largest page size first so the
    /// whole column is read. Empty cells are skipped. Compact tables always
    /// extract lowercase text.
    pub async fn column_data(&self, column: &str) -> TackleResult<Vec<ColumnValue>> {
        if !self.compact {
            self.select_items_per_page(MAX_PER_PAGE).await?;
        }
        self.wait_until_settled().await?;
        let kind = if self.compact {
            ColumnKind::Text
        } else {
            ColumnKind::for_column(column)
        };
        let raw = self.cell_values_on_page(column).await?;
        let values: Vec<ColumnValue> = raw
            .iter()
            .filter_map(|text| ColumnValue::coerce(kind, text))
            .collect();
        debug!(column, ?kind, rows = raw.len(), values = values.len(), "column data");
        Ok(values)
    }

    /// Sort ascending by clicking the header of `column`
    pub async fn sort_asc(&self, column: &str) -> TackleResult<()> {
        self.sort(column, SortDirection::Ascending).await
    }

    /// Sort descending by clicking the header of `column`
    pub async fn sort_desc(&self, column: &str) -> TackleResult<()> {
        self.sort(column, SortDirection::Descending).await
    }

    /// Click the header until its sort indicator reads `direction`
    ///
    /// Each click is followed by a wait for the indicator to change. A
    /// header without a sort indicator is not sortable; that is logged and
    /// nothing is clicked.
    pub async fn sort(&self, column: &str, direction: SortDirection) -> TackleResult<()> {
        let session = self.session;
        let target = direction.aria();
        let header = session
            .first(&session.lookup(&self.header_css(column)))
            .await?;
        let Some(mut current) = header.attr(SORT_ATTR).map(str::to_string) else {
            warn!(column, "column header has no sort indicator, not sortable");
            return Ok(());
        };

        for _ in 0..MAX_SORT_CLICKS {
            if current == target {
                return self.wait_until_settled().await;
            }
            let button = session
                .first_in(Some(&header), &session.command(views::BUTTON))
                .await?;
            session.click_element(&button, true).await?;
            let header_ref = &header;
            let before = current.as_str();
            let changed = poll_until(
                session.wait_options(session.timeouts().lookup_ms),
                &format!("sort indicator of `{column}` to change"),
                move || async move {
                    let refreshed = session.driver().refresh(header_ref).await?;
                    let aria = refreshed.attr(SORT_ATTR).unwrap_or("none");
                    Ok((aria != before).then(|| aria.to_string()))
                },
            )
            .await?;
            debug!(column, sort = %changed, "header clicked");
            current = changed;
        }

        if current == target {
            self.wait_until_settled().await
        } else {
            Err(TackleError::assertion(format!(
                "column `{column}` is sorted {current}, expected {target}"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;
    use crate::sort::{verify_sort_asc, verify_sort_desc};

    #[tokio::test]
    async fn test_column_data_reads_past_first_page() {
        let (fake, s) = logged_in().await;
        for i in 0..15 {
            fake.seed(EntityKind::Application, &[("name", &format!("App-{i:02}"))]);
        }
        let values = Table::main(&s).column_data("Name").await.unwrap();
        assert_eq!(values.len(), 15);
        assert_eq!(values[0], ColumnValue::Text("app-00".into()));
    }

    #[tokio::test]
    async fn test_empty_cells_are_skipped() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::Application, &[("name", "a"), ("description", "first")]);
        fake.seed(EntityKind::Application, &[("name", "b")]);
        let values = Table::main(&s).column_data("Description").await.unwrap();
        assert_eq!(values, vec![ColumnValue::Text("first".into())]);
    }

    #[tokio::test]
    async fn test_count_column_is_numeric() {
        let (_fake, s) = logged_in().await;
        s.visit("/controls/tags").await.unwrap();
        let values = Table::main(&s).column_data("Tag count").await.unwrap();
        assert!(!values.is_empty());
        assert!(values.iter().all(ColumnValue::is_numeric));
    }

    #[tokio::test]
    async fn test_sort_round_trip() {
        let (fake, s) = logged_in().await;
        for name in ["delta", "Alpha", "charlie", "bravo"] {
            fake.seed(EntityKind::Application, &[("name", name)]);
        }
        let table = Table::main(&s);
        let reference = table.column_data("Name").await.unwrap();

        table.sort_asc("Name").await.unwrap();
        let ascending = table.column_data("Name").await.unwrap();
        verify_sort_asc(&ascending, &reference).unwrap();

        table.sort_desc("Name").await.unwrap();
        let descending = table.column_data("Name").await.unwrap();
        verify_sort_desc(&descending, &reference).unwrap();
    }

    #[tokio::test]
    async fn test_already_sorted_is_not_clicked_again() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::Application, &[("name", "only")]);
        let table = Table::main(&s);
        table.sort_asc("Name").await.unwrap();
        table.sort_asc("Name").await.unwrap();
        let clicks = fake
            .history()
            .iter()
            .filter(|h| h.starts_with("Sort("))
            .count();
        assert_eq!(clicks, 1);
    }

    #[tokio::test]
    async fn test_unsortable_column_is_left_alone() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::Application, &[("name", "only")]);
        Table::main(&s).sort_asc("Description").await.unwrap();
        assert!(!fake.was_called("Sort("));
    }
}
