//! Column sorting of the tag types list.

use super::start;
use crate::harness::Suite;
use crate::lifecycle::{create_multiple_tags, delete_all_tags_and_tag_types};
use crate::models::tag;
use crate::result::{TackleError, TackleResult};
use crate::session::Session;
use crate::sort::{verify_sort_asc, verify_sort_desc};
use crate::table::Table;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Ascending and descending round trips on text and numeric columns
#[derive(Debug, Default)]
pub struct TagTypesSort;

/// Sort `column` both ways, checking each against the unsorted capture
async fn sort_round_trip(session: &Session, column: &str) -> TackleResult<()> {
    tag::VIEW.open(session).await?;
    let table = Table::main(session);
    let reference = table.column_data(column).await?;
    debug!(column, values = reference.len(), "captured unsorted column");

    table.sort_asc(column).await?;
    verify_sort_asc(&table.column_data(column).await?, &reference)?;

    table.sort_desc(column).await?;
    verify_sort_desc(&table.column_data(column).await?, &reference)
}

#[async_trait]
impl Suite for TagTypesSort {
    fn name(&self) -> &'static str {
        "tag-types-sort"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["@tier3"]
    }

    fn tests(&self) -> &'static [&'static str] {
        &["tag type sort", "rank sort", "tag count sort"]
    }

    #[instrument(skip_all)]
    async fn before(&mut self, session: &Session) -> TackleResult<()> {
        start(session).await?;
        create_multiple_tags(session, 2).await?;
        Ok(())
    }

    async fn run_test(&mut self, session: &Session, test: &str) -> TackleResult<()> {
        let column = match test {
            "tag type sort" => tag::TAG_TYPE_COLUMN,
            "rank sort" => "Rank",
            "tag count sort" => "Tag count",
            other => {
                return Err(TackleError::config(format!(
                    "no test `{other}` in {}",
                    self.name()
                )))
            }
        };
        sort_round_trip(session, column).await
    }

    #[instrument(skip_all)]
    async fn after(&mut self, session: &Session) -> TackleResult<()> {
        delete_all_tags_and_tag_types(session).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_TAG_TYPES;
    use crate::driver::TackleDriver;
    use crate::harness::{NoopObserver, SuiteRunner};
    use crate::mock::{EntityKind, FakeTackle};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_suite_passes_and_restores_defaults() {
        let fake = Arc::new(FakeTackle::new());
        let driver: Arc<dyn TackleDriver> = fake.clone();
        let session = Session::new(driver, fake.config());
        let results = SuiteRunner::new()
            .run(&session, &mut TagTypesSort, &mut NoopObserver)
            .await;
        assert!(results.all_passed(), "{results:?}");
        assert_eq!(results.passed_count(), 3);
        assert_eq!(fake.keys(EntityKind::TagType).len(), DEFAULT_TAG_TYPES.len());
    }
}
