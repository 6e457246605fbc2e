//! Pagination of the business services list.

use super::{ensure, start};
use crate::harness::Suite;
use crate::lifecycle::{create_multiple_business_services, delete_by_list, delete_from_list};
use crate::models::{business_service, BusinessService};
use crate::result::TackleResult;
use crate::session::Session;
use crate::table::Table;
use async_trait::async_trait;
use tracing::{info, instrument};

const FIXTURES: usize = 11;

/// Navigation buttons, page sizes, page number input and deletion on the last page
#[derive(Debug, Default)]
pub struct BusinessServicesPagination {
    services: Vec<BusinessService>,
}

impl BusinessServicesPagination {
    async fn navigation_buttons(&self, session: &Session) -> TackleResult<()> {
        business_service::VIEW.open_with_items_per_page(session, 10).await?;
        Table::main(session).validate_pagination().await
    }

    async fn items_per_page(&self, session: &Session) -> TackleResult<()> {
        business_service::VIEW.open(session).await?;
        let table = Table::main(session);
        table.select_items_per_page(10).await?;
        let rows = table.row_count().await?;
        ensure(rows == 10, || format!("expected 10 rows at page size 10, found {rows}"))?;
        table.select_items_per_page(20).await?;
        let rows = table.row_count().await?;
        ensure(rows > 10 && rows <= 20, || {
            format!("expected 11 to 20 rows at page size 20, found {rows}")
        })
    }

    async fn page_number(&self, session: &Session) -> TackleResult<()> {
        business_service::VIEW.open_with_items_per_page(session, 10).await?;
        let table = Table::main(session);
        table.go_to_page(2).await?;
        let page = table.current_page().await?;
        ensure(page == 2, || format!("expected page 2, found page {page}"))?;
        let rows = table.row_count().await?;
        ensure(rows > 0, || "page 2 is empty".to_string())
    }

    async fn last_page_deletion(&mut self, session: &Session) -> TackleResult<()> {
        business_service::VIEW.open_with_items_per_page(session, 10).await?;
        let table = Table::main(session);
        table.go_to_last_page().await?;
        let names = BusinessService::names_on_page(session).await?;
        let on_last_page: Vec<BusinessService> = self
            .services
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect();
        info!(count = on_last_page.len(), "deleting last page");
        delete_by_list(session, &on_last_page).await?;
        for service in &on_last_page {
            self.services = delete_from_list(std::mem::take(&mut self.services), service);
        }

        business_service::VIEW.open_with_items_per_page(session, 10).await?;
        table.go_to_last_page().await?;
        let rows = table.row_count().await?;
        ensure(rows > 0, || "last page is empty after deleting its rows".to_string())?;
        for service in &on_last_page {
            table.not_exists(&service.name).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Suite for BusinessServicesPagination {
    fn name(&self) -> &'static str {
        "business-services-pagination"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["@tier3"]
    }

    fn tests(&self) -> &'static [&'static str] {
        &[
            "navigation buttons",
            "items per page",
            "page number",
            "last page deletion",
        ]
    }

    #[instrument(skip_all)]
    async fn before(&mut self, session: &Session) -> TackleResult<()> {
        start(session).await?;
        self.services = create_multiple_business_services(session, FIXTURES, &[]).await?;
        Ok(())
    }

    async fn run_test(&mut self, session: &Session, test: &str) -> TackleResult<()> {
        match test {
            "navigation buttons" => self.navigation_buttons(session).await,
            "items per page" => self.items_per_page(session).await,
            "page number" => self.page_number(session).await,
            "last page deletion" => self.last_page_deletion(session).await,
            other => Err(crate::result::TackleError::config(format!(
                "no test `{other}` in {}",
                self.name()
            ))),
        }
    }

    #[instrument(skip_all)]
    async fn after(&mut self, session: &Session) -> TackleResult<()> {
        delete_by_list(session, &self.services).await?;
        self.services.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::TackleDriver;
    use crate::harness::{NoopObserver, SuiteRunner};
    use crate::mock::{EntityKind, FakeTackle};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_suite_passes_and_cleans_up() {
        let fake = Arc::new(FakeTackle::new());
        let driver: Arc<dyn TackleDriver> = fake.clone();
        let session = Session::new(driver, fake.config());
        let mut suite = BusinessServicesPagination::default();
        let results = SuiteRunner::new().run(&session, &mut suite, &mut NoopObserver).await;
        assert!(results.all_passed(), "{results:?}");
        assert_eq!(results.passed_count(), 4);
        assert!(fake.keys(EntityKind::BusinessService).is_empty());
    }
}
