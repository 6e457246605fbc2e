//! Toolbar filters of the application inventory.

use super::{ensure, start};
use crate::data;
use crate::filter::{apply_search_filter, category, clear_all_filters, FilterSlot};
use crate::harness::Suite;
use crate::lifecycle::{
    create_multiple_business_services, create_multiple_tags, delete_all_business_services,
    delete_all_tag_types, delete_application_table_rows, Creatable,
};
use crate::models::{application, Application};
use crate::result::{TackleError, TackleResult};
use crate::session::Session;
use crate::table::Table;
use async_trait::async_trait;
use tracing::instrument;

const EMPTY_STATE: &str = "No applications available";
const NAME_PREFIX: usize = 11;
const DESCRIPTION_PREFIX: usize = 8;

/// Name, description, business service and tag filters
#[derive(Debug, Default)]
pub struct ApplicationFilters {
    applications: Vec<Application>,
}

fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

impl ApplicationFilters {
    fn application(&self, i: usize) -> TackleResult<&Application> {
        self.applications
            .get(i)
            .ok_or_else(|| TackleError::fixture(format!("application fixture {i} was not created")))
    }

    async fn filter(&self, session: &Session, category: &str, value: &str) -> TackleResult<()> {
        application::VIEW.open(session).await?;
        apply_search_filter(session, category, &[value], FilterSlot::default()).await
    }

    async fn expect_no_results(&self, session: &Session) -> TackleResult<()> {
        session.expect_text("h2", EMPTY_STATE).await
    }

    /// Substring, exact and non-matching searches through a text filter
    async fn text_filter<F>(
        &self,
        session: &Session,
        category: &str,
        chars: usize,
        field: F,
    ) -> TackleResult<()>
    where
        F: Fn(&Application) -> String,
    {
        let table = Table::main(session);
        let first = field(self.application(0)?);
        let second = field(self.application(1)?);

        let partial = prefix(&first, chars);
        self.filter(session, category, &partial).await?;
        table.exists(&first).await?;
        if second.contains(&partial) {
            table.exists(&second).await?;
        }
        clear_all_filters(session).await?;

        self.filter(session, category, &second).await?;
        table.exists(&second).await?;
        clear_all_filters(session).await?;

        self.filter(session, category, &data::non_matching()).await?;
        self.expect_no_results(session).await?;
        clear_all_filters(session).await
    }

    async fn name_filter(&self, session: &Session) -> TackleResult<()> {
        self.text_filter(session, category::NAME, NAME_PREFIX, |a| a.name.clone())
            .await
    }

    async fn description_filter(&self, session: &Session) -> TackleResult<()> {
        self.text_filter(session, category::DESCRIPTION, DESCRIPTION_PREFIX, |a| {
            a.description.clone().unwrap_or_default()
        })
        .await
    }

    async fn business_service_filter(&self, session: &Session) -> TackleResult<()> {
        let first = self.application(0)?;
        let second = self.application(1)?;
        let service = first
            .business_service
            .as_deref()
            .ok_or_else(|| TackleError::fixture("application without business service"))?;
        self.filter(session, category::BUSINESS_SERVICE, service).await?;
        let table = Table::main(session);
        table.exists(&first.name).await?;
        table.not_exists(&second.name).await?;
        clear_all_filters(session).await
    }

    async fn tag_filter(&self, session: &Session) -> TackleResult<()> {
        let first = self.application(0)?;
        let second = self.application(1)?;
        let tag = first
            .tags
            .first()
            .ok_or_else(|| TackleError::fixture("application without tags"))?;
        self.filter(session, category::TAG, tag).await?;
        let table = Table::main(session);
        table.exists(&first.name).await?;
        table.not_exists(&second.name).await?;
        let rows = table.row_count().await?;
        ensure(rows == 1, || format!("expected 1 application tagged `{tag}`, found {rows}"))?;
        clear_all_filters(session).await
    }
}

#[async_trait]
impl Suite for ApplicationFilters {
    fn name(&self) -> &'static str {
        "application-inventory-filters"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["@tier2"]
    }

    fn tests(&self) -> &'static [&'static str] {
        &["name filter", "description filter", "business service filter", "tag filter"]
    }

    /// Two applications, each with its own business service and tag
    #[instrument(skip_all)]
    async fn before(&mut self, session: &Session) -> TackleResult<()> {
        start(session).await?;
        let services = create_multiple_business_services(session, 2, &[]).await?;
        let tags = create_multiple_tags(session, 2).await?;
        for (service, (_, tag)) in services.iter().zip(&tags) {
            let app = Application::random()
                .with_business_service(service.name.clone())
                .with_tags([tag.name.clone()]);
            app.create(session).await?;
            self.applications.push(app);
        }
        Ok(())
    }

    async fn run_test(&mut self, session: &Session, test: &str) -> TackleResult<()> {
        match test {
            "name filter" => self.name_filter(session).await,
            "description filter" => self.description_filter(session).await,
            "business service filter" => self.business_service_filter(session).await,
            "tag filter" => self.tag_filter(session).await,
            other => Err(TackleError::config(format!("no test `{other}` in {}", self.name()))),
        }
    }

    #[instrument(skip_all)]
    async fn after(&mut self, session: &Session) -> TackleResult<()> {
        delete_application_table_rows(session).await?;
        delete_all_tag_types(session).await?;
        delete_all_business_services(session).await?;
        self.applications.clear();
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

    #[test]
    fn test_prefix_counts_chars() {
        assert_eq!(prefix("app-maple-1a2b", 11), "app-maple-1");
        assert_eq!(prefix("äpp", 2), "äp");
        assert_eq!(prefix("ab", 5), "ab");
    }

    #[tokio::test]
    async fn test_suite_passes_and_cleans_up() {
        let fake = Arc::new(FakeTackle::new());
        let driver: Arc<dyn TackleDriver> = fake.clone();
        let session = Session::new(driver, fake.config());
        let mut suite = ApplicationFilters::default();
        let results = SuiteRunner::new().run(&session, &mut suite, &mut NoopObserver).await;
        assert!(results.all_passed(), "{results:?}");
        assert!(fake.keys(EntityKind::Application).is_empty());
        assert!(fake.keys(EntityKind::BusinessService).is_empty());
    }
}
