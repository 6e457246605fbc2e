//! Business services, owned by a stakeholder.

use super::{created_alert, open_create_form, open_edit_form, saved_alert, submit_and_expect};
use crate::data;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::table::Table;
use crate::views;
use async_trait::async_trait;
use tracing::info;

/// Business services tab of the controls page
pub const VIEW: ListView = ListView::new(
    "Controls",
    Perspective::Developer,
    "Controls",
    "/controls/business-services",
)
.with_tab("Business services");

const NOUN: &str = "business service";
const OWNER_SELECT: &str = "#owner-toggle";

/// A business service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessService {
    pub name: String,
    pub description: Option<String>,
    /// Display name of the owning stakeholder
    pub owner: Option<String>,
}

impl BusinessService {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Business service with a unique name and a description
    #[must_use]
    pub fn random() -> Self {
        Self::new(data::unique_name("service")).with_description(data::description())
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    async fn fill(&self, session: &Session) -> TackleResult<()> {
        session.input_text("#name", &self.name).await?;
        if let Some(description) = &self.description {
            session.input_text("#description", description).await?;
        }
        if let Some(owner) = &self.owner {
            session.select_form_items(OWNER_SELECT, owner).await?;
        }
        Ok(())
    }

    /// Open the business services list
    pub async fn open_list(session: &Session) -> TackleResult<()> {
        VIEW.open(session).await
    }

    /// Names shown on the current page of the list
    pub async fn names_on_page(session: &Session) -> TackleResult<Vec<String>> {
        VIEW.open(session).await?;
        Table::main(session).cell_values_on_page("Name").await
    }

    /// Apply `changes` through the edit form; unset fields keep their value
    pub async fn edit(&mut self, session: &Session, changes: Self) -> TackleResult<()> {
        open_edit_form(session, &VIEW, &self.name, RowAction::Icon).await?;
        changes.fill(session).await?;
        submit_and_expect(session, &saved_alert(&changes.name, NOUN)).await?;
        self.name = changes.name;
        self.description = changes.description.or(self.description.take());
        self.owner = changes.owner.or(self.owner.take());
        info!(name = %self.name, "edited business service");
        Ok(())
    }
}

#[async_trait]
impl Creatable for BusinessService {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, views::CREATE_NEW).await?;
        self.fill(session).await?;
        submit_and_expect(session, &created_alert(&self.name, NOUN)).await?;
        info!(name = %self.name, owner = ?self.owner, "created business service");
        Ok(())
    }
}

#[async_trait]
impl Deletable for BusinessService {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.name, RowAction::Icon).await?;
        info!(name = %self.name, "deleted business service");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;

    #[tokio::test]
    async fn test_create_with_owner() {
        let (fake, s) = logged_in().await;
        fake.seed(
            EntityKind::Stakeholder,
            &[("email", "ann@example.com"), ("name", "Ann Lee")],
        );
        let service = BusinessService::new("billing").with_owner("Ann Lee");
        service.create(&s).await.unwrap();
        assert_eq!(
            fake.record_field(EntityKind::BusinessService, "billing", "owner"),
            Some("Ann Lee".to_string())
        );
        assert_eq!(BusinessService::names_on_page(&s).await.unwrap(), vec!["billing"]);
    }

    #[tokio::test]
    async fn test_edit_keeps_unset_fields() {
        let (fake, s) = logged_in().await;
        let mut service = BusinessService::new("billing").with_description("invoices");
        service.create(&s).await.unwrap();
        service
            .edit(&s, BusinessService::new("billing-eu"))
            .await
            .unwrap();
        assert_eq!(service.description.as_deref(), Some("invoices"));
        assert_eq!(
            fake.record_field(EntityKind::BusinessService, "billing-eu", "description"),
            Some("invoices".to_string())
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_is_not_created() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::BusinessService, &[("name", "billing")]);
        assert!(BusinessService::new("billing").create(&s).await.is_err());
        assert_eq!(fake.keys(EntityKind::BusinessService), vec!["billing"]);
    }
}
