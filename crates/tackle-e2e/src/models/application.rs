//! Application inventory entries.

use super::{
    created_alert, open_create_form, open_edit_form, saved_alert, select_all, submit_and_expect,
};
use crate::data;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::{TackleError, TackleResult};
use crate::session::{Perspective, Session};
use crate::table::Table;
use crate::views;
use crate::wait::wait_for;
use async_trait::async_trait;
use tracing::info;

/// The application inventory
pub const VIEW: ListView = ListView::new(
    "Application inventory",
    Perspective::Developer,
    "Application inventory",
    "/applications",
);

const NOUN: &str = "application";
const NAME_INPUT: &str = "#name";
const DESCRIPTION_INPUT: &str = "#description";
const COMMENT_INPUT: &str = "#comments";
const BUSINESS_SERVICE_SELECT: &str = "#business-service-toggle";
const TAGS_SELECT: &str = "#tags-toggle";
const TAG_COUNT_COLUMN: &str = "Tag count";

/// An application in the inventory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub business_service: Option<String>,
    pub tags: Vec<String>,
}

impl Application {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Application with a unique name and a description
    #[must_use]
    pub fn random() -> Self {
        Self::new(data::unique_name("app")).with_description(data::description())
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_business_service(mut self, name: impl Into<String>) -> Self {
        self.business_service = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    async fn fill(&self, session: &Session, already_tagged: &[String]) -> TackleResult<()> {
        session.input_text(NAME_INPUT, &self.name).await?;
        if let Some(description) = &self.description {
            session.input_text(DESCRIPTION_INPUT, description).await?;
        }
        if let Some(comment) = &self.comment {
            session.input_text(COMMENT_INPUT, comment).await?;
        }
        if let Some(service) = &self.business_service {
            session
                .select_form_items(BUSINESS_SERVICE_SELECT, service)
                .await?;
        }
        let new_tags: Vec<String> = self
            .tags
            .iter()
            .filter(|t| !already_tagged.contains(t))
            .cloned()
            .collect();
        select_all(session, TAGS_SELECT, &new_tags).await
    }

    /// Apply `changes` through the edit form
    ///
    /// Unset optional fields keep their current value. Tags are only ever
    /// added.
    pub async fn edit(&mut self, session: &Session, changes: Self) -> TackleResult<()> {
        open_edit_form(session, &VIEW, &self.name, RowAction::Kebab).await?;
        changes.fill(session, &self.tags).await?;
        submit_and_expect(session, &saved_alert(&changes.name, NOUN)).await?;
        let Self {
            name,
            description,
            comment,
            business_service,
            tags,
        } = changes;
        self.name = name;
        self.description = description.or(self.description.take());
        self.comment = comment.or(self.comment.take());
        self.business_service = business_service.or(self.business_service.take());
        for tag in tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        info!(name = %self.name, "edited application");
        Ok(())
    }

    /// Wait until the tag count column of the application reads `count`
    pub async fn verify_tag_count(&self, session: &Session, count: usize) -> TackleResult<()> {
        VIEW.open(session).await?;
        let table = Table::main(session);
        let name = self.name.as_str();
        let expected = count.to_string();
        let expected = expected.as_str();
        let cell_css = Table::cell_css(TAG_COUNT_COLUMN);
        let cell_css = cell_css.as_str();
        wait_for(
            session.wait_options(session.timeouts().lookup_ms),
            &format!("tag count of `{name}` to be {count}"),
            move || async move {
                let row = table.row(name).await?;
                let cells = session.query(Some(&row), cell_css).await?;
                Ok(cells.first().is_some_and(|c| c.text_trimmed() == expected))
            },
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            TackleError::Timeout { .. } => TackleError::assertion(format!(
                "expected application `{name}` to have {count} tags"
            )),
            other => other,
        })
    }

    /// Names shown in the inventory on the current page
    pub async fn names_on_page(session: &Session) -> TackleResult<Vec<String>> {
        VIEW.open(session).await?;
        Table::main(session).cell_values_on_page("Name").await
    }
}

#[async_trait]
impl Creatable for Application {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, views::CREATE_NEW).await?;
        self.fill(session, &[]).await?;
        submit_and_expect(session, &created_alert(&self.name, NOUN)).await?;
        info!(name = %self.name, "created application");
        Ok(())
    }
}

#[async_trait]
impl Deletable for Application {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.name, RowAction::Kebab).await?;
        info!(name = %self.name, "deleted application");
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
    async fn test_create_with_tags_and_delete() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::BusinessService, &[("name", "payments")]);
        let app = Application::new("checkout")
            .with_description("card checkout")
            .with_business_service("payments")
            .with_tags(["Java", "Tomcat"]);
        app.create(&s).await.unwrap();
        assert_eq!(
            fake.record_field(EntityKind::Application, "checkout", "business"),
            Some("payments".to_string())
        );
        app.verify_tag_count(&s, 2).await.unwrap();

        app.delete(&s).await.unwrap();
        assert!(fake.keys(EntityKind::Application).is_empty());
    }

    #[tokio::test]
    async fn test_edit_adds_tags_and_renames() {
        let (fake, s) = logged_in().await;
        let mut app = Application::new("inventory").with_tags(["Java"]);
        app.create(&s).await.unwrap();
        let changes = Application::new("inventory-v2").with_tags(["Java", "Quarkus"]);
        app.edit(&s, changes).await.unwrap();
        assert_eq!(app.name, "inventory-v2");
        assert_eq!(
            fake.record_list(EntityKind::Application, "inventory-v2", "tags"),
            vec!["Java", "Quarkus"]
        );
        app.verify_tag_count(&s, 2).await.unwrap();
    }

    #[tokio::test]
    async fn test_wrong_tag_count_is_an_assertion() {
        let (_fake, s) = logged_in().await;
        let app = Application::new("lonely");
        app.create(&s).await.unwrap();
        let err = app.verify_tag_count(&s, 3).await.unwrap_err();
        assert!(matches!(err, TackleError::AssertionFailed { .. }));
    }
}
