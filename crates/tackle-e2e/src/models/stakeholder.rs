//! Stakeholders, keyed by email.

use super::{
    created_alert, open_create_form, open_edit_form, saved_alert, select_all, submit_and_expect,
};
use crate::data;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::views;
use async_trait::async_trait;
use tracing::info;

/// Stakeholders tab of the controls page
pub const VIEW: ListView = ListView::new(
    "Controls",
    Perspective::Developer,
    "Controls",
    "/controls/stakeholders",
)
.with_tab("Stakeholders");

const NOUN: &str = "stakeholder";
const JOB_FUNCTION_SELECT: &str = "#job-function-toggle";
const GROUPS_SELECT: &str = "#stakeholder-groups-toggle";

/// A stakeholder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stakeholder {
    pub email: String,
    /// Display name, used when the stakeholder owns a service or joins a group
    pub name: String,
    pub job_function: Option<String>,
    pub groups: Vec<String>,
}

impl Stakeholder {
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(data::email(), data::person_name())
    }

    #[must_use]
    pub fn with_job_function(mut self, job_function: impl Into<String>) -> Self {
        self.job_function = Some(job_function.into());
        self
    }

    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    async fn fill(&self, session: &Session) -> TackleResult<()> {
        session.input_text("#email", &self.email).await?;
        session.input_text("#displayName", &self.name).await?;
        if let Some(job_function) = &self.job_function {
            session
                .select_form_items(JOB_FUNCTION_SELECT, job_function)
                .await?;
        }
        select_all(session, GROUPS_SELECT, &self.groups).await
    }

    /// Change the display name through the edit form
    pub async fn rename(&mut self, session: &Session, name: &str) -> TackleResult<()> {
        open_edit_form(session, &VIEW, &self.email, RowAction::Icon).await?;
        session.input_text("#displayName", name).await?;
        submit_and_expect(session, &saved_alert(&self.email, NOUN)).await?;
        self.name = name.to_string();
        Ok(())
    }
}

#[async_trait]
impl Creatable for Stakeholder {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, views::CREATE_NEW).await?;
        self.fill(session).await?;
        submit_and_expect(session, &created_alert(&self.email, NOUN)).await?;
        info!(email = %self.email, "created stakeholder");
        Ok(())
    }
}

#[async_trait]
impl Deletable for Stakeholder {
    fn key(&self) -> &str {
        &self.email
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.email, RowAction::Icon).await?;
        info!(email = %self.email, "deleted stakeholder");
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
    async fn test_create_links_job_function_and_groups() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::JobFunction, &[("name", "Architect")]);
        fake.seed(EntityKind::StakeholderGroup, &[("name", "core")]);
        fake.seed(EntityKind::StakeholderGroup, &[("name", "edge")]);
        let person = Stakeholder::new("kim@example.com", "Kim Park")
            .with_job_function("Architect")
            .with_groups(["core", "edge"]);
        person.create(&s).await.unwrap();
        let key = "kim@example.com";
        assert_eq!(
            fake.record_field(EntityKind::Stakeholder, key, "job-function"),
            Some("Architect".to_string())
        );
        assert_eq!(
            fake.record_list(EntityKind::Stakeholder, key, "groups"),
            vec!["core", "edge"]
        );
    }

    #[tokio::test]
    async fn test_rename_then_delete_by_email() {
        let (fake, s) = logged_in().await;
        let mut person = Stakeholder::new("lee@example.com", "Lee");
        person.create(&s).await.unwrap();
        person.rename(&s, "Lee Chen").await.unwrap();
        assert_eq!(
            fake.record_field(EntityKind::Stakeholder, "lee@example.com", "name"),
            Some("Lee Chen".to_string())
        );
        person.delete(&s).await.unwrap();
        assert!(fake.keys(EntityKind::Stakeholder).is_empty());
    }
}
