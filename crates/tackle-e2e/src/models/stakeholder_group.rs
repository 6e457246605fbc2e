//! Stakeholder groups.

use super::{created_alert, open_create_form, select_all, submit_and_expect};
use crate::data;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::views;
use async_trait::async_trait;
use tracing::info;

/// Stakeholder groups tab of the controls page
pub const VIEW: ListView = ListView::new(
    "Controls",
    Perspective::Developer,
    "Controls",
    "/controls/stakeholder-groups",
)
.with_tab("Stakeholder groups");

const NOUN: &str = "stakeholder group";
const MEMBERS_SELECT: &str = "#stakeholders-toggle";

/// A stakeholder group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeholderGroup {
    pub name: String,
    pub description: Option<String>,
    /// Display names of the members
    pub members: Vec<String>,
}

impl StakeholderGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn random() -> Self {
        let mut group = Self::new(data::unique_name("group"));
        group.description = Some(data::description());
        group
    }

    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Creatable for StakeholderGroup {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, views::CREATE_NEW).await?;
        session.input_text("#name", &self.name).await?;
        if let Some(description) = &self.description {
            session.input_text("#description", description).await?;
        }
        select_all(session, MEMBERS_SELECT, &self.members).await?;
        submit_and_expect(session, &created_alert(&self.name, NOUN)).await?;
        info!(name = %self.name, members = self.members.len(), "created stakeholder group");
        Ok(())
    }
}

#[async_trait]
impl Deletable for StakeholderGroup {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.name, RowAction::Icon).await?;
        info!(name = %self.name, "deleted stakeholder group");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;
    use crate::table::Table;

    #[tokio::test]
    async fn test_member_count_column() {
        let (fake, s) = logged_in().await;
        for (email, name) in [("a@example.com", "Avery"), ("b@example.com", "Blake")] {
            fake.seed(EntityKind::Stakeholder, &[("email", email), ("name", name)]);
        }
        let group = StakeholderGroup::new("reviewers").with_members(["Avery", "Blake"]);
        group.create(&s).await.unwrap();
        Table::main(&s)
            .exists_within_row("reviewers", "td[data-label=\"Member count\"]", "2")
            .await
            .unwrap();
    }
}
