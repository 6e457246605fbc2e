//! Credentials of the administrator perspective.

use super::{created_alert, open_create_form, open_edit_form, saved_alert, submit_and_expect};
use crate::data;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::table::Table;
use crate::views;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The credentials list
pub const VIEW: ListView = ListView::new(
    "Credentials",
    Perspective::Administrator,
    "Credentials",
    "/identities",
);

const NOUN: &str = "credential";
const TYPE_SELECT: &str = "#type-toggle";

/// What a credential authenticates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Proxy username and password
    Proxy,
    /// Maven settings
    Maven,
    /// Source control username and password
    SourceUsername,
    /// Source control private key
    SourceKey,
}

impl CredentialKind {
    pub const ALL: [Self; 4] = [Self::Proxy, Self::Maven, Self::SourceUsername, Self::SourceKey];

    /// Option text in the type select
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Proxy => "Proxy",
            Self::Maven => "Maven",
            Self::SourceUsername | Self::SourceKey => "Source Control",
        }
    }
}

/// A stored credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub description: Option<String>,
    pub kind: CredentialKind,
    pub user: Option<String>,
    pub password: Option<String>,
    pub key: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: CredentialKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            user: None,
            password: None,
            key: None,
        }
    }

    /// Unique credential of `kind` with the secrets that kind needs
    #[must_use]
    pub fn random(kind: CredentialKind) -> Self {
        let base = Self::new(data::unique_name("cred"), kind).with_description(data::description());
        match kind {
            CredentialKind::Proxy | CredentialKind::SourceUsername => {
                base.with_login(data::random_word(), data::random_word())
            }
            CredentialKind::Maven => {
                base.with_key(format!("<settings>{}</settings>", data::random_word()))
            }
            CredentialKind::SourceKey => base.with_key(format!("ssh-rsa {}", data::random_word())),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_login(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    async fn fill(&self, session: &Session) -> TackleResult<()> {
        session.input_text("#name", &self.name).await?;
        if let Some(description) = &self.description {
            session.input_text("#description", description).await?;
        }
        session
            .select_form_items(TYPE_SELECT, self.kind.label())
            .await?;
        if let Some(user) = &self.user {
            session.input_text("#user", user).await?;
        }
        if let Some(password) = &self.password {
            session.input_text("#password", password).await?;
        }
        if let Some(key) = &self.key {
            session.input_text("#key", key).await?;
        }
        Ok(())
    }

    /// Replace the stored values with `changes`
    pub async fn edit(&mut self, session: &Session, changes: Self) -> TackleResult<()> {
        open_edit_form(session, &VIEW, &self.name, RowAction::Button).await?;
        changes.fill(session).await?;
        submit_and_expect(session, &saved_alert(&changes.name, NOUN)).await?;
        *self = changes;
        info!(name = %self.name, "edited credential");
        Ok(())
    }

    /// Names listed on the current page of the credentials view
    pub async fn names_on_page(session: &Session) -> TackleResult<Vec<String>> {
        VIEW.open(session).await?;
        Table::main(session).cell_values_on_page("Name").await
    }
}

#[async_trait]
impl Creatable for Credentials {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, views::CREATE_NEW).await?;
        self.fill(session).await?;
        submit_and_expect(session, &created_alert(&self.name, NOUN)).await?;
        info!(name = %self.name, kind = ?self.kind, "created credential");
        Ok(())
    }
}

#[async_trait]
impl Deletable for Credentials {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.name, RowAction::Button).await?;
        info!(name = %self.name, "deleted credential");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;

    #[test]
    fn test_source_kinds_share_label() {
        assert_eq!(CredentialKind::SourceKey.label(), CredentialKind::SourceUsername.label());
        assert!(Credentials::random(CredentialKind::SourceKey).key.is_some());
        assert!(Credentials::random(CredentialKind::Proxy).password.is_some());
    }

    #[tokio::test]
    async fn test_create_edit_delete() {
        let (fake, s) = logged_in().await;
        let mut cred =
            Credentials::new("corp-proxy", CredentialKind::Proxy).with_login("svc", "s3cret");
        cred.create(&s).await.unwrap();
        assert_eq!(
            fake.record_field(EntityKind::Credential, "corp-proxy", "type"),
            Some("Proxy".to_string())
        );

        let changes =
            Credentials::new("corp-proxy-eu", CredentialKind::Proxy).with_login("svc-eu", "s3cret");
        cred.edit(&s, changes).await.unwrap();
        assert_eq!(
            fake.record_field(EntityKind::Credential, "corp-proxy-eu", "user"),
            Some("svc-eu".to_string())
        );
        assert_eq!(Credentials::names_on_page(&s).await.unwrap(), vec!["corp-proxy-eu"]);

        cred.delete(&s).await.unwrap();
        assert!(fake.keys(EntityKind::Credential).is_empty());
    }
}
