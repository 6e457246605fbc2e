//! Job functions, assigned to stakeholders.

use super::{created_alert, open_create_form, submit_and_expect};
use crate::data;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::{Perspective, Session};
use crate::views;
use async_trait::async_trait;
use tracing::info;

/// Job functions tab of the controls page
pub const VIEW: ListView = ListView::new(
    "Controls",
    Perspective::Developer,
    "Controls",
    "/controls/job-functions",
)
.with_tab("Job functions");

const NOUN: &str = "job function";

/// A job function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFunction {
    pub name: String,
}

impl JobFunction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(data::job_title())
    }
}

#[async_trait]
impl Creatable for JobFunction {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, views::CREATE_NEW).await?;
        session.input_text("#name", &self.name).await?;
        submit_and_expect(session, &created_alert(&self.name, NOUN)).await?;
        info!(name = %self.name, "created job function");
        Ok(())
    }
}

#[async_trait]
impl Deletable for JobFunction {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.name, RowAction::Icon).await?;
        info!(name = %self.name, "deleted job function");
        Ok(())
    }
}
