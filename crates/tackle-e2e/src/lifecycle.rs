//! Fixture lifecycle: create entities in bulk, delete them again.
//!
//! Entities take part through two capability traits. [`Creatable`] puts an
//! entity into the application; [`Deletable`] removes it and names the
//! business key its row is found by. Bulk deletion is sequential and not
//! transactional: the first failure aborts the run and leaves the remaining
//! entities in place.

use crate::data::{self, DEFAULT_TAG_TYPES};
use crate::models::{
    application, business_service, credentials, job_function, stakeholder, stakeholder_group, tag,
    Application, BusinessService, CredentialKind, Credentials, JobFunction, Stakeholder,
    StakeholderGroup, Tag, TagType,
};
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::Session;
use crate::table::{Table, MAX_PER_PAGE};
use crate::views;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

// =============================================================================
// CAPABILITIES
// =============================================================================

/// An entity that can be created through the UI
#[async_trait]
pub trait Creatable: Send + Sync {
    /// Create the entity; once this returns it is listed under its key
    async fn create(&self, session: &Session) -> TackleResult<()>;
}

/// An entity that can be deleted through the UI
#[async_trait]
pub trait Deletable: Send + Sync {
    /// Business key the entity's row is found by
    fn key(&self) -> &str;

    /// Delete the entity and wait until its row is gone
    async fn delete(&self, session: &Session) -> TackleResult<()>;
}

#[async_trait]
impl<T: Creatable + ?Sized> Creatable for Box<T> {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        (**self).create(session).await
    }
}

#[async_trait]
impl<T: Deletable + ?Sized> Deletable for Box<T> {
    fn key(&self) -> &str {
        (**self).key()
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        (**self).delete(session).await
    }
}

/// How a row offers its delete action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Inline icon buttons
    Icon,
    /// Kebab menu with a "Delete" item
    Kebab,
    /// Inline text buttons
    Button,
}

impl RowAction {
    /// Trigger the delete action of the row keyed by `key`
    ///
    /// Leaves the confirm dialog open.
    pub async fn delete(self, table: &Table<'_>, key: &str) -> TackleResult<()> {
        match self {
            Self::Icon => table.perform_row_action_by_icon(key, views::DELETE_BUTTON).await,
            Self::Kebab => table.apply_action(key, "Delete").await,
            Self::Button => table.perform_row_action(key, "Delete").await,
        }
    }
}

// =============================================================================
// BULK CREATE
// =============================================================================

/// Create `n` entities built by `factory`, in order
///
/// Returns the entities in creation order.
pub async fn create_multiple<T, F>(
    session: &Session,
    n: usize,
    mut factory: F,
) -> TackleResult<Vec<T>>
where
    T: Creatable,
    F: FnMut(usize) -> T,
{
    let mut created = Vec::with_capacity(n);
    for i in 0..n {
        let entity = factory(i);
        entity.create(session).await?;
        created.push(entity);
    }
    debug!(count = n, "created fixtures");
    Ok(created)
}

/// Business services, the i-th owned by the i-th of `owners` when there is one
pub async fn create_multiple_business_services(
    session: &Session,
    n: usize,
    owners: &[Stakeholder],
) -> TackleResult<Vec<BusinessService>> {
    create_multiple(session, n, |i| {
        let service = BusinessService::random();
        match owners.get(i) {
            Some(owner) => service.with_owner(owner.name.clone()),
            None => service,
        }
    })
    .await
}

/// Stakeholders linked by index to `job_functions` and `groups`
pub async fn create_multiple_stakeholders(
    session: &Session,
    n: usize,
    job_functions: &[JobFunction],
    groups: &[StakeholderGroup],
) -> TackleResult<Vec<Stakeholder>> {
    create_multiple(session, n, |i| {
        let mut stakeholder = Stakeholder::random();
        if let Some(job_function) = job_functions.get(i) {
            stakeholder = stakeholder.with_job_function(job_function.name.clone());
        }
        if let Some(group) = groups.get(i) {
            stakeholder = stakeholder.with_groups([group.name.clone()]);
        }
        stakeholder
    })
    .await
}

/// Stakeholder groups, the i-th holding the i-th of `members`
pub async fn create_multiple_stakeholder_groups(
    session: &Session,
    n: usize,
    members: &[Stakeholder],
) -> TackleResult<Vec<StakeholderGroup>> {
    create_multiple(session, n, |i| {
        let group = StakeholderGroup::random();
        match members.get(i) {
            Some(member) => group.with_members([member.name.clone()]),
            None => group,
        }
    })
    .await
}

pub async fn create_multiple_job_functions(
    session: &Session,
    n: usize,
) -> TackleResult<Vec<JobFunction>> {
    create_multiple(session, n, |_| JobFunction::random()).await
}

/// `n` tags, each under a tag type created for it
pub async fn create_multiple_tags(
    session: &Session,
    n: usize,
) -> TackleResult<Vec<(TagType, Tag)>> {
    let mut created = Vec::with_capacity(n);
    for _ in 0..n {
        let tag_type = TagType::random();
        tag_type.create(session).await?;
        let tag = Tag::random(tag_type.name.clone());
        tag.create(session).await?;
        created.push((tag_type, tag));
    }
    Ok(created)
}

pub async fn create_multiple_applications(
    session: &Session,
    n: usize,
) -> TackleResult<Vec<Application>> {
    create_multiple(session, n, |_| Application::random()).await
}

/// `n` credentials cycling through every [`CredentialKind`]
pub async fn create_multiple_credentials(
    session: &Session,
    n: usize,
) -> TackleResult<Vec<Credentials>> {
    create_multiple(session, n, |i| {
        Credentials::random(CredentialKind::ALL[i % CredentialKind::ALL.len()])
    })
    .await
}

// =============================================================================
// BULK DELETE
// =============================================================================

/// Delete `entities` in order
///
/// Waits for open dialogs to close before each deletion. The first failure
/// is returned as is; entities after it are not attempted.
#[instrument(skip_all, fields(count = entities.len()))]
pub async fn delete_by_list<T: Deletable>(session: &Session, entities: &[T]) -> TackleResult<()> {
    for (i, entity) in entities.iter().enumerate() {
        session.wait_until_idle().await?;
        if let Err(e) = entity.delete(session).await {
            warn!(
                key = entity.key(),
                remaining = entities.len() - i - 1,
                error = %e,
                "bulk delete aborted"
            );
            return Err(e);
        }
    }
    info!(count = entities.len(), "deleted fixtures");
    Ok(())
}

/// `list` without the entries equal to `item`
#[must_use]
pub fn delete_from_list<T: PartialEq>(list: Vec<T>, item: &T) -> Vec<T> {
    list.into_iter().filter(|entry| entry != item).collect()
}

/// Which rows a delete-all run removes, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletePlan {
    pub view: ListView,
    /// Column holding the business key
    pub key_column: &'static str,
    pub action: RowAction,
    /// Keys that are never deleted
    pub protected: &'static [&'static str],
}

impl DeletePlan {
    #[must_use]
    pub const fn new(view: ListView, key_column: &'static str, action: RowAction) -> Self {
        Self {
            view,
            key_column,
            action,
            protected: &[],
        }
    }

    #[must_use]
    pub const fn with_protected(mut self, protected: &'static [&'static str]) -> Self {
        self.protected = protected;
        self
    }
}

pub const JOB_FUNCTIONS: DeletePlan = DeletePlan::new(job_function::VIEW, "Name", RowAction::Icon);
pub const STAKEHOLDERS: DeletePlan = DeletePlan::new(stakeholder::VIEW, "Email", RowAction::Icon);
pub const STAKEHOLDER_GROUPS: DeletePlan =
    DeletePlan::new(stakeholder_group::VIEW, "Name", RowAction::Icon);
pub const BUSINESS_SERVICES: DeletePlan =
    DeletePlan::new(business_service::VIEW, "Name", RowAction::Icon);
pub const TAG_TYPES: DeletePlan = DeletePlan::new(tag::VIEW, tag::TAG_TYPE_COLUMN, RowAction::Icon)
    .with_protected(DEFAULT_TAG_TYPES);
pub const APPLICATIONS: DeletePlan = DeletePlan::new(application::VIEW, "Name", RowAction::Kebab);
pub const CREDENTIALS: DeletePlan = DeletePlan::new(credentials::VIEW, "Name", RowAction::Button);

/// Delete every unprotected row of the plan's list view
///
/// Returns how many rows were deleted. An empty list returns at once.
#[instrument(skip_all, fields(path = plan.view.path))]
pub async fn delete_all(session: &Session, plan: &DeletePlan) -> TackleResult<usize> {
    plan.view.open(session).await?;
    let table = Table::main(session).with_key_column(plan.key_column);
    table.select_items_per_page(MAX_PER_PAGE).await?;
    if table.is_empty().await? {
        debug!(path = plan.view.path, "nothing to delete");
        return Ok(0);
    }
    let mut deleted = 0;
    while let Some(key) = next_deletable(&table, plan).await? {
        plan.action.delete(&table, &key).await?;
        session.confirm().await?;
        table.wait_row_gone(&key).await?;
        deleted += 1;
    }
    info!(path = plan.view.path, deleted, "deleted all rows");
    Ok(deleted)
}

async fn next_deletable(table: &Table<'_>, plan: &DeletePlan) -> TackleResult<Option<String>> {
    let session = table.session();
    let cell_css = Table::cell_css(plan.key_column);
    for row in table.rows().await? {
        let Some(cell) = session.query(Some(&row), &cell_css).await?.into_iter().next() else {
            continue;
        };
        let key = cell.text_trimmed();
        if !key.is_empty() && !plan.protected.contains(&key) {
            return Ok(Some(key.to_string()));
        }
    }
    Ok(None)
}

pub async fn delete_all_job_functions(session: &Session) -> TackleResult<usize> {
    delete_all(session, &JOB_FUNCTIONS).await
}

pub async fn delete_all_stakeholders(session: &Session) -> TackleResult<usize> {
    delete_all(session, &STAKEHOLDERS).await
}

pub async fn delete_all_stakeholder_groups(session: &Session) -> TackleResult<usize> {
    delete_all(session, &STAKEHOLDER_GROUPS).await
}

pub async fn delete_all_business_services(session: &Session) -> TackleResult<usize> {
    delete_all(session, &BUSINESS_SERVICES).await
}

/// Delete every tag type except the defaults
pub async fn delete_all_tag_types(session: &Session) -> TackleResult<usize> {
    delete_all(session, &TAG_TYPES).await
}

/// Delete non-default tags under the default tag types, then every other tag type
pub async fn delete_all_tags_and_tag_types(session: &Session) -> TackleResult<usize> {
    let mut deleted = 0;
    for tag_type in DEFAULT_TAG_TYPES {
        deleted += Tag::delete_matching(session, tag_type, |name| {
            !data::is_default_tag(tag_type, name)
        })
        .await?;
        Table::main(session).close_row_details(tag_type).await?;
    }
    deleted += delete_all_tag_types(session).await?;
    Ok(deleted)
}

pub async fn delete_application_table_rows(session: &Session) -> TackleResult<usize> {
    delete_all(session, &APPLICATIONS).await
}

pub async fn delete_all_credentials(session: &Session) -> TackleResult<usize> {
    delete_all(session, &CREDENTIALS).await
}
