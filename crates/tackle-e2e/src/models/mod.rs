//! Page objects for the Tackle entities used as fixtures.
//!
//! Each entity carries only the fields needed to create, find and delete it,
//! knows the list view it lives in, and implements
//! [`Creatable`](crate::lifecycle::Creatable) and
//! [`Deletable`](crate::lifecycle::Deletable) so the bulk lifecycle helpers
//! can drive it.

pub mod application;
pub mod business_service;
pub mod credentials;
pub mod job_function;
pub mod proxy;
pub mod stakeholder;
pub mod stakeholder_group;
pub mod tag;

pub use application::Application;
pub use business_service::BusinessService;
pub use credentials::{CredentialKind, Credentials};
pub use job_function::JobFunction;
pub use proxy::{Proxy, ProxyScheme};
pub use stakeholder::Stakeholder;
pub use stakeholder_group::StakeholderGroup;
pub use tag::{Tag, TagType};

use crate::lifecycle::RowAction;
use crate::page_object::ListView;
use crate::result::TackleResult;
use crate::session::Session;
use crate::table::{Table, MAX_PER_PAGE};
use crate::views;

/// Alert text shown after a create form is accepted
#[must_use]
pub fn created_alert(key: &str, noun: &str) -> String {
    format!("Success! {key} was added as a(n) {noun}.")
}

/// Alert text shown after an edit form is accepted
#[must_use]
pub fn saved_alert(key: &str, noun: &str) -> String {
    format!("Success! {key} was saved as a(n) {noun}.")
}

/// Open `view` and click the create button labelled `button`
pub(crate) async fn open_create_form(
    session: &Session,
    view: &ListView,
    button: &str,
) -> TackleResult<()> {
    view.open(session).await?;
    session.wait_until_idle().await?;
    session.click_by_exact_text(views::BUTTON, button).await
}

/// Open the edit form of the row keyed by `key`
pub(crate) async fn open_edit_form(
    session: &Session,
    view: &ListView,
    key: &str,
    action: RowAction,
) -> TackleResult<()> {
    view.open(session).await?;
    session.wait_until_idle().await?;
    let table = Table::main(session);
    table.select_items_per_page(MAX_PER_PAGE).await?;
    match action {
        RowAction::Icon | RowAction::Kebab => {
            table.perform_row_action_by_icon(key, views::EDIT_BUTTON).await
        }
        RowAction::Button => table.perform_row_action(key, "Edit").await,
    }
}

/// Submit the open form, wait for it to close and for `alert`
pub(crate) async fn submit_and_expect(session: &Session, alert: &str) -> TackleResult<()> {
    session.submit_form().await?;
    session.wait_until_idle().await?;
    session.check_success_alert(views::SUCCESS_ALERT, alert).await
}

/// Pick each of `items` in a form select
pub(crate) async fn select_all(
    session: &Session,
    toggle: &str,
    items: &[String],
) -> TackleResult<()> {
    for item in items {
        session.select_form_items(toggle, item).await?;
    }
    Ok(())
}

/// Delete the row keyed by `key` in `view` and wait until it is gone
pub(crate) async fn delete_row(
    session: &Session,
    view: &ListView,
    key: &str,
    action: RowAction,
) -> TackleResult<()> {
    view.open(session).await?;
    let table = Table::main(session);
    table.select_items_per_page(MAX_PER_PAGE).await?;
    action.delete(&table, key).await?;
    session.confirm().await?;
    table.wait_row_gone(key).await
}
