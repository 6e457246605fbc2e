//! Tag types and the tags listed under them.
//!
//! Tags have no list view of their own: they show in a compact table inside
//! the expanded row of their tag type, and are deleted from there.

use super::{created_alert, open_create_form, submit_and_expect};
use crate::data;
use crate::driver::ElementHandle;
use crate::lifecycle::{Creatable, Deletable, RowAction};
use crate::page_object::ListView;
use crate::result::{TackleError, TackleResult};
use crate::session::{Perspective, Session};
use crate::table::{Table, MAX_PER_PAGE};
use crate::views;
use crate::wait::wait_for;
use async_trait::async_trait;
use tracing::{debug, info};

/// Tags tab of the controls page
pub const VIEW: ListView =
    ListView::new("Controls", Perspective::Developer, "Controls", "/controls/tags")
        .with_tab("Tags");

/// Column holding the tag type name
pub const TAG_TYPE_COLUMN: &str = "Tag type";
/// Column of the compact tag table
pub const TAG_NAME_COLUMN: &str = "Tag name";

const CREATE_TAG: &str = "Create tag";
const CREATE_TAG_TYPE: &str = "Create tag type";
const COLOR_SELECT: &str = "#color-toggle";
const TAG_TYPE_SELECT: &str = "#tag-type-toggle";

/// A tag type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagType {
    pub name: String,
    pub rank: u32,
    pub color: Option<String>,
}

impl TagType {
    #[must_use]
    pub fn new(name: impl Into<String>, rank: u32) -> Self {
        Self {
            name: name.into(),
            rank,
            color: None,
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(data::unique_name("tagtype"), data::rank()).with_color(data::color())
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Names of the tags listed under the tag type `name`
    pub async fn tag_names(session: &Session, name: &str) -> TackleResult<Vec<String>> {
        let detail = open_tags_of(session, name).await?;
        let mut names = Vec::new();
        for row in tag_rows(session, &detail).await? {
            names.push(tag_name(session, &row).await?);
        }
        Ok(names)
    }
}

#[async_trait]
impl Creatable for TagType {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, CREATE_TAG_TYPE).await?;
        session.input_text("#name", &self.name).await?;
        session.input_text("#rank", &self.rank.to_string()).await?;
        if let Some(color) = &self.color {
            session.select_form_items(COLOR_SELECT, color).await?;
        }
        submit_and_expect(session, &created_alert(&self.name, "tag type")).await?;
        info!(name = %self.name, rank = self.rank, "created tag type");
        Ok(())
    }
}

#[async_trait]
impl Deletable for TagType {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        super::delete_row(session, &VIEW, &self.name, RowAction::Icon).await?;
        info!(name = %self.name, "deleted tag type");
        Ok(())
    }
}

/// A tag under a tag type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub tag_type: String,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, tag_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_type: tag_type.into(),
        }
    }

    /// Tag with a unique name under `tag_type`
    #[must_use]
    pub fn random(tag_type: impl Into<String>) -> Self {
        Self::new(data::unique_name("tag"), tag_type)
    }

    /// Delete every tag under `tag_type` for which `delete` holds
    ///
    /// Returns how many tags were deleted.
    pub async fn delete_matching<F>(
        session: &Session,
        tag_type: &str,
        delete: F,
    ) -> TackleResult<usize>
    where
        F: Fn(&str) -> bool + Send + Sync,
    {
        let mut deleted = 0;
        loop {
            let detail = open_tags_of(session, tag_type).await?;
            let mut target = None;
            for row in tag_rows(session, &detail).await? {
                let name = tag_name(session, &row).await?;
                if delete(&name) {
                    target = Some(name);
                    break;
                }
            }
            let Some(name) = target else {
                break;
            };
            delete_tag(session, tag_type, &name).await?;
            deleted += 1;
        }
        debug!(tag_type, deleted, "deleted matching tags");
        Ok(deleted)
    }
}

#[async_trait]
impl Creatable for Tag {
    async fn create(&self, session: &Session) -> TackleResult<()> {
        open_create_form(session, &VIEW, CREATE_TAG).await?;
        session.input_text("#name", &self.name).await?;
        session
            .select_form_items(TAG_TYPE_SELECT, &self.tag_type)
            .await?;
        submit_and_expect(session, &created_alert(&self.name, "tag")).await?;
        info!(name = %self.name, tag_type = %self.tag_type, "created tag");
        Ok(())
    }
}

#[async_trait]
impl Deletable for Tag {
    fn key(&self) -> &str {
        &self.name
    }

    async fn delete(&self, session: &Session) -> TackleResult<()> {
        delete_tag(session, &self.tag_type, &self.name).await?;
        info!(name = %self.name, tag_type = %self.tag_type, "deleted tag");
        Ok(())
    }
}

/// Open the tags tab with the row of `tag_type` expanded; returns its detail row
async fn open_tags_of(session: &Session, tag_type: &str) -> TackleResult<ElementHandle> {
    VIEW.open(session).await?;
    let table = Table::main(session);
    table.select_items_per_page(MAX_PER_PAGE).await?;
    table.expand_row_details(tag_type).await?;
    table.detail_row(tag_type).await?.ok_or_else(|| {
        TackleError::assertion(format!("tag type `{tag_type}` did not expand"))
    })
}

async fn tag_rows(session: &Session, detail: &ElementHandle) -> TackleResult<Vec<ElementHandle>> {
    let compact = format!("{} > tbody > tr", views::COMPACT_TABLE);
    session.query(Some(detail), &compact).await
}

async fn tag_name(session: &Session, row: &ElementHandle) -> TackleResult<String> {
    let cell = session
        .query(Some(row), &Table::cell_css(TAG_NAME_COLUMN))
        .await?;
    Ok(cell
        .first()
        .map(|c| c.text_trimmed().to_string())
        .unwrap_or_default())
}

async fn delete_tag(session: &Session, tag_type: &str, name: &str) -> TackleResult<()> {
    let detail = open_tags_of(session, tag_type).await?;
    let mut button = None;
    for row in tag_rows(session, &detail).await? {
        if tag_name(session, &row).await? == name {
            button = session
                .query(Some(&row), views::DELETE_BUTTON)
                .await?
                .into_iter()
                .next();
            break;
        }
    }
    let button = button.ok_or_else(|| {
        TackleError::not_found(
            format!("tag `{name}` under `{tag_type}`"),
            session.timeouts().lookup_ms,
        )
    })?;
    session.click_element(&button, true).await?;
    session.confirm().await?;
    wait_for(
        session.wait_options(session.timeouts().lookup_ms),
        &format!("tag `{name}` to disappear"),
        move || async move {
            let detail = open_tags_of(session, tag_type).await?;
            for row in tag_rows(session, &detail).await? {
                if tag_name(session, &row).await? == name {
                    return Ok(false);
                }
            }
            Ok(true)
        },
    )
    .await
    .map(|_| ())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;

    #[tokio::test]
    async fn test_tag_type_and_tag_round_trip() {
        let (fake, s) = logged_in().await;
        let tag_type = TagType::new("Messaging", 7).with_color("Blue");
        tag_type.create(&s).await.unwrap();
        let tag = Tag::new("Kafka", "Messaging");
        tag.create(&s).await.unwrap();
        assert_eq!(fake.tags_of("Messaging"), vec!["Kafka"]);
        assert_eq!(TagType::tag_names(&s, "Messaging").await.unwrap(), vec!["Kafka"]);

        tag.delete(&s).await.unwrap();
        assert!(fake.tags_of("Messaging").is_empty());
        tag_type.delete(&s).await.unwrap();
        assert!(!fake.keys(EntityKind::TagType).contains(&"Messaging".to_string()));
    }

    #[tokio::test]
    async fn test_delete_matching_keeps_others() {
        let (fake, s) = logged_in().await;
        fake.seed_tag("Language", "Cobra");
        fake.seed_tag("Language", "Crystal");
        let deleted =
            Tag::delete_matching(&s, "Language", |name| name.starts_with('C') && name.len() > 3)
                .await
                .unwrap();
        assert_eq!(deleted, 3);
        let left = fake.tags_of("Language");
        assert!(left.contains(&"Java".to_string()));
        assert!(!left.contains(&"COBOL".to_string()));
        assert!(left.contains(&"C++".to_string()));
    }
}
