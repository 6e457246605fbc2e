//! Toolbar filters of list views.
//!
//! A filter is applied in two steps: pick the category in the category
//! dropdown, then either type a search text or tick values in an option
//! list. Which of the two depends on the category.

use crate::result::TackleResult;
use crate::session::Session;
use crate::table::Table;
use crate::views;
use tracing::info;

/// Categories filtered by ticking values in an option list
pub const SELECTABLE_FILTERS: &[&str] = &["Business service", "Tag"];

/// Filter category names used across list views
pub mod category {
    pub const NAME: &str = "Name";
    pub const DESCRIPTION: &str = "Description";
    pub const BUSINESS_SERVICE: &str = "Business service";
    pub const TAG: &str = "Tag";
    pub const OWNER: &str = "Owner";
    pub const EMAIL: &str = "Email";
    pub const DISPLAY_NAME: &str = "Display name";
    pub const TAG_TYPE: &str = "Tag type";
}

/// Which copy of the toolbar controls a filter is applied through
///
/// Views with two filter toolbars (copy-assessment dialogs) expose the
/// second set of inputs at index 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSlot {
    /// Index of the category dropdown
    pub dropdown: usize,
    /// Index of the text input and its search button
    pub input: usize,
}

impl FilterSlot {
    /// Slot for a toolbar; `identified_risk` selects the second text input
    #[must_use]
    pub const fn new(identified_risk: bool, dropdown: usize) -> Self {
        Self {
            dropdown,
            input: if identified_risk { 1 } else { 0 },
        }
    }

    /// Whether `category` is filtered through an option list
    #[must_use]
    pub fn is_selectable(category: &str) -> bool {
        SELECTABLE_FILTERS.contains(&category)
    }
}

fn in_filter_group(css: &str) -> String {
    format!("{} {css}", views::FILTER_GROUP)
}

/// Pick a category in the category dropdown
pub async fn select_filter(
    session: &Session,
    category: &str,
    slot: FilterSlot,
) -> TackleResult<()> {
    let dropdown = session
        .first(&session.lookup(&in_filter_group(views::FILTER_DROPDOWN)).nth(slot.dropdown))
        .await?;
    let toggle = session
        .first_in(Some(&dropdown), &session.command(views::BUTTON))
        .await?;
    session.click_element(&toggle, true).await?;
    session
        .click_by_exact_text(
            &format!("{} {}", views::FILTER_DROPDOWN_MENU, views::FILTER_DROPDOWN_ITEM),
            category,
        )
        .await
}

/// Filter the current list view by `category`
///
/// Text categories type each value and submit it; option categories open
/// the option list once and tick each value by exact text. The table is
/// left settled.
pub async fn apply_search_filter(
    session: &Session,
    category: &str,
    values: &[&str],
    slot: FilterSlot,
) -> TackleResult<()> {
    select_filter(session, category, slot).await?;
    if FilterSlot::is_selectable(category) {
        let toggle = session
            .first(
                &session
                    .command(&in_filter_group(views::FILTER_SELECT_TOGGLE))
                    .nth(slot.dropdown),
            )
            .await?;
        session.click_element(&toggle, true).await?;
        for value in values {
            session
                .click_by_exact_text(views::FILTER_SELECT_OPTION, value)
                .await?;
        }
    } else {
        for value in values {
            let input = session
                .first(&session.lookup(&in_filter_group(views::FILTER_INPUT)).nth(slot.input))
                .await?;
            session.fill(&input, value).await?;
            let search = session
                .first(&session.command(&in_filter_group(views::SEARCH_BUTTON)).nth(slot.input))
                .await?;
            session.click_element(&search, true).await?;
        }
    }
    info!(category, ?values, "filter applied");
    Table::main(session).wait_until_settled().await
}

/// Remove every applied filter
pub async fn clear_all_filters(session: &Session) -> TackleResult<()> {
    session
        .click_by_text(views::BUTTON, views::CLEAR_ALL_FILTERS)
        .await?;
    Table::main(session).wait_until_settled().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::testing::logged_in;
    use crate::mock::EntityKind;

    #[test]
    fn test_slot_from_risk_flag() {
        assert_eq!(FilterSlot::default(), FilterSlot::new(false, 0));
        assert_eq!(FilterSlot::new(true, 1), FilterSlot { dropdown: 1, input: 1 });
        assert!(FilterSlot::is_selectable(category::TAG));
        assert!(!FilterSlot::is_selectable(category::NAME));
    }

    #[tokio::test]
    async fn test_text_filter_narrows_rows() {
        let (fake, s) = logged_in().await;
        for name in ["billing", "shipping", "billing-reports"] {
            fake.seed(EntityKind::Application, &[("name", name)]);
        }
        apply_search_filter(&s, category::NAME, &["billing"], FilterSlot::default())
            .await
            .unwrap();
        let names = Table::main(&s).cell_values_on_page("Name").await.unwrap();
        assert_eq!(names, vec!["billing", "billing-reports"]);
    }

    #[tokio::test]
    async fn test_option_filter_is_exact() {
        let (fake, s) = logged_in().await;
        fake.seed(EntityKind::BusinessService, &[("name", "retail")]);
        fake.seed(EntityKind::BusinessService, &[("name", "retail-eu")]);
        fake.seed(EntityKind::Application, &[("name", "till"), ("business", "retail")]);
        fake.seed(EntityKind::Application, &[("name", "eu-till"), ("business", "retail-eu")]);
        apply_search_filter(
            &s,
            category::BUSINESS_SERVICE,
            &["retail"],
            FilterSlot::default(),
        )
        .await
        .unwrap();
        let names = Table::main(&s).cell_values_on_page("Name").await.unwrap();
        assert_eq!(names, vec!["till"]);
    }

    #[tokio::test]
    async fn test_clear_all_restores_rows() {
        let (fake, s) = logged_in().await;
        for name in ["alpha", "beta"] {
            fake.seed(EntityKind::Application, &[("name", name)]);
        }
        apply_search_filter(&s, category::NAME, &["alpha"], FilterSlot::default())
            .await
            .unwrap();
        assert_eq!(Table::main(&s).row_count().await.unwrap(), 1);
        clear_all_filters(&s).await.unwrap();
        assert_eq!(Table::main(&s).row_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_category_fails_lookup() {
        let (_fake, s) = logged_in().await;
        let err = apply_search_filter(&s, "Colour", &["red"], FilterSlot::default())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::result::TackleError::ElementNotFound { .. }));
    }
}
