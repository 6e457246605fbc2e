//! Selectors for the Tackle UI (PatternFly 4 markup).

// =============================================================================
// TABLE
// =============================================================================

/// The main list table
pub const APP_TABLE: &str = "table[aria-label=\"main-table\"]";
/// Root class of every PatternFly table
pub const TABLE: &str = ".pf-c-table";
/// Compact tables (copy-assessment dialogs)
pub const COMPACT_TABLE: &str = ".pf-c-table.pf-m-compact";
/// Detail rows that belong to the row above them
pub const EXPANDABLE_ROW_CLASS: &str = "pf-c-table__expandable-row";
/// Marker rendered after the table when it has no rows
pub const EMPTY_STATE_CLASS: &str = "pf-c-empty-state";
/// Row expand toggle
pub const EXPAND_ROW: &str = "button[aria-label=\"Details\"]";
/// Row inline delete icon
pub const DELETE_BUTTON: &str = "button[aria-label=\"delete\"]";
/// Row inline edit icon
pub const EDIT_BUTTON: &str = "button[aria-label=\"edit\"]";
/// Row kebab toggle
pub const ACTION_BUTTON: &str = "button[aria-label=\"Actions\"]";
/// Entries of an open row kebab menu
pub const KEBAB_MENU_ITEM: &str = "ul.pf-c-dropdown__menu > li > button";
/// Table data cell
pub const TD: &str = "td";
/// Table row
pub const TR: &str = "tr";
/// Generic button
pub const BUTTON: &str = "button";

// =============================================================================
// PAGINATION
// =============================================================================

/// Header container holding the top pagination
pub const DIV_HEADER: &str = "div.pf-c-toolbar__item.pf-m-pagination";
/// Per-page options menu
pub const ITEMS_PER_PAGE_MENU: &str = "div.pf-c-options-menu";
/// Per-page menu toggle
pub const ITEMS_PER_PAGE_TOGGLE: &str = "button.pf-c-options-menu__toggle";
/// Open per-page option list
pub const ITEMS_PER_PAGE_OPTIONS: &str = "ul.pf-c-options-menu__menu";
/// First-page control
pub const FIRST_PAGE_BUTTON: &str = "button[data-action=\"first\"]";
/// Previous-page control
pub const PREV_PAGE_BUTTON: &str = "button[data-action=\"previous\"]";
/// Next-page control
pub const NEXT_PAGE_BUTTON: &str = "button[data-action=\"next\"]";
/// Last-page control
pub const LAST_PAGE_BUTTON: &str = "button[data-action=\"last\"]";
/// Page number input
pub const PAGE_NUM_INPUT: &str = "input[aria-label=\"Current page\"]";

/// Per-page option button for size `n`
#[must_use]
pub fn per_page_option(n: usize) -> String {
    format!("li > button[data-action=\"per-page-{n}\"]")
}

// =============================================================================
// FILTERS
// =============================================================================

/// Visible filter toolbar group
pub const FILTER_GROUP: &str =
    "div.pf-c-toolbar__group.pf-m-toggle-group.pf-m-filter-group.pf-m-show";
/// Category dropdown, one per filter slot
pub const FILTER_DROPDOWN: &str = "div.pf-c-dropdown";
/// Open category menu
pub const FILTER_DROPDOWN_MENU: &str = "ul.pf-c-dropdown__menu";
/// Category entries inside the open menu
pub const FILTER_DROPDOWN_ITEM: &str = "a";
/// Text filter input, one per filter slot
pub const FILTER_INPUT: &str = "input[type=\"search\"]";
/// Submit button next to a text filter input
pub const SEARCH_BUTTON: &str = "button[aria-label=\"search button for search input\"]";
/// Option-list filter toggle
pub const FILTER_SELECT_TOGGLE: &str = "div.pf-c-select > div > button";
/// Input group holding option-list filters
pub const FILTER_INPUT_GROUP: &str = "div.pf-c-input-group";
/// Selectable option label inside an open option-list filter
pub const FILTER_SELECT_OPTION: &str = "div.pf-c-select__menu > fieldset > label > span";
/// Text of the clear-all control
pub const CLEAR_ALL_FILTERS: &str = "Clear all filters";

// =============================================================================
// FORMS, DIALOGS, ALERTS
// =============================================================================

/// Creation form
pub const CONTROLS_FORM: &str = "form";
/// Form submit
pub const SUBMIT_BUTTON: &str = "button[aria-label=\"submit\"]";
/// Form or dialog cancel
pub const CANCEL_BUTTON: &str = "button[aria-label=\"cancel\"]";
/// Confirm-dialog accept
pub const CONFIRM_BUTTON: &str = "#confirm-dialog-button";
/// Any open modal
pub const MODAL: &str = "div.pf-c-modal-box";
/// Option buttons inside an open form select
pub const SELECT_MENU_OPTION: &str = "ul.pf-c-select__menu button";
/// Success alert
pub const SUCCESS_ALERT: &str = "div.pf-c-alert.pf-m-success";
/// Text of the create button on most list pages
pub const CREATE_NEW: &str = "Create new";

// =============================================================================
// NAVIGATION
// =============================================================================

/// Sidebar links
pub const NAV_MENU: &str = "a.pf-c-nav__link";
/// Tab labels
pub const NAV_TAB: &str = "span.pf-c-tabs__item-text";
/// Perspective switcher
pub const PERSPECTIVE_TOGGLE: &str = "button.pf-c-context-selector__toggle";
/// Perspective entries
pub const PERSPECTIVE_ITEM: &str = "button.pf-c-context-selector__menu-list-item";
/// Masthead user dropdown
pub const USER_MENU_TOGGLE: &str = "div.pf-c-page__header-tools button.pf-c-dropdown__toggle";
/// Entries of the masthead user dropdown
pub const USER_MENU_ITEM: &str = "a.pf-c-dropdown__menu-item";

// =============================================================================
// LOGIN
// =============================================================================

/// Login user input
pub const LOGIN_USERNAME: &str = "#username";
/// Login password input
pub const LOGIN_PASSWORD: &str = "#password";
/// Login submit
pub const LOGIN_BUTTON: &str = "#kc-login";
/// Error shown when credentials are rejected
pub const LOGIN_ERROR: &str = "#input-error";
/// First-login new password
pub const NEW_PASSWORD: &str = "#password-new";
/// First-login password confirmation
pub const CONFIRM_PASSWORD: &str = "#password-confirm";
/// First-login submit
pub const CHANGE_PASSWORD_SUBMIT: &str = "#kc-submit";
