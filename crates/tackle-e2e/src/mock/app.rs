//! In-process fake of the Tackle UI.

use super::dom::{Dom, Ui};
use super::model::{tag_form, Chip, EntityKind, Field, Model};
use super::render;
use crate::config::{TackleConfig, Timeouts};
use crate::driver::{Cookie, ElementHandle, Key, TackleDriver};
use crate::result::{TackleError, TackleResult};
use crate::session::{Perspective, DEFAULT_PRESERVED_COOKIE};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Origin served by the fake
pub const BASE_URL: &str = "http://tackle.fake";

const USERNAME: &str = "admin";
const INITIAL_PASSWORD: &str = "password";
const DEFAULT_PER_PAGE: usize = 10;

/// One proxy scheme as saved on the proxy page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyEntry {
    /// Proxy switched on
    pub enabled: bool,
    /// Host
    pub host: String,
    /// Port
    pub port: String,
    /// Authentication required
    pub identity_required: bool,
    /// Proxy credential name
    pub credentials: Option<String>,
}

/// Saved proxy configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySnapshot {
    /// HTTP proxy
    pub http: ProxyEntry,
    /// HTTPS proxy
    pub https: ProxyEntry,
    /// Hosts bypassing the proxy
    pub excluded: Vec<String>,
}

impl ProxySnapshot {
    pub(crate) fn entry(&self, scheme: &str) -> &ProxyEntry {
        if scheme == "https" {
            &self.https
        } else {
            &self.http
        }
    }

    fn entry_mut(&mut self, scheme: &str) -> &mut ProxyEntry {
        if scheme == "https" {
            &mut self.https
        } else {
            &mut self.http
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ListState {
    pub page: usize,
    pub per_page: usize,
    pub sort: Option<(String, bool)>,
    pub chips: Vec<Chip>,
    pub category: usize,
    pub category_open: bool,
    pub per_page_open: bool,
    pub filter_select_open: bool,
    pub expanded: BTreeSet<u64>,
    pub kebab_open: Option<u64>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            chips: Vec::new(),
            category: 0,
            category_open: false,
            per_page_open: false,
            filter_select_open: false,
            expanded: BTreeSet::new(),
            kebab_open: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Record(u64),
    Tag { parent: u64, tag: u64 },
}

#[derive(Debug, Clone)]
pub(crate) enum Modal {
    Form {
        form: &'static str,
        editing: Option<u64>,
        open_select: Option<String>,
        selections: BTreeMap<String, Vec<String>>,
        error: Option<String>,
    },
    Confirm {
        kind: EntityKind,
        target: Target,
        key: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Alert {
    pub success: bool,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FormTarget {
    Kind(EntityKind),
    Tag,
}

/// What a creation form writes
#[derive(Debug, Clone)]
pub(crate) struct FormSpec {
    pub noun: &'static str,
    /// Id of the field that must be filled before submitting
    pub key: &'static str,
    pub target: FormTarget,
    pub fields: Vec<Field>,
}

pub(crate) fn form_spec(form: &str) -> Option<FormSpec> {
    if form == "tag" {
        return Some(FormSpec {
            noun: "tag",
            key: "name",
            target: FormTarget::Tag,
            fields: tag_form(),
        });
    }
    let kind = EntityKind::from_form(form)?;
    let layout = kind.layout();
    Some(FormSpec {
        noun: layout.noun,
        key: layout.key_field,
        target: FormTarget::Kind(kind),
        fields: layout.form,
    })
}

#[derive(Debug)]
pub(crate) struct State {
    pub model: Model,
    pub path: String,
    pub password: String,
    pub require_change: bool,
    pub pending_change: bool,
    pub login_error: bool,
    token: Option<String>,
    cookies: Vec<Cookie>,
    pub perspective: Perspective,
    pub perspective_open: bool,
    pub user_menu_open: bool,
    pub list: ListState,
    pub modal: Option<Modal>,
    pub alert: Option<Alert>,
    pub values: HashMap<String, String>,
    pub proxy: ProxySnapshot,
    pub proxy_draft: ProxySnapshot,
    pub proxy_select_open: Option<&'static str>,
    rejects: HashSet<String>,
    history: Vec<String>,
    dom: Dom,
}

impl Default for State {
    fn default() -> Self {
        let mut state = Self {
            model: Model::seeded(),
            path: "/".to_string(),
            password: INITIAL_PASSWORD.to_string(),
            require_change: false,
            pending_change: false,
            login_error: false,
            token: None,
            cookies: Vec::new(),
            perspective: Perspective::Developer,
            perspective_open: false,
            user_menu_open: false,
            list: ListState::default(),
            modal: None,
            alert: None,
            values: HashMap::new(),
            proxy: ProxySnapshot::default(),
            proxy_draft: ProxySnapshot::default(),
            proxy_select_open: None,
            rejects: HashSet::new(),
            history: Vec::new(),
            dom: Dom::default(),
        };
        state.values.insert("page".into(), "1".into());
        state.render();
        state
    }
}

impl State {
    pub fn logged_in(&self) -> bool {
        self.token.as_ref().is_some_and(|token| {
            self.cookies
                .iter()
                .any(|c| c.name == DEFAULT_PRESERVED_COOKIE && &c.value == token)
        })
    }

    pub fn value(&self, slot: &str) -> String {
        self.values.get(slot).cloned().unwrap_or_default()
    }

    pub fn current_kind(&self) -> Option<EntityKind> {
        EntityKind::from_path(&self.path)
    }

    fn render(&mut self) {
        let root = render::render(self);
        self.dom = Dom::build(root, &self.values);
    }

    fn resolve(&self, element: &ElementHandle) -> TackleResult<usize> {
        self.dom
            .lookup(&element.id)
            .ok_or_else(|| TackleError::StaleElement {
                id: element.id.clone(),
            })
    }

    fn submit_action(&self, idx: usize) -> Option<Ui> {
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = self.dom.node(i);
            if let Some(action) = &node.on_submit {
                return Some(action.clone());
            }
            current = node.parent;
        }
        None
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    fn go(&mut self, path: &str) {
        let path = match path {
            "/" if self.logged_in() => "/applications",
            "/controls" => "/controls/stakeholders",
            other => other,
        };
        self.history.push(format!("navigate {path}"));
        self.path = path.to_string();
        self.list = ListState::default();
        self.modal = None;
        self.alert = None;
        self.perspective_open = false;
        self.user_menu_open = false;
        self.proxy_select_open = None;
        self.values.insert("page".into(), "1".into());
        self.values.remove("filter:text");
        if path == "/proxies" {
            self.load_proxy_draft();
        }
    }

    fn load_proxy_draft(&mut self) {
        self.proxy_draft = self.proxy.clone();
        for scheme in ["http", "https"] {
            let entry = self.proxy.entry(scheme).clone();
            self.values.insert(format!("proxy:{scheme}Host"), entry.host);
            self.values.insert(format!("proxy:{scheme}Port"), entry.port);
        }
        self.values
            .insert("proxy:excluded".into(), self.proxy.excluded.join(", "));
    }

    fn submit_login(&mut self) {
        let user = self.value("login:username");
        let password = self.value("login:password");
        if user == USERNAME && password == self.password {
            self.login_error = false;
            if self.require_change {
                self.pending_change = true;
            } else {
                self.start_session();
            }
        } else {
            self.login_error = true;
        }
    }

    fn change_password(&mut self) {
        let new = self.value("login:new");
        if !self.pending_change || new.is_empty() || new != self.value("login:confirm") {
            return;
        }
        self.password = new;
        self.require_change = false;
        self.start_session();
    }

    fn start_session(&mut self) {
        let token = uuid::Uuid::new_v4().to_string();
        self.cookies.retain(|c| c.name != DEFAULT_PRESERVED_COOKIE);
        self.cookies
            .push(Cookie::new(DEFAULT_PRESERVED_COOKIE, token.clone()));
        self.token = Some(token);
        self.pending_change = false;
        self.values.retain(|slot, _| !slot.starts_with("login:"));
        let target = self.path.clone();
        self.go(&target);
    }

    fn logout(&mut self) {
        self.token = None;
        self.cookies.retain(|c| c.name != DEFAULT_PRESERVED_COOKIE);
        self.values.retain(|slot, _| !slot.starts_with("login:"));
        self.go("/");
    }

    // =========================================================================
    // LIST STATE
    // =========================================================================

    fn last_page(&self) -> usize {
        self.current_kind().map_or(1, |kind| {
            let total = self
                .model
                .visible(kind, &self.list.chips, self.list.sort.as_ref())
                .len();
            total.div_ceil(self.list.per_page).max(1)
        })
    }

    fn set_page(&mut self, page: usize) {
        self.list.page = page.clamp(1, self.last_page());
        self.values
            .insert("page".into(), self.list.page.to_string());
    }

    fn close_menus(&mut self) {
        self.perspective_open = false;
        self.user_menu_open = false;
        self.list.category_open = false;
        self.list.per_page_open = false;
        self.list.filter_select_open = false;
        self.list.kebab_open = None;
        self.proxy_select_open = None;
        if let Some(Modal::Form { open_select, .. }) = &mut self.modal {
            *open_select = None;
        }
    }

    fn sort_by(&mut self, label: String) {
        self.list.sort = match self.list.sort.take() {
            Some((current, ascending)) if current == label => Some((current, !ascending)),
            _ => Some((label, true)),
        };
    }

    fn pick_category(&mut self, label: &str) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        if let Some(i) = kind.layout().filters.iter().position(|f| f.label == label) {
            self.list.category = i;
        }
        self.list.category_open = false;
        self.list.filter_select_open = false;
        self.values.remove("filter:text");
    }

    fn search(&mut self) {
        let text = self.value("filter:text").trim().to_string();
        self.values.remove("filter:text");
        if text.is_empty() {
            return;
        }
        let chip = (self.list.category, text);
        if !self.list.chips.contains(&chip) {
            self.list.chips.push(chip);
        }
        self.set_page(1);
    }

    fn toggle_filter_value(&mut self, value: String) {
        let chip = (self.list.category, value);
        match self.list.chips.iter().position(|c| *c == chip) {
            Some(pos) => {
                self.list.chips.remove(pos);
            }
            None => self.list.chips.push(chip),
        }
        self.set_page(1);
    }

    // =========================================================================
    // FORMS AND DIALOGS
    // =========================================================================

    fn open_form(&mut self, form: &'static str) {
        let Some(spec) = form_spec(form) else {
            return;
        };
        for field in &spec.fields {
            self.values.remove(&format!("form:{}", field.id));
        }
        self.alert = None;
        self.modal = Some(Modal::Form {
            form,
            editing: None,
            open_select: None,
            selections: BTreeMap::new(),
            error: None,
        });
    }

    fn open_edit(&mut self, id: u64) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let layout = kind.layout();
        let Some(record) = self.model.find(kind, id).cloned() else {
            return;
        };
        let mut selections = BTreeMap::new();
        for field in &layout.form {
            match (field.options, field.multi) {
                (None, _) => {
                    self.values.insert(
                        format!("form:{}", field.id),
                        record.field(field.store).to_string(),
                    );
                }
                (Some(_), false) => {
                    let value = record.field(field.store);
                    if !value.is_empty() {
                        selections.insert(field.id.to_string(), vec![value.to_string()]);
                    }
                }
                (Some(_), true) => {
                    selections.insert(field.id.to_string(), record.list(field.store).to_vec());
                }
            }
        }
        self.list.kebab_open = None;
        self.alert = None;
        self.modal = Some(Modal::Form {
            form: layout.form_id,
            editing: Some(id),
            open_select: None,
            selections,
            error: None,
        });
    }

    fn ask_delete(&mut self, target: Target) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let key = match target {
            Target::Record(id) => self
                .model
                .find(kind, id)
                .map(|r| r.field(kind.layout().key_field).to_string()),
            Target::Tag { parent, tag } => self.model.find(kind, parent).and_then(|p| {
                p.children
                    .iter()
                    .find(|c| c.id == tag)
                    .map(|c| c.field("name").to_string())
            }),
        };
        let Some(key) = key else {
            return;
        };
        self.list.kebab_open = None;
        self.modal = Some(Modal::Confirm { kind, target, key });
    }

    fn toggle_form_select(&mut self, field: String) {
        if let Some(Modal::Form { open_select, .. }) = &mut self.modal {
            *open_select = match open_select.take() {
                Some(open) if open == field => None,
                _ => Some(field),
            };
        }
    }

    fn pick_form_option(&mut self, field: String, option: String) {
        let Some(Modal::Form {
            form,
            open_select,
            selections,
            ..
        }) = &mut self.modal
        else {
            return;
        };
        let multi = form_spec(*form)
            .and_then(|spec| spec.fields.into_iter().find(|f| f.id == field))
            .is_some_and(|f| f.multi);
        let chosen = selections.entry(field).or_default();
        if multi {
            match chosen.iter().position(|c| *c == option) {
                Some(pos) => {
                    chosen.remove(pos);
                }
                None => chosen.push(option),
            }
        } else {
            *chosen = vec![option];
        }
        *open_select = None;
    }

    fn set_form_error(&mut self, message: String) {
        if let Some(Modal::Form { error, .. }) = &mut self.modal {
            *error = Some(message);
        }
    }

    fn submit_form(&mut self) {
        let Some(Modal::Form {
            form,
            editing,
            selections,
            ..
        }) = self.modal.clone()
        else {
            return;
        };
        let Some(spec) = form_spec(form) else {
            return;
        };
        let key = self.value(&format!("form:{}", spec.key)).trim().to_string();
        if key.is_empty() {
            return;
        }

        let mut fields: Vec<(&str, String)> = Vec::new();
        let mut lists: Vec<(&str, Vec<String>)> = Vec::new();
        for field in &spec.fields {
            match (field.options, field.multi) {
                (None, _) => fields.push((
                    field.store,
                    self.value(&format!("form:{}", field.id)).trim().to_string(),
                )),
                (Some(_), false) => fields.push((
                    field.store,
                    selections
                        .get(field.id)
                        .and_then(|v| v.first())
                        .cloned()
                        .unwrap_or_default(),
                )),
                (Some(_), true) => lists.push((
                    field.store,
                    selections.get(field.id).cloned().unwrap_or_default(),
                )),
            }
        }

        match spec.target {
            FormTarget::Tag => {
                let parent = fields
                    .iter()
                    .find(|(store, _)| *store == "tag-type")
                    .and_then(|(_, name)| self.model.find_by_key(EntityKind::TagType, name))
                    .map(|r| r.id);
                let Some(parent) = parent else {
                    self.set_form_error("A tag type is required".to_string());
                    return;
                };
                self.model.add_child(parent, &key);
            }
            FormTarget::Kind(kind) => {
                let existing = self.model.find_by_key(kind, &key).map(|r| r.id);
                if existing.is_some() && existing != editing {
                    self.set_form_error(format!("A {} with this name already exists", spec.noun));
                    return;
                }
                match editing {
                    Some(id) => {
                        if let Some(record) = self.model.find_mut(kind, id) {
                            for (store, value) in fields {
                                record.fields.insert(store.to_string(), value);
                            }
                            for (store, values) in lists {
                                record.lists.insert(store.to_string(), values);
                            }
                        }
                    }
                    None => {
                        self.model.insert(kind, &fields, &lists);
                    }
                }
            }
        }

        let verb = if editing.is_some() { "saved" } else { "added" };
        self.history.push(format!("{verb} {} {key}", spec.noun));
        self.modal = None;
        self.alert = Some(Alert {
            success: true,
            text: format!("Success! {key} was {verb} as a(n) {}.", spec.noun),
        });
        let page = self.list.page;
        self.set_page(page);
    }

    fn confirm(&mut self) {
        let Some(Modal::Confirm { kind, target, key }) = self.modal.take() else {
            return;
        };
        if self.rejects.contains(&key) {
            self.history.push(format!("rejected delete {key}"));
            self.alert = Some(Alert {
                success: false,
                text: format!("Error! {key} could not be deleted."),
            });
            return;
        }
        match target {
            Target::Record(id) => {
                self.model.remove(kind, id);
                self.list.expanded.remove(&id);
            }
            Target::Tag { parent, tag } => {
                self.model.remove_child(parent, tag);
            }
        }
        self.history.push(format!("deleted {key}"));
        self.alert = Some(Alert {
            success: true,
            text: format!("Success! {key} was deleted."),
        });
        let page = self.list.page;
        self.set_page(page);
    }

    fn save_proxy(&mut self) {
        let mut saved = self.proxy_draft.clone();
        for scheme in ["http", "https"] {
            let host = self.value(&format!("proxy:{scheme}Host"));
            let port = self.value(&format!("proxy:{scheme}Port"));
            let entry = saved.entry_mut(scheme);
            entry.host = host.trim().to_string();
            entry.port = port.trim().to_string();
            if !entry.identity_required {
                entry.credentials = None;
            }
        }
        saved.excluded = self
            .value("proxy:excluded")
            .split([',', '\n'])
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect();
        self.proxy = saved;
        self.history.push("saved proxy".to_string());
        self.alert = Some(Alert {
            success: true,
            text: "Success! Proxy settings were saved.".to_string(),
        });
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    fn dispatch(&mut self, action: Ui) {
        debug!(?action, "fake ui event");
        self.history.push(format!("{action:?}"));
        match action {
            Ui::Login => self.submit_login(),
            Ui::ChangePassword => self.change_password(),
            Ui::ToggleUserMenu => self.user_menu_open = !self.user_menu_open,
            Ui::Logout => self.logout(),
            Ui::TogglePerspectiveMenu => self.perspective_open = !self.perspective_open,
            Ui::SelectPerspective(label) => {
                self.perspective = if label == Perspective::Administrator.label() {
                    Perspective::Administrator
                } else {
                    Perspective::Developer
                };
                self.perspective_open = false;
            }
            Ui::Nav(path) | Ui::Tab(path) => self.go(path),
            Ui::TogglePerPage => self.list.per_page_open = !self.list.per_page_open,
            Ui::PerPage(n) => {
                self.list.per_page = n;
                self.list.per_page_open = false;
                self.set_page(1);
            }
            Ui::FirstPage => self.set_page(1),
            Ui::PrevPage => {
                let page = self.list.page.saturating_sub(1);
                self.set_page(page);
            }
            Ui::NextPage => {
                let page = self.list.page + 1;
                self.set_page(page);
            }
            Ui::LastPage => {
                let last = self.last_page();
                self.set_page(last);
            }
            Ui::GoToTypedPage => match self.value("page").trim().parse::<usize>() {
                Ok(page) => self.set_page(page),
                Err(_) => {
                    let page = self.list.page;
                    self.set_page(page);
                }
            },
            Ui::Sort(label) => self.sort_by(label),
            Ui::ToggleCategoryMenu => self.list.category_open = !self.list.category_open,
            Ui::PickCategory(label) => self.pick_category(&label),
            Ui::Search => self.search(),
            Ui::ToggleFilterSelect => {
                self.list.filter_select_open = !self.list.filter_select_open;
            }
            Ui::ToggleFilterValue(value) => self.toggle_filter_value(value),
            Ui::ClearFilters => {
                self.list.chips.clear();
                self.set_page(1);
            }
            Ui::CreateNew(form) => self.open_form(form),
            Ui::OpenEdit(id) => self.open_edit(id),
            Ui::AskDelete(id) => self.ask_delete(Target::Record(id)),
            Ui::AskDeleteChild(parent, tag) => self.ask_delete(Target::Tag { parent, tag }),
            Ui::ToggleKebab(id) => {
                self.list.kebab_open = if self.list.kebab_open == Some(id) {
                    None
                } else {
                    Some(id)
                };
            }
            Ui::ToggleExpand(id) => {
                if !self.list.expanded.remove(&id) {
                    self.list.expanded.insert(id);
                }
            }
            Ui::ToggleFormSelect(field) => self.toggle_form_select(field),
            Ui::PickFormOption(field, option) => self.pick_form_option(field, option),
            Ui::SubmitForm => self.submit_form(),
            Ui::CancelModal => self.modal = None,
            Ui::Confirm => self.confirm(),
            Ui::ToggleProxy(scheme) => {
                let entry = self.proxy_draft.entry_mut(scheme);
                entry.enabled = !entry.enabled;
            }
            Ui::ToggleIdentity(scheme) => {
                let entry = self.proxy_draft.entry_mut(scheme);
                entry.identity_required = !entry.identity_required;
            }
            Ui::ToggleProxyCredentials(scheme) => {
                self.proxy_select_open = if self.proxy_select_open == Some(scheme) {
                    None
                } else {
                    Some(scheme)
                };
            }
            Ui::PickProxyCredential(scheme, name) => {
                self.proxy_draft.entry_mut(scheme).credentials = Some(name);
                self.proxy_select_open = None;
            }
            Ui::SaveProxy => self.save_proxy(),
        }
    }
}

// =============================================================================
// FAKE DRIVER
// =============================================================================

/// Fake Tackle application driven through [`TackleDriver`]
///
/// Seeded with the default tag types. Log in as `admin` / `password`.
#[derive(Debug, Default)]
pub struct FakeTackle {
    state: Mutex<State>,
}

impl FakeTackle {
    /// Fresh application, logged out
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a new password on the first successful login
    #[must_use]
    pub fn require_password_change(self) -> Self {
        self.lock().require_change = true;
        self
    }

    /// Configuration pointing at the fake with short wait windows
    #[must_use]
    pub fn config(&self) -> TackleConfig {
        TackleConfig::new()
            .with_base_url(BASE_URL)
            .with_login(USERNAME, INITIAL_PASSWORD)
            .with_timeouts(Timeouts::fast())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.lock();
        let out = f(&mut state);
        state.render();
        out
    }

    /// Insert a record directly, returning its id
    pub fn seed(&self, kind: EntityKind, fields: &[(&str, &str)]) -> u64 {
        let fields: Vec<(&str, String)> =
            fields.iter().map(|(k, v)| (*k, (*v).to_string())).collect();
        self.mutate(|state| state.model.insert(kind, &fields, &[]))
    }

    /// Insert a tag under an existing tag type
    pub fn seed_tag(&self, tag_type: &str, name: &str) -> bool {
        self.mutate(|state| {
            let parent = state
                .model
                .find_by_key(EntityKind::TagType, tag_type)
                .map(|r| r.id);
            parent.and_then(|p| state.model.add_child(p, name)).is_some()
        })
    }

    /// Business keys of every record of `kind`, in insertion order
    pub fn keys(&self, kind: EntityKind) -> Vec<String> {
        self.lock().model.keys(kind)
    }

    /// Tag names under a tag type
    pub fn tags_of(&self, tag_type: &str) -> Vec<String> {
        self.lock()
            .model
            .find_by_key(EntityKind::TagType, tag_type)
            .map(|r| r.children.iter().map(|c| c.field("name").to_string()).collect())
            .unwrap_or_default()
    }

    /// A stored field of the record with business key `key`
    pub fn record_field(&self, kind: EntityKind, key: &str, field: &str) -> Option<String> {
        self.lock()
            .model
            .find_by_key(kind, key)
            .map(|r| r.field(field).to_string())
    }

    /// A stored list of the record with business key `key`
    pub fn record_list(&self, kind: EntityKind, key: &str, list: &str) -> Vec<String> {
        self.lock()
            .model
            .find_by_key(kind, key)
            .map(|r| r.list(list).to_vec())
            .unwrap_or_default()
    }

    /// Saved proxy configuration
    pub fn proxy(&self) -> ProxySnapshot {
        self.lock().proxy.clone()
    }

    /// Make confirmed deletions of `key` fail with an error alert
    pub fn reject_deletes_of(&self, key: &str) {
        self.lock().rejects.insert(key.to_string());
    }

    /// Whether a login session cookie is active
    pub fn is_logged_in(&self) -> bool {
        self.lock().logged_in()
    }

    /// Every navigation, UI event and data change so far
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Whether any history entry contains `fragment`
    pub fn was_called(&self, fragment: &str) -> bool {
        self.lock().history.iter().any(|h| h.contains(fragment))
    }
}

#[async_trait]
impl TackleDriver for FakeTackle {
    async fn navigate(&self, url: &str) -> TackleResult<()> {
        let rest = url.strip_prefix(BASE_URL).ok_or_else(|| TackleError::Navigation {
            url: url.to_string(),
            message: format!("fake only serves {BASE_URL}"),
        })?;
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        let path = if path.is_empty() { "/" } else { path };
        self.mutate(|state| state.go(path));
        Ok(())
    }

    async fn current_url(&self) -> TackleResult<String> {
        Ok(format!("{BASE_URL}{}", self.lock().path))
    }

    async fn query_all(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> TackleResult<Vec<ElementHandle>> {
        let state = self.lock();
        let scope = scope.map(|s| state.resolve(s)).transpose()?;
        Ok(state
            .dom
            .query(scope, selector)?
            .into_iter()
            .map(|idx| state.dom.snapshot(idx))
            .collect())
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> TackleResult<Option<ElementHandle>> {
        let state = self.lock();
        let idx = state.resolve(element)?;
        Ok(state
            .dom
            .closest(idx, selector)?
            .map(|i| state.dom.snapshot(i)))
    }

    async fn next_sibling(&self, element: &ElementHandle) -> TackleResult<Option<ElementHandle>> {
        let state = self.lock();
        let idx = state.resolve(element)?;
        Ok(state.dom.next_sibling(idx).map(|i| state.dom.snapshot(i)))
    }

    async fn refresh(&self, element: &ElementHandle) -> TackleResult<ElementHandle> {
        let state = self.lock();
        let idx = state.resolve(element)?;
        Ok(state.dom.snapshot(idx))
    }

    async fn click(&self, element: &ElementHandle, force: bool) -> TackleResult<()> {
        let mut state = self.lock();
        let idx = state.resolve(element)?;
        if state.dom.node(idx).disabled {
            if force {
                debug!(id = %element.id, "forced click on a disabled element ignored");
                return Ok(());
            }
            return Err(TackleError::NotActionable {
                selector: element.id.clone(),
                reason: "element is disabled".to_string(),
            });
        }
        if let Some((_, action)) = state.dom.click_target(idx) {
            state.dispatch(action);
            state.render();
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> TackleResult<()> {
        let mut state = self.lock();
        let idx = state.resolve(element)?;
        let slot = state.dom.node(idx).bind.clone().ok_or_else(|| TackleError::NotActionable {
            selector: element.id.clone(),
            reason: "element is not editable".to_string(),
        })?;
        state.values.insert(slot, String::new());
        state.render();
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> TackleResult<()> {
        let mut state = self.lock();
        let idx = state.resolve(element)?;
        let slot = state.dom.node(idx).bind.clone().ok_or_else(|| TackleError::NotActionable {
            selector: element.id.clone(),
            reason: "element is not editable".to_string(),
        })?;
        state.values.entry(slot).or_default().push_str(text);
        state.render();
        Ok(())
    }

    async fn press_key(&self, element: &ElementHandle, key: Key) -> TackleResult<()> {
        let mut state = self.lock();
        let idx = state.resolve(element)?;
        match key {
            Key::Enter => {
                let action = state
                    .dom
                    .node(idx)
                    .on_enter
                    .clone()
                    .or_else(|| state.submit_action(idx));
                if let Some(action) = action {
                    state.dispatch(action);
                }
            }
            Key::Escape => state.close_menus(),
            Key::Tab => {}
        }
        state.render();
        Ok(())
    }

    async fn submit(&self, form: &ElementHandle) -> TackleResult<()> {
        let mut state = self.lock();
        let idx = state.resolve(form)?;
        let action = state.submit_action(idx).ok_or_else(|| TackleError::NotActionable {
            selector: form.id.clone(),
            reason: "element is not inside a form".to_string(),
        })?;
        state.dispatch(action);
        state.render();
        Ok(())
    }

    async fn cookies(&self) -> TackleResult<Vec<Cookie>> {
        Ok(self.lock().cookies.clone())
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> TackleResult<()> {
        self.mutate(|state| {
            for cookie in cookies {
                state.cookies.retain(|c| c.name != cookie.name);
                state.cookies.push(cookie.clone());
            }
        });
        Ok(())
    }

    async fn clear_cookies(&self) -> TackleResult<()> {
        self.mutate(|state| state.cookies.clear());
        Ok(())
    }

    async fn close(&self) -> TackleResult<()> {
        Ok(())
    }
}
