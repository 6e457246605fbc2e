//! Minimal DOM for the fake application.
//!
//! Views are rendered as an [`El`] tree and flattened into a [`Dom`]. Node ids
//! are paths of sibling keys, so an element that survives a re-render keeps
//! its id and one that disappears leaves its old handles stale.

use super::selector::{self, AttrOp, Combinator, Compound, ParsedSelector};
use crate::driver::ElementHandle;
use crate::result::TackleResult;
use std::collections::{BTreeMap, HashMap};

/// Event wiring for rendered elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Ui {
    Login,
    ChangePassword,
    ToggleUserMenu,
    Logout,
    TogglePerspectiveMenu,
    SelectPerspective(&'static str),
    Nav(&'static str),
    Tab(&'static str),
    TogglePerPage,
    PerPage(usize),
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    GoToTypedPage,
    Sort(String),
    ToggleCategoryMenu,
    PickCategory(String),
    Search,
    ToggleFilterSelect,
    ToggleFilterValue(String),
    ClearFilters,
    CreateNew(&'static str),
    OpenEdit(u64),
    AskDelete(u64),
    AskDeleteChild(u64, u64),
    ToggleKebab(u64),
    ToggleExpand(u64),
    ToggleFormSelect(String),
    PickFormOption(String, String),
    SubmitForm,
    CancelModal,
    Confirm,
    ToggleProxy(&'static str),
    ToggleIdentity(&'static str),
    ToggleProxyCredentials(&'static str),
    PickProxyCredential(&'static str, String),
    SaveProxy,
}

/// Render-time element description
#[derive(Debug, Clone, Default)]
pub(crate) struct El {
    tag: String,
    key: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    disabled: bool,
    checked: bool,
    bind: Option<String>,
    on_click: Option<Ui>,
    on_enter: Option<Ui>,
    on_submit: Option<Ui>,
    children: Vec<El>,
}

pub(crate) fn el(tag: &str) -> El {
    El {
        tag: tag.to_string(),
        ..El::default()
    }
}

impl El {
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn class_if(self, cond: bool, classes: &str) -> Self {
        if cond {
            self.class(classes)
        } else {
            self
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        if disabled {
            self.attrs.insert("disabled".into(), String::new());
        }
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Bind the element's value to a UI value slot
    pub fn bind(mut self, slot: impl Into<String>) -> Self {
        self.bind = Some(slot.into());
        self
    }

    pub fn on_click(mut self, action: Ui) -> Self {
        self.on_click = Some(action);
        self
    }

    pub fn on_enter(mut self, action: Ui) -> Self {
        self.on_enter = Some(action);
        self
    }

    pub fn on_submit(mut self, action: Ui) -> Self {
        self.on_submit = Some(action);
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    pub fn child_if(self, cond: bool, child: impl FnOnce() -> El) -> Self {
        if cond {
            self.child(child())
        } else {
            self
        }
    }

    pub fn children<I: IntoIterator<Item = El>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub id: String,
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub disabled: bool,
    pub checked: bool,
    pub bind: Option<String>,
    pub on_click: Option<Ui>,
    pub on_enter: Option<Ui>,
    pub on_submit: Option<Ui>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Flattened, queryable element tree in document order
#[derive(Debug, Clone, Default)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl Dom {
    /// Flatten `root`; bound values are looked up in `values`
    pub fn build(root: El, values: &HashMap<String, String>) -> Self {
        let mut dom = Self::default();
        dom.push(root, None, "root".to_string(), values);
        dom
    }

    fn push(
        &mut self,
        el: El,
        parent: Option<usize>,
        id: String,
        values: &HashMap<String, String>,
    ) -> usize {
        let idx = self.nodes.len();
        let mut attrs = el.attrs;
        if let Some(slot) = &el.bind {
            attrs.insert(
                "value".into(),
                values.get(slot).cloned().unwrap_or_default(),
            );
        }
        if el.checked {
            attrs.insert("checked".into(), String::new());
        }
        self.nodes.push(Node {
            id: id.clone(),
            tag: el.tag,
            classes: el.classes,
            attrs,
            text: el.text,
            disabled: el.disabled,
            checked: el.checked,
            bind: el.bind,
            on_click: el.on_click,
            on_enter: el.on_enter,
            on_submit: el.on_submit,
            parent,
            children: Vec::new(),
        });
        self.index.insert(id.clone(), idx);

        let mut seen: HashMap<String, usize> = HashMap::new();
        for child in el.children {
            let local = match &child.key {
                Some(key) => key.clone(),
                None => {
                    let n = seen.entry(child.tag.clone()).or_insert(0);
                    *n += 1;
                    format!("{}{}", child.tag, n)
                }
            };
            let child_idx = self.push(child, Some(idx), format!("{id}/{local}"), values);
            self.nodes[idx].children.push(child_idx);
        }
        idx
    }

    pub fn lookup(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// textContent of a node
    pub fn text_content(&self, idx: usize) -> String {
        let mut out = String::new();
        self.collect_text(idx, &mut out);
        out
    }

    fn collect_text(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        if !node.text.is_empty() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(&node.text);
        }
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    pub fn snapshot(&self, idx: usize) -> ElementHandle {
        let node = &self.nodes[idx];
        let mut handle = ElementHandle::new(node.id.clone(), node.tag.clone());
        handle.text = self.text_content(idx);
        handle.attributes = node.attrs.clone();
        handle.classes = node.classes.clone();
        handle.disabled = node.disabled;
        handle.checked = node.checked;
        handle.value = node.attrs.get("value").cloned();
        handle
    }

    fn is_descendant(&self, idx: usize, ancestor: usize) -> bool {
        let mut current = self.nodes[idx].parent;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes[p].parent;
        }
        false
    }

    /// Matches in document order, optionally restricted to descendants of `scope`
    pub fn query(&self, scope: Option<usize>, selector: &str) -> TackleResult<Vec<usize>> {
        let parsed = selector::parse(selector)?;
        Ok((0..self.nodes.len())
            .filter(|&idx| scope.map_or(true, |s| self.is_descendant(idx, s)))
            .filter(|&idx| self.matches(idx, &parsed))
            .collect())
    }

    pub fn closest(&self, idx: usize, selector: &str) -> TackleResult<Option<usize>> {
        let parsed = selector::parse(selector)?;
        let mut current = Some(idx);
        while let Some(i) = current {
            if self.matches(i, &parsed) {
                return Ok(Some(i));
            }
            current = self.nodes[i].parent;
        }
        Ok(None)
    }

    pub fn next_sibling(&self, idx: usize) -> Option<usize> {
        let parent = self.nodes[idx].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == idx)?;
        siblings.get(pos + 1).copied()
    }

    /// Nearest ancestor-or-self with a click handler
    pub fn click_target(&self, idx: usize) -> Option<(usize, Ui)> {
        let mut current = Some(idx);
        while let Some(i) = current {
            if let Some(action) = &self.nodes[i].on_click {
                return Some((i, action.clone()));
            }
            current = self.nodes[i].parent;
        }
        None
    }

    fn matches(&self, idx: usize, parsed: &ParsedSelector) -> bool {
        let last = parsed.parts.len() - 1;
        self.compound_matches(idx, &parsed.parts[last].1) && self.match_from(idx, parsed, last)
    }

    fn match_from(&self, idx: usize, parsed: &ParsedSelector, i: usize) -> bool {
        if i == 0 {
            return true;
        }
        let wanted = &parsed.parts[i - 1].1;
        match parsed.parts[i].0 {
            Combinator::Child => self.nodes[idx].parent.is_some_and(|p| {
                self.compound_matches(p, wanted) && self.match_from(p, parsed, i - 1)
            }),
            Combinator::Descendant => {
                let mut current = self.nodes[idx].parent;
                while let Some(p) = current {
                    if self.compound_matches(p, wanted) && self.match_from(p, parsed, i - 1) {
                        return true;
                    }
                    current = self.nodes[p].parent;
                }
                false
            }
        }
    }

    fn compound_matches(&self, idx: usize, compound: &Compound) -> bool {
        let node = &self.nodes[idx];
        if compound.tag.as_ref().is_some_and(|t| *t != node.tag) {
            return false;
        }
        if compound
            .id
            .as_ref()
            .is_some_and(|id| node.attrs.get("id") != Some(id))
        {
            return false;
        }
        if !compound
            .classes
            .iter()
            .all(|c| node.classes.iter().any(|nc| nc == c))
        {
            return false;
        }
        compound.attrs.iter().all(|a| {
            let value = node.attrs.get(&a.name);
            match &a.op {
                AttrOp::Exists => value.is_some(),
                AttrOp::Equals(v) => value == Some(v),
                AttrOp::Contains(v) => value.is_some_and(|actual| actual.contains(v.as_str())),
            }
        })
    }
}
