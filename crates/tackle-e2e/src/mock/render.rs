//! PatternFly markup for the fake application's screens.

use super::app::{form_spec, Alert, Modal, ProxyEntry, State};
use super::dom::{el, El, Ui};
use super::model::{EntityKind, Layout, Options, Record, RowActions};
use crate::session::Perspective;
use crate::table::PER_PAGE_OPTIONS;
use crate::views;

const CONTROLS: [EntityKind; 5] = [
    EntityKind::Stakeholder,
    EntityKind::StakeholderGroup,
    EntityKind::JobFunction,
    EntityKind::BusinessService,
    EntityKind::TagType,
];

pub(super) fn render(state: &State) -> El {
    if state.logged_in() {
        shell(state)
    } else if state.pending_change {
        change_password()
    } else {
        login(state.login_error)
    }
}

// =============================================================================
// LOGIN
// =============================================================================

fn login(error: bool) -> El {
    let form = el("form")
        .id("kc-form-login")
        .on_submit(Ui::Login)
        .child_if(error, || {
            el("span")
                .id("input-error")
                .text("Invalid username or password.")
        })
        .child(el("input").id("username").attr("name", "username").bind("login:username"))
        .child(
            el("input")
                .id("password")
                .attr("type", "password")
                .bind("login:password"),
        )
        .child(el("button").id("kc-login").text("Sign In").on_click(Ui::Login));
    el("div")
        .class("login-pf-page")
        .child(el("h1").id("kc-page-title").text("Log in to your account"))
        .child(form)
}

fn change_password() -> El {
    el("div")
        .class("login-pf-page")
        .child(el("h1").id("kc-page-title").text("Update password"))
        .child(
            el("form")
                .id("kc-passwd-update-form")
                .on_submit(Ui::ChangePassword)
                .child(
                    el("input")
                        .id("password-new")
                        .attr("type", "password")
                        .bind("login:new"),
                )
                .child(
                    el("input")
                        .id("password-confirm")
                        .attr("type", "password")
                        .bind("login:confirm"),
                )
                .child(
                    el("button")
                        .id("kc-submit")
                        .text("Submit")
                        .on_click(Ui::ChangePassword),
                ),
        )
}

// =============================================================================
// SHELL
// =============================================================================

fn shell(state: &State) -> El {
    let mut main = el("main").key("main").class("pf-c-page__main");
    if let Some(alert) = &state.alert {
        main = main.child(alert_group(alert));
    }
    main = main.child(content(state));

    let mut page = el("div")
        .class("pf-c-page")
        .child(masthead(state))
        .child(sidebar(state.perspective))
        .child(main);
    if let Some(modal) = &state.modal {
        page = page.child(modal_box(state, modal));
    }
    page
}

fn masthead(state: &State) -> El {
    let perspective = el("div")
        .key("perspective")
        .class("pf-c-context-selector")
        .class_if(state.perspective_open, "pf-m-expanded")
        .child(
            el("button")
                .class("pf-c-context-selector__toggle")
                .on_click(Ui::TogglePerspectiveMenu)
                .child(
                    el("span")
                        .class("pf-c-context-selector__toggle-text")
                        .text(state.perspective.label()),
                ),
        )
        .child_if(state.perspective_open, || {
            el("div").class("pf-c-context-selector__menu").child(el("ul").children(
                [Perspective::Developer, Perspective::Administrator].map(|p| {
                    el("li").key(p.label()).child(
                        el("button")
                            .class("pf-c-context-selector__menu-list-item")
                            .text(p.label())
                            .on_click(Ui::SelectPerspective(p.label())),
                    )
                }),
            ))
        });

    let tools = el("div").key("tools").class("pf-c-page__header-tools").child(
        el("div")
            .class("pf-c-dropdown")
            .class_if(state.user_menu_open, "pf-m-expanded")
            .child(
                el("button")
                    .class("pf-c-dropdown__toggle pf-m-plain")
                    .text("admin")
                    .on_click(Ui::ToggleUserMenu),
            )
            .child_if(state.user_menu_open, || {
                el("ul").class("pf-c-dropdown__menu").child(
                    el("li").child(
                        el("a")
                            .class("pf-c-dropdown__menu-item")
                            .text("Logout")
                            .on_click(Ui::Logout),
                    ),
                )
            }),
    );

    el("header")
        .key("header")
        .class("pf-c-page__header")
        .child(perspective)
        .child(tools)
}

fn sidebar(perspective: Perspective) -> El {
    let links: &[(&str, &'static str)] = match perspective {
        Perspective::Developer => &[
            ("Application inventory", "/applications"),
            ("Controls", "/controls"),
        ],
        Perspective::Administrator => &[("Credentials", "/identities"), ("Proxy", "/proxies")],
    };
    el("nav").key("sidebar").class("pf-c-nav").child(el("ul").children(
        links.iter().map(|(label, path)| {
            el("li").key(*label).class("pf-c-nav__item").child(
                el("a")
                    .class("pf-c-nav__link")
                    .text(*label)
                    .on_click(Ui::Nav(*path)),
            )
        }),
    ))
}

fn alert_group(alert: &Alert) -> El {
    let variant = if alert.success {
        "pf-m-success"
    } else {
        "pf-m-danger"
    };
    el("ul").key("alerts").class("pf-c-alert-group pf-m-toast").child(
        el("li").child(
            el("div")
                .class("pf-c-alert")
                .class(variant)
                .child(el("h4").class("pf-c-alert__title").text(alert.text.clone())),
        ),
    )
}

fn content(state: &State) -> El {
    if state.path == "/proxies" {
        return proxy_page(state);
    }
    match state.current_kind() {
        Some(kind) => list_page(state, kind),
        None => el("section")
            .key("missing")
            .child(el("h1").text("Page not found")),
    }
}

// =============================================================================
// LIST VIEWS
// =============================================================================

fn list_page(state: &State, kind: EntityKind) -> El {
    let layout = kind.layout();
    let list = &state.list;
    let rows = state.model.visible(kind, &list.chips, list.sort.as_ref());
    let total = rows.len();
    let last = total.div_ceil(list.per_page).max(1);
    let shown: Vec<&Record> = rows
        .into_iter()
        .skip((list.page - 1) * list.per_page)
        .take(list.per_page)
        .collect();

    let mut section = el("section")
        .key(layout.form_id)
        .class("pf-c-page__main-section")
        .child(el("h1").text(layout.title));
    if layout.tab.is_some() {
        section = section.child(tabs(kind));
    }
    section = section
        .child(toolbar(state, kind, &layout, total, last))
        .child(table(state, kind, &layout, &shown));
    if total == 0 {
        section.child(
            el("div")
                .key("empty")
                .class(views::EMPTY_STATE_CLASS)
                .child(
                    el("h2")
                        .class("pf-c-title")
                        .text(format!("No {} available", layout.plural)),
                )
                .child(el("div").class("pf-c-empty-state__body").text(format!(
                    "Create a new {} to start seeing data here.",
                    layout.noun
                ))),
        )
    } else {
        section.child(pagination(state, total, last, false))
    }
}

fn tabs(current: EntityKind) -> El {
    el("div").key("tabs").class("pf-c-tabs").child(
        el("ul").class("pf-c-tabs__list").children(CONTROLS.map(|kind| {
            let layout = kind.layout();
            el("li")
                .key(layout.form_id)
                .class("pf-c-tabs__item")
                .class_if(kind == current, "pf-m-current")
                .child(
                    el("button")
                        .class("pf-c-tabs__link")
                        .on_click(Ui::Tab(layout.path))
                        .child(
                            el("span")
                                .class("pf-c-tabs__item-text")
                                .text(layout.tab.unwrap_or(layout.title)),
                        ),
                )
        })),
    )
}

fn toolbar(state: &State, kind: EntityKind, layout: &Layout, total: usize, last: usize) -> El {
    let list = &state.list;
    let filter = layout.filters.get(list.category);

    let category = el("div").key("category").class("pf-c-toolbar__item").child(
        el("div")
            .class("pf-c-dropdown")
            .class_if(list.category_open, "pf-m-expanded")
            .child(
                el("button")
                    .class("pf-c-dropdown__toggle")
                    .text(filter.map_or("Filter", |f| f.label))
                    .on_click(Ui::ToggleCategoryMenu),
            )
            .child_if(list.category_open, || {
                el("ul")
                    .class("pf-c-dropdown__menu")
                    .children(layout.filters.iter().map(|f| {
                        el("li").key(f.label).child(
                            el("a")
                                .text(f.label)
                                .on_click(Ui::PickCategory(f.label.to_string())),
                        )
                    }))
            }),
    );

    let value = match filter {
        Some(f) => match f.options {
            Some(options) => option_filter(state, f.label, options),
            None => text_filter(f.label),
        },
        None => el("div").key("value"),
    };

    let creates: Vec<(&str, &'static str)> = match kind {
        EntityKind::TagType => vec![("Create tag", "tag"), ("Create tag type", "tag-type")],
        _ => vec![(views::CREATE_NEW, layout.form_id)],
    };
    let create = el("div")
        .key("create")
        .class("pf-c-toolbar__item")
        .children(creates.into_iter().map(|(label, form)| {
            el("button")
                .key(form)
                .class("pf-c-button pf-m-primary")
                .text(label)
                .on_click(Ui::CreateNew(form))
        }));

    let content = el("div")
        .key("content")
        .class("pf-c-toolbar__content")
        .child(
            el("div")
                .key("filters")
                .class("pf-c-toolbar__group pf-m-toggle-group pf-m-filter-group pf-m-show")
                .child(category)
                .child(value),
        )
        .child(create)
        .child(
            el("div")
                .key("pagination")
                .class("pf-c-toolbar__item pf-m-pagination")
                .child(pagination(state, total, last, true)),
        );

    let mut toolbar = el("div").key("toolbar").class("pf-c-toolbar").child(content);
    if !list.chips.is_empty() {
        toolbar = toolbar.child(chips(state, layout));
    }
    toolbar
}

fn text_filter(label: &str) -> El {
    el("div").key("value").class("pf-c-toolbar__item").child(
        el("div")
            .class("pf-c-input-group")
            .child(
                el("input")
                    .class("pf-c-form-control")
                    .attr("type", "search")
                    .attr("aria-label", format!("{label} filter"))
                    .attr("placeholder", format!("Filter by {}...", label.to_lowercase()))
                    .bind("filter:text")
                    .on_enter(Ui::Search),
            )
            .child(
                el("button")
                    .class("pf-c-button pf-m-control")
                    .attr("aria-label", "search button for search input")
                    .on_click(Ui::Search),
            ),
    )
}

fn option_filter(state: &State, label: &str, options: Options) -> El {
    let list = &state.list;
    let open = list.filter_select_open;
    let chosen: Vec<&str> = list
        .chips
        .iter()
        .filter(|(c, _)| *c == list.category)
        .map(|(_, v)| v.as_str())
        .collect();
    let select = el("div")
        .class("pf-c-select")
        .class_if(open, "pf-m-expanded")
        .child(
            el("div").class("pf-c-select__toggle-wrapper").child(
                el("button")
                    .class("pf-c-select__toggle")
                    .text(format!("Filter by {}", label.to_lowercase()))
                    .on_click(Ui::ToggleFilterSelect),
            ),
        )
        .child_if(open, || {
            el("div").class("pf-c-select__menu").child(el("fieldset").children(
                state.model.options(options).into_iter().enumerate().map(|(i, option)| {
                    el("label")
                        .key(format!("o{i}"))
                        .class("pf-c-check pf-c-select__menu-item")
                        .on_click(Ui::ToggleFilterValue(option.clone()))
                        .child(
                            el("input")
                                .attr("type", "checkbox")
                                .checked(chosen.contains(&option.as_str())),
                        )
                        .child(el("span").class("pf-c-check__label").text(option))
                }),
            ))
        });
    el("div")
        .key("value")
        .class("pf-c-toolbar__item")
        .child(el("div").class("pf-c-input-group").child(select))
}

fn chips(state: &State, layout: &Layout) -> El {
    let chips = &state.list.chips;
    let groups = layout.filters.iter().enumerate().filter_map(|(i, f)| {
        let values: Vec<&String> = chips
            .iter()
            .filter(|(c, _)| *c == i)
            .map(|(_, v)| v)
            .collect();
        (!values.is_empty()).then(|| {
            el("div")
                .key(format!("g{i}"))
                .class("pf-c-chip-group")
                .child(el("span").class("pf-c-chip-group__label").text(f.label))
                .children(values.into_iter().enumerate().map(|(j, v)| {
                    el("div")
                        .key(format!("c{j}"))
                        .class("pf-c-chip")
                        .child(el("span").class("pf-c-chip__text").text(v.clone()))
                }))
        })
    });
    el("div")
        .key("chips")
        .class("pf-c-toolbar__content pf-m-chip-container")
        .children(groups)
        .child(
            el("div").key("clear").class("pf-c-toolbar__item").child(
                el("button")
                    .class("pf-c-button pf-m-link")
                    .text(views::CLEAR_ALL_FILTERS)
                    .on_click(Ui::ClearFilters),
            ),
        )
}

fn pagination(state: &State, total: usize, last: usize, top: bool) -> El {
    let list = &state.list;
    let page = list.page;
    let nav_button = |action: &str, label: &str, disabled: bool, ui: Ui| {
        el("button")
            .key(action)
            .class("pf-c-button pf-m-plain")
            .attr("data-action", action)
            .attr("aria-label", label)
            .disabled(disabled)
            .on_click(ui)
    };

    let mut nav = el("nav")
        .key("nav")
        .class("pf-c-pagination__nav")
        .attr("aria-label", "Pagination")
        .child(nav_button("first", "Go to first page", page <= 1, Ui::FirstPage))
        .child(nav_button("previous", "Go to previous page", page <= 1, Ui::PrevPage));
    if top {
        nav = nav.child(
            el("div")
                .key("select")
                .class("pf-c-pagination__nav-page-select")
                .child(
                    el("input")
                        .class("pf-c-form-control")
                        .attr("type", "number")
                        .attr("aria-label", "Current page")
                        .bind("page")
                        .on_enter(Ui::GoToTypedPage),
                )
                .child(el("span").text(format!("of {last}"))),
        );
    }
    nav = nav
        .child(nav_button("next", "Go to next page", page >= last, Ui::NextPage))
        .child(nav_button("last", "Go to last page", page >= last, Ui::LastPage));

    let root = el("div").key("pagination").class("pf-c-pagination");
    if !top {
        return root.class("pf-m-bottom").child(nav);
    }

    let (from, to) = if total == 0 {
        (0, 0)
    } else {
        ((page - 1) * list.per_page + 1, (page * list.per_page).min(total))
    };
    let open = list.per_page_open;
    let per_page = el("div")
        .key("per-page")
        .class("pf-c-options-menu")
        .class_if(open, "pf-m-expanded")
        .child(
            el("button")
                .class("pf-c-options-menu__toggle pf-m-text pf-m-plain")
                .disabled(total <= PER_PAGE_OPTIONS[0])
                .on_click(Ui::TogglePerPage)
                .child(el("b").text(format!("{from} - {to}")))
                .child(el("span").text(format!("of {total}"))),
        )
        .child_if(open, || {
            el("ul")
                .class("pf-c-options-menu__menu")
                .children(PER_PAGE_OPTIONS.map(|n| {
                    el("li").key(n.to_string()).child(
                        el("button")
                            .class("pf-c-options-menu__menu-item")
                            .attr("data-action", format!("per-page-{n}"))
                            .text(format!("{n} per page"))
                            .on_click(Ui::PerPage(n)),
                    )
                }))
        });
    root.child(per_page).child(nav)
}

fn table(state: &State, kind: EntityKind, layout: &Layout, rows: &[&Record]) -> El {
    let mut head = el("tr");
    if layout.expandable {
        head = head.child(el("th").key("expand"));
    }
    for column in &layout.columns {
        let th = el("th")
            .key(format!("h-{}", column.label))
            .attr("data-label", column.label);
        let th = if column.sortable {
            let aria = match &state.list.sort {
                Some((label, true)) if label == column.label => "ascending",
                Some((label, false)) if label == column.label => "descending",
                _ => "none",
            };
            th.class("pf-c-table__sort").attr("aria-sort", aria).child(
                el("button")
                    .class("pf-c-table__button")
                    .text(column.label)
                    .on_click(Ui::Sort(column.label.to_string())),
            )
        } else {
            th.text(column.label)
        };
        head = head.child(th);
    }
    head = head.child(el("th").key("actions"));

    let mut body = el("tbody");
    for record in rows {
        body = body.child(row(state, layout, record));
        if layout.expandable && state.list.expanded.contains(&record.id) {
            body = body.child(detail_row(kind, layout, record));
        }
    }

    el("table")
        .key("table")
        .class("pf-c-table")
        .attr("aria-label", "main-table")
        .child(el("thead").child(head))
        .child(body)
}

fn row(state: &State, layout: &Layout, record: &Record) -> El {
    let mut tr = el("tr").key(format!("r{}", record.id));
    if layout.expandable {
        let open = state.list.expanded.contains(&record.id);
        tr = tr.child(
            el("td").key("toggle").class("pf-c-table__toggle").child(
                el("button")
                    .attr("aria-label", "Details")
                    .attr("aria-expanded", open.to_string())
                    .on_click(Ui::ToggleExpand(record.id)),
            ),
        );
    }
    for column in &layout.columns {
        tr = tr.child(
            el("td")
                .key(format!("c-{}", column.label))
                .attr("data-label", column.label)
                .text(record.cell(column.source)),
        );
    }
    tr.child(row_actions(state, layout.actions, record.id))
}

fn icon(label: &str, action: Ui) -> El {
    el("button")
        .key(label)
        .class("pf-c-button pf-m-plain")
        .attr("aria-label", label)
        .on_click(action)
}

fn row_actions(state: &State, actions: RowActions, id: u64) -> El {
    let td = el("td").key("actions").class("pf-c-table__action");
    match actions {
        RowActions::Icons => td
            .child(icon("edit", Ui::OpenEdit(id)))
            .child(icon("delete", Ui::AskDelete(id))),
        RowActions::Kebab => {
            let open = state.list.kebab_open == Some(id);
            let kebab = el("div")
                .key("kebab")
                .class("pf-c-dropdown")
                .class_if(open, "pf-m-expanded")
                .child(
                    el("button")
                        .class("pf-c-dropdown__toggle pf-m-plain")
                        .attr("aria-label", "Actions")
                        .on_click(Ui::ToggleKebab(id)),
                )
                .child_if(open, || {
                    el("ul")
                        .class("pf-c-dropdown__menu")
                        .attr("role", "menu")
                        .child(el("li").key("edit").child(
                            el("button").text("Edit").on_click(Ui::OpenEdit(id)),
                        ))
                        .child(el("li").key("delete").child(
                            el("button").text("Delete").on_click(Ui::AskDelete(id)),
                        ))
                });
            td.child(icon("edit", Ui::OpenEdit(id))).child(kebab)
        }
        RowActions::TextButtons => td
            .child(
                el("button")
                    .key("edit")
                    .class("pf-c-button pf-m-secondary")
                    .text("Edit")
                    .on_click(Ui::OpenEdit(id)),
            )
            .child(
                el("button")
                    .key("delete")
                    .class("pf-c-button pf-m-link")
                    .text("Delete")
                    .on_click(Ui::AskDelete(id)),
            ),
    }
}

fn detail_row(kind: EntityKind, layout: &Layout, record: &Record) -> El {
    let content = if kind == EntityKind::TagType {
        tags_table(record)
    } else {
        description_list(record)
    };
    let span = layout.columns.len() + 2;
    el("tr")
        .key(format!("d{}", record.id))
        .class(views::EXPANDABLE_ROW_CLASS)
        .class("pf-m-expanded")
        .child(el("td").attr("colspan", span.to_string()).child(content))
}

fn description_list(record: &Record) -> El {
    let tags = record.list("tags").join(", ");
    let entries = [
        ("Description", record.field("description").to_string()),
        ("Business service", record.field("business").to_string()),
        ("Tags", tags),
        ("Comments", record.field("comments").to_string()),
    ];
    el("dl")
        .class("pf-c-description-list")
        .children(entries.into_iter().map(|(term, value)| {
            el("div")
                .key(term)
                .class("pf-c-description-list__group")
                .child(el("dt").class("pf-c-description-list__term").text(term))
                .child(el("dd").class("pf-c-description-list__description").text(value))
        }))
}

fn tags_table(record: &Record) -> El {
    el("table")
        .class("pf-c-table pf-m-compact")
        .attr("aria-label", "Tags")
        .child(el("thead").child(el("tr").child(
            el("th").attr("data-label", "Tag name").text("Tag name"),
        )))
        .child(el("tbody").children(record.children.iter().map(|tag| {
            el("tr")
                .key(format!("t{}", tag.id))
                .child(
                    el("td")
                        .attr("data-label", "Tag name")
                        .text(tag.field("name")),
                )
                .child(el("td").child(icon("delete", Ui::AskDeleteChild(record.id, tag.id))))
        })))
}

// =============================================================================
// DIALOGS
// =============================================================================

fn modal_box(state: &State, modal: &Modal) -> El {
    match modal {
        Modal::Confirm { key, .. } => el("div")
            .key("confirm")
            .class("pf-c-modal-box")
            .attr("role", "dialog")
            .child(
                el("header").child(
                    el("h2")
                        .class("pf-c-modal-box__title")
                        .text(format!("Permanently delete {key}?")),
                ),
            )
            .child(
                el("div")
                    .class("pf-c-modal-box__body")
                    .text("This action cannot be undone."),
            )
            .child(
                el("footer")
                    .child(
                        el("button")
                            .id("confirm-dialog-button")
                            .class("pf-c-button pf-m-danger")
                            .text("Delete")
                            .on_click(Ui::Confirm),
                    )
                    .child(
                        el("button")
                            .class("pf-c-button pf-m-link")
                            .attr("aria-label", "cancel")
                            .text("Cancel")
                            .on_click(Ui::CancelModal),
                    ),
            ),
        Modal::Form {
            form,
            editing,
            open_select,
            selections,
            error,
        } => {
            let Some(spec) = form_spec(form) else {
                return el("div").key("modal").class("pf-c-modal-box");
            };
            let title = if editing.is_some() {
                format!("Update {}", spec.noun)
            } else {
                format!("New {}", spec.noun)
            };
            let key_empty = state.value(&format!("form:{}", spec.key)).trim().is_empty();

            let mut body = el("form")
                .key("form")
                .id(&format!("{form}-form"))
                .class("pf-c-form")
                .on_submit(Ui::SubmitForm);
            for field in &spec.fields {
                let group = el("div")
                    .key(field.id)
                    .class("pf-c-form__group")
                    .child(el("label").class("pf-c-form__label").text(field.id));
                let group = match field.options {
                    None => group.child(
                        el("input")
                            .id(field.id)
                            .class("pf-c-form-control")
                            .attr("name", field.id)
                            .bind(format!("form:{}", field.id)),
                    ),
                    Some(options) => {
                        let open = open_select.as_deref() == Some(field.id);
                        let chosen = selections.get(field.id).map_or(&[][..], Vec::as_slice);
                        group.child(form_select(state, field.id, options, chosen, open))
                    }
                };
                body = body.child(group);
            }
            if let Some(message) = error {
                body = body.child(
                    el("div")
                        .key("error")
                        .class("pf-c-form__helper-text pf-m-error")
                        .text(message.clone()),
                );
            }
            body = body.child(
                el("div")
                    .key("actions")
                    .class("pf-c-form__actions")
                    .child(
                        el("button")
                            .key("submit")
                            .class("pf-c-button pf-m-primary")
                            .attr("type", "submit")
                            .attr("aria-label", "submit")
                            .text(if editing.is_some() { "Save" } else { "Create" })
                            .disabled(key_empty)
                            .on_click(Ui::SubmitForm),
                    )
                    .child(
                        el("button")
                            .key("cancel")
                            .class("pf-c-button pf-m-link")
                            .attr("aria-label", "cancel")
                            .text("Cancel")
                            .on_click(Ui::CancelModal),
                    ),
            );

            el("div")
                .key("modal")
                .class("pf-c-modal-box")
                .attr("role", "dialog")
                .child(el("header").child(el("h2").class("pf-c-modal-box__title").text(title)))
                .child(body)
        }
    }
}

fn form_select(state: &State, id: &str, options: Options, chosen: &[String], open: bool) -> El {
    let toggle_text = if chosen.is_empty() {
        "Select...".to_string()
    } else {
        chosen.join(", ")
    };
    el("div")
        .key("select")
        .class("pf-c-select")
        .class_if(open, "pf-m-expanded")
        .child(
            el("button")
                .id(&format!("{id}-toggle"))
                .class("pf-c-select__toggle")
                .text(toggle_text)
                .on_click(Ui::ToggleFormSelect(id.to_string())),
        )
        .child_if(open, || {
            el("ul").class("pf-c-select__menu").children(
                state.model.options(options).into_iter().enumerate().map(|(i, option)| {
                    el("li").key(format!("o{i}")).child(
                        el("button")
                            .class("pf-c-select__menu-item")
                            .class_if(chosen.contains(&option), "pf-m-selected")
                            .text(option.clone())
                            .on_click(Ui::PickFormOption(id.to_string(), option)),
                    )
                }),
            )
        })
}

// =============================================================================
// PROXY
// =============================================================================

fn proxy_page(state: &State) -> El {
    let draft = &state.proxy_draft;
    el("section")
        .key("proxy")
        .class("pf-c-page__main-section")
        .child(el("h1").text("Proxy configuration"))
        .child(
            el("form")
                .key("form")
                .class("pf-c-form")
                .on_submit(Ui::SaveProxy)
                .child(proxy_block(state, "http", &draft.http))
                .child(proxy_block(state, "https", &draft.https))
                .child(
                    el("div")
                        .key("excluded")
                        .class("pf-c-form__group")
                        .child(el("label").text("Excluded"))
                        .child(
                            el("textarea")
                                .attr("name", "excluded")
                                .attr("aria-label", "excluded")
                                .bind("proxy:excluded"),
                        ),
                )
                .child(
                    el("div").key("actions").class("pf-c-form__actions").child(
                        el("button")
                            .class("pf-c-button pf-m-primary")
                            .attr("type", "submit")
                            .attr("aria-label", "submit")
                            .text("Insert")
                            .on_click(Ui::SaveProxy),
                    ),
                ),
        )
}

fn proxy_block(state: &State, scheme: &'static str, entry: &ProxyEntry) -> El {
    let mut block = el("div").key(scheme).class("pf-c-form__section").child(
        el("div")
            .key("switch")
            .class("pf-c-switch")
            .child(
                el("input")
                    .id(&format!("{scheme}Proxy"))
                    .class("pf-c-switch__input")
                    .attr("type", "checkbox")
                    .checked(entry.enabled)
                    .on_click(Ui::ToggleProxy(scheme)),
            )
            .child(
                el("span")
                    .class("pf-c-switch__label")
                    .text(format!("{} proxy", scheme.to_uppercase())),
            ),
    );
    if !entry.enabled {
        return block;
    }
    block = block
        .child(
            el("input")
                .key("host")
                .class("pf-c-form-control")
                .attr("name", format!("{scheme}Host"))
                .bind(format!("proxy:{scheme}Host")),
        )
        .child(
            el("input")
                .key("port")
                .class("pf-c-form-control")
                .attr("name", format!("{scheme}Port"))
                .bind(format!("proxy:{scheme}Port")),
        )
        .child(
            el("div").key("identity").class("pf-c-check").child(
                el("input")
                    .id(&format!("{scheme}-identity-required"))
                    .attr("type", "checkbox")
                    .checked(entry.identity_required)
                    .on_click(Ui::ToggleIdentity(scheme)),
            ),
        );
    if !entry.identity_required {
        return block;
    }
    let open = state.proxy_select_open == Some(scheme);
    let credentials: Vec<String> = state
        .model
        .all(EntityKind::Credential)
        .iter()
        .filter(|r| r.field("type") == "Proxy")
        .map(|r| r.field("name").to_string())
        .collect();
    block.child(
        el("div")
            .key("credentials")
            .class("pf-c-select")
            .class_if(open, "pf-m-expanded")
            .child(
                el("button")
                    .id(&format!("{scheme}-proxy-credentials-select-toggle"))
                    .class("pf-c-select__toggle")
                    .text(entry.credentials.clone().unwrap_or_else(|| "Select...".to_string()))
                    .on_click(Ui::ToggleProxyCredentials(scheme)),
            )
            .child_if(open, || {
                el("ul").class("pf-c-select__menu").children(
                    credentials.into_iter().enumerate().map(|(i, name)| {
                        el("li").key(format!("o{i}")).child(
                            el("button")
                                .text(name.clone())
                                .on_click(Ui::PickProxyCredential(scheme, name)),
                        )
                    }),
                )
            }),
    )
}
