//! Entity records and list-view layouts of the fake application.

use crate::data::DEFAULT_TAGS;
use crate::sort::{collate, parse_timestamp, ColumnKind};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Entity kinds with a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Application inventory
    Application,
    /// Controls / Business services
    BusinessService,
    /// Controls / Stakeholders
    Stakeholder,
    /// Controls / Stakeholder groups
    StakeholderGroup,
    /// Controls / Job functions
    JobFunction,
    /// Controls / Tags (tag types with nested tags)
    TagType,
    /// Administration / Credentials
    Credential,
    /// Application inventory / Manage imports
    ApplicationImport,
}

impl EntityKind {
    pub(crate) const ALL: [Self; 8] = [
        Self::Application,
        Self::BusinessService,
        Self::Stakeholder,
        Self::StakeholderGroup,
        Self::JobFunction,
        Self::TagType,
        Self::Credential,
        Self::ApplicationImport,
    ];

    pub(crate) fn from_form(form: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.layout().form_id == form)
    }

    pub(crate) fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.layout().path == path)
    }

    pub(crate) fn from_tab(tab: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.layout().tab == Some(tab))
    }

    pub(crate) fn layout(self) -> Layout {
        match self {
            Self::Application => Layout {
                title: "Application inventory",
                noun: "application",
                plural: "applications",
                path: "/applications",
                form_id: "application",
                key_field: "name",
                tab: None,
                columns: vec![
                    Column::sortable("Name", Source::Field("name")),
                    Column::plain("Description", Source::Field("description")),
                    Column::sortable("Business service", Source::Field("business")),
                    Column::sortable("Tag count", Source::ListLen("tags")),
                ],
                filters: vec![
                    Filter::text("Name", "name"),
                    Filter::text("Description", "description"),
                    Filter::options(
                        "Business service",
                        "business",
                        Options::Kind(Self::BusinessService),
                    ),
                    Filter::options("Tag", "tags", Options::AllTags),
                ],
                form: vec![
                    Field::text("name", "name"),
                    Field::text("description", "description"),
                    Field::text("comments", "comments"),
                    Field::select(
                        "business-service",
                        "business",
                        Options::Kind(Self::BusinessService),
                    ),
                    Field::multi("tags", "tags", Options::AllTags),
                ],
                actions: RowActions::Kebab,
                expandable: true,
            },
            Self::BusinessService => Layout {
                title: "Controls",
                noun: "business service",
                plural: "business services",
                path: "/controls/business-services",
                form_id: "business-service",
                key_field: "name",
                tab: Some("Business services"),
                columns: vec![
                    Column::sortable("Name", Source::Field("name")),
                    Column::plain("Description", Source::Field("description")),
                    Column::sortable("Owner", Source::Field("owner")),
                ],
                filters: vec![
                    Filter::text("Name", "name"),
                    Filter::text("Description", "description"),
                    Filter::text("Owner", "owner"),
                ],
                form: vec![
                    Field::text("name", "name"),
                    Field::text("description", "description"),
                    Field::select("owner", "owner", Options::StakeholderNames),
                ],
                actions: RowActions::Icons,
                expandable: false,
            },
            Self::Stakeholder => Layout {
                title: "Controls",
                noun: "stakeholder",
                plural: "stakeholders",
                path: "/controls/stakeholders",
                form_id: "stakeholder",
                key_field: "email",
                tab: Some("Stakeholders"),
                columns: vec![
                    Column::sortable("Email", Source::Field("email")),
                    Column::sortable("Display name", Source::Field("name")),
                    Column::sortable("Job function", Source::Field("job-function")),
                    Column::sortable("Group count", Source::ListLen("groups")),
                ],
                filters: vec![
                    Filter::text("Email", "email"),
                    Filter::text("Display name", "name"),
                ],
                form: vec![
                    Field::text("email", "email"),
                    Field::text("displayName", "name"),
                    Field::select(
                        "job-function",
                        "job-function",
                        Options::Kind(Self::JobFunction),
                    ),
                    Field::multi(
                        "stakeholder-groups",
                        "groups",
                        Options::Kind(Self::StakeholderGroup),
                    ),
                ],
                actions: RowActions::Icons,
                expandable: false,
            },
            Self::StakeholderGroup => Layout {
                title: "Controls",
                noun: "stakeholder group",
                plural: "stakeholder groups",
                path: "/controls/stakeholder-groups",
                form_id: "stakeholder-group",
                key_field: "name",
                tab: Some("Stakeholder groups"),
                columns: vec![
                    Column::sortable("Name", Source::Field("name")),
                    Column::plain("Description", Source::Field("description")),
                    Column::sortable("Member count", Source::ListLen("members")),
                ],
                filters: vec![Filter::text("Name", "name")],
                form: vec![
                    Field::text("name", "name"),
                    Field::text("description", "description"),
                    Field::multi("stakeholders", "members", Options::StakeholderNames),
                ],
                actions: RowActions::Icons,
                expandable: false,
            },
            Self::JobFunction => Layout {
                title: "Controls",
                noun: "job function",
                plural: "job functions",
                path: "/controls/job-functions",
                form_id: "job-function",
                key_field: "name",
                tab: Some("Job functions"),
                columns: vec![Column::sortable("Name", Source::Field("name"))],
                filters: vec![Filter::text("Name", "name")],
                form: vec![Field::text("name", "name")],
                actions: RowActions::Icons,
                expandable: false,
            },
            Self::TagType => Layout {
                title: "Controls",
                noun: "tag type",
                plural: "tag types",
                path: "/controls/tags",
                form_id: "tag-type",
                key_field: "name",
                tab: Some("Tags"),
                columns: vec![
                    Column::sortable("Tag type", Source::Field("name")),
                    Column::sortable("Rank", Source::Field("rank")),
                    Column::plain("Color", Source::Field("color")),
                    Column::sortable("Tag count", Source::ChildCount),
                ],
                filters: vec![Filter::text("Tag type", "name")],
                form: vec![
                    Field::text("name", "name"),
                    Field::text("rank", "rank"),
                    Field::select("color", "color", Options::Static(COLORS)),
                ],
                actions: RowActions::Icons,
                expandable: true,
            },
            Self::Credential => Layout {
                title: "Credentials",
                noun: "credential",
                plural: "credentials",
                path: "/identities",
                form_id: "credential",
                key_field: "name",
                tab: None,
                columns: vec![
                    Column::sortable("Name", Source::Field("name")),
                    Column::plain("Description", Source::Field("description")),
                    Column::sortable("Type", Source::Field("type")),
                ],
                filters: vec![Filter::text("Name", "name")],
                form: vec![
                    Field::text("name", "name"),
                    Field::text("description", "description"),
                    Field::select("type", "type", Options::Static(CREDENTIAL_TYPES)),
                    Field::text("user", "user"),
                    Field::text("password", "password"),
                    Field::text("key", "key"),
                ],
                actions: RowActions::TextButtons,
                expandable: false,
            },
            Self::ApplicationImport => Layout {
                title: "Application imports",
                noun: "application import",
                plural: "application imports",
                path: "/applications/application-imports",
                form_id: "application-import",
                key_field: "filename",
                tab: None,
                columns: vec![
                    Column::sortable("Date", Source::Field("date")),
                    Column::sortable("Filename", Source::Field("filename")),
                    Column::plain("Status", Source::Field("status")),
                ],
                filters: vec![Filter::text("Filename", "filename")],
                form: vec![
                    Field::text("filename", "filename"),
                    Field::text("date", "date"),
                    Field::text("status", "status"),
                ],
                actions: RowActions::Kebab,
                expandable: false,
            },
        }
    }
}

/// Fields of the "Create tag" form
pub(crate) fn tag_form() -> Vec<Field> {
    vec![
        Field::text("name", "name"),
        Field::select("tag-type", "tag-type", Options::Kind(EntityKind::TagType)),
    ]
}

pub(crate) const COLORS: &[&str] = &["Blue", "Cyan", "Green", "Orange", "Purple", "Red"];
pub(crate) const CREDENTIAL_TYPES: &[&str] = &["Proxy", "Maven", "Source Control"];

/// Where a column reads its value from
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source {
    Field(&'static str),
    ListLen(&'static str),
    ChildCount,
}

#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub label: &'static str,
    pub source: Source,
    pub sortable: bool,
}

impl Column {
    const fn sortable(label: &'static str, source: Source) -> Self {
        Self {
            label,
            source,
            sortable: true,
        }
    }

    const fn plain(label: &'static str, source: Source) -> Self {
        Self {
            label,
            source,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Options {
    Static(&'static [&'static str]),
    Kind(EntityKind),
    StakeholderNames,
    AllTags,
}

#[derive(Debug, Clone)]
pub(crate) struct Filter {
    pub label: &'static str,
    pub field: &'static str,
    pub options: Option<Options>,
}

impl Filter {
    const fn text(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            options: None,
        }
    }

    const fn options(label: &'static str, field: &'static str, options: Options) -> Self {
        Self {
            label,
            field,
            options: Some(options),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Field {
    /// DOM id of the input or select toggle prefix
    pub id: &'static str,
    /// Record field or list it fills
    pub store: &'static str,
    pub options: Option<Options>,
    pub multi: bool,
}

impl Field {
    pub(crate) const fn text(id: &'static str, store: &'static str) -> Self {
        Self {
            id,
            store,
            options: None,
            multi: false,
        }
    }

    pub(crate) const fn select(id: &'static str, store: &'static str, options: Options) -> Self {
        Self {
            id,
            store,
            options: Some(options),
            multi: false,
        }
    }

    pub(crate) const fn multi(id: &'static str, store: &'static str, options: Options) -> Self {
        Self {
            id,
            store,
            options: Some(options),
            multi: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowActions {
    /// Edit and delete icon buttons
    Icons,
    /// Edit icon plus a kebab menu holding "Delete"
    Kebab,
    /// Text buttons "Edit" and "Delete"
    TextButtons,
}

#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub title: &'static str,
    pub noun: &'static str,
    pub plural: &'static str,
    pub path: &'static str,
    pub form_id: &'static str,
    pub key_field: &'static str,
    pub tab: Option<&'static str>,
    pub columns: Vec<Column>,
    pub filters: Vec<Filter>,
    pub form: Vec<Field>,
    pub actions: RowActions,
    pub expandable: bool,
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct Record {
    pub id: u64,
    pub fields: BTreeMap<String, String>,
    pub lists: BTreeMap<String, Vec<String>>,
    pub children: Vec<Record>,
}

impl Record {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    pub fn list(&self, name: &str) -> &[String] {
        self.lists.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn cell(&self, source: Source) -> String {
        match source {
            Source::Field(name) => self.field(name).to_string(),
            Source::ListLen(name) => self.list(name).len().to_string(),
            Source::ChildCount => self.children.len().to_string(),
        }
    }

    fn filter_values(&self, field: &str) -> Vec<&str> {
        match self.lists.get(field) {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => vec![self.field(field)],
        }
    }
}

/// Active filter chip: category index and value
pub(crate) type Chip = (usize, String);

#[derive(Debug, Clone, Default)]
pub(crate) struct Model {
    next_id: u64,
    pub records: BTreeMap<EntityKind, Vec<Record>>,
}

impl Model {
    pub fn seeded() -> Self {
        let mut model = Self::default();
        for (rank, (name, tags)) in DEFAULT_TAGS.iter().enumerate() {
            let id = model.insert(
                EntityKind::TagType,
                &[
                    ("name", (*name).to_string()),
                    ("rank", (rank + 1).to_string()),
                    ("color", COLORS[rank % COLORS.len()].to_string()),
                ],
                &[],
            );
            for tag in *tags {
                model.add_child(id, tag);
            }
        }
        model
    }

    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn insert(
        &mut self,
        kind: EntityKind,
        fields: &[(&str, String)],
        lists: &[(&str, Vec<String>)],
    ) -> u64 {
        let id = self.next_id();
        let record = Record {
            id,
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            lists: lists
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            children: Vec::new(),
        };
        self.records.entry(kind).or_default().push(record);
        id
    }

    pub fn add_child(&mut self, parent: u64, name: &str) -> Option<u64> {
        let id = self.next_id();
        let parent = self
            .records
            .get_mut(&EntityKind::TagType)?
            .iter_mut()
            .find(|r| r.id == parent)?;
        let mut tag = Record {
            id,
            ..Record::default()
        };
        tag.fields.insert("name".into(), name.to_string());
        parent.children.push(tag);
        Some(id)
    }

    pub fn all(&self, kind: EntityKind) -> &[Record] {
        self.records.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn find(&self, kind: EntityKind, id: u64) -> Option<&Record> {
        self.all(kind).iter().find(|r| r.id == id)
    }

    pub fn find_mut(&mut self, kind: EntityKind, id: u64) -> Option<&mut Record> {
        self.records.get_mut(&kind)?.iter_mut().find(|r| r.id == id)
    }

    pub fn find_by_key(&self, kind: EntityKind, key: &str) -> Option<&Record> {
        let key_field = kind.layout().key_field;
        self.all(kind).iter().find(|r| r.field(key_field) == key)
    }

    pub fn remove(&mut self, kind: EntityKind, id: u64) -> Option<Record> {
        let records = self.records.get_mut(&kind)?;
        let pos = records.iter().position(|r| r.id == id)?;
        Some(records.remove(pos))
    }

    pub fn remove_child(&mut self, parent: u64, child: u64) -> Option<Record> {
        let parent = self.find_mut(EntityKind::TagType, parent)?;
        let pos = parent.children.iter().position(|c| c.id == child)?;
        Some(parent.children.remove(pos))
    }

    pub fn keys(&self, kind: EntityKind) -> Vec<String> {
        let key_field = kind.layout().key_field;
        self.all(kind)
            .iter()
            .map(|r| r.field(key_field).to_string())
            .collect()
    }

    pub fn options(&self, options: Options) -> Vec<String> {
        match options {
            Options::Static(values) => values.iter().map(|v| (*v).to_string()).collect(),
            Options::Kind(kind) => self.keys(kind),
            Options::StakeholderNames => self
                .all(EntityKind::Stakeholder)
                .iter()
                .map(|r| r.field("name").to_string())
                .collect(),
            Options::AllTags => self
                .all(EntityKind::TagType)
                .iter()
                .flat_map(|t| t.children.iter().map(|c| c.field("name").to_string()))
                .collect(),
        }
    }

    /// Records after filters and sort, before paging
    pub fn visible(
        &self,
        kind: EntityKind,
        chips: &[Chip],
        sort: Option<&(String, bool)>,
    ) -> Vec<&Record> {
        let layout = kind.layout();
        let mut rows: Vec<&Record> = self
            .all(kind)
            .iter()
            .filter(|r| matches_chips(r, &layout, chips))
            .collect();

        if let Some((label, ascending)) = sort {
            if let Some(column) = layout.columns.iter().find(|c| c.label == label) {
                let column_kind = ColumnKind::for_column(column.label);
                rows.sort_by(|a, b| {
                    let ord =
                        compare_cells(&a.cell(column.source), &b.cell(column.source), column_kind);
                    if *ascending {
                        ord
                    } else {
                        ord.reverse()
                    }
                });
            }
        }
        rows
    }
}

fn compare_cells(a: &str, b: &str, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Numeric => {
            if let (Ok(x), Ok(y)) = (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
                return x.cmp(&y);
            }
        }
        ColumnKind::Date => {
            if let (Some(x), Some(y)) = (parse_timestamp(a), parse_timestamp(b)) {
                return x.cmp(&y);
            }
        }
        ColumnKind::Text => {}
    }
    collate(&a.trim().to_lowercase(), &b.trim().to_lowercase(), false)
}

fn matches_chips(record: &Record, layout: &Layout, chips: &[Chip]) -> bool {
    let mut by_category: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (category, value) in chips {
        by_category.entry(*category).or_default().push(value);
    }
    by_category.into_iter().all(|(category, wanted)| {
        let Some(filter) = layout.filters.get(category) else {
            return true;
        };
        let values = record.filter_values(filter.field);
        wanted.iter().any(|w| match filter.options {
            Some(_) => values.iter().any(|v| v == w),
            None => {
                let needle = w.to_lowercase();
                values.iter().any(|v| v.to_lowercase().contains(&needle))
            }
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_TAG_TYPES;

    fn services(names: &[&str]) -> Model {
        let mut model = Model::default();
        for name in names {
            model.insert(
                EntityKind::BusinessService,
                &[("name", (*name).to_string()), ("description", format!("{name} desc"))],
                &[],
            );
        }
        model
    }

    #[test]
    fn test_text_chips_are_case_insensitive_substrings() {
        let model = services(&["Payroll", "Billing", "payments"]);
        let chips = vec![(0, "PAY".to_string())];
        let rows = model.visible(EntityKind::BusinessService, &chips, None);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_chips_or_within_and_across_categories() {
        let model = services(&["alpha", "beta", "gamma"]);
        let chips = vec![
            (0, "alpha".to_string()),
            (0, "beta".to_string()),
            (1, "beta desc".to_string()),
        ];
        let rows = model.visible(EntityKind::BusinessService, &chips, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field("name"), "beta");
    }

    #[test]
    fn test_sort_numeric_column() {
        let mut model = Model::default();
        for (name, rank) in [("a", "10"), ("b", "2"), ("c", "33")] {
            model.insert(
                EntityKind::TagType,
                &[("name", name.to_string()), ("rank", rank.to_string())],
                &[],
            );
        }
        let sort = ("Rank".to_string(), true);
        let rows = model.visible(EntityKind::TagType, &[], Some(&sort));
        let ranks: Vec<&str> = rows.iter().map(|r| r.field("rank")).collect();
        assert_eq!(ranks, vec!["2", "10", "33"]);
    }

    #[test]
    fn test_sort_date_column_by_timestamp() {
        let mut model = Model::default();
        for (file, date) in [
            ("march.csv", "03/01/2023, 08:00:00 AM"),
            ("december.csv", "12/31/2022, 11:59:00 PM"),
            ("november.csv", "11/02/2023, 10:30:00 AM"),
        ] {
            model.insert(
                EntityKind::ApplicationImport,
                &[("filename", file.to_string()), ("date", date.to_string())],
                &[],
            );
        }
        let sort = ("Date".to_string(), true);
        let rows = model.visible(EntityKind::ApplicationImport, &[], Some(&sort));
        let files: Vec<&str> = rows.iter().map(|r| r.field("filename")).collect();
        assert_eq!(files, vec!["december.csv", "march.csv", "november.csv"]);
    }

    #[test]
    fn test_seeded_tag_types() {
        let model = Model::seeded();
        assert_eq!(model.keys(EntityKind::TagType).len(), DEFAULT_TAG_TYPES.len());
        let tags: usize = DEFAULT_TAGS.iter().map(|(_, tags)| tags.len()).sum();
        assert_eq!(model.options(Options::AllTags).len(), tags);
    }

    #[test]
    fn test_kind_lookups() {
        assert_eq!(EntityKind::from_path("/identities"), Some(EntityKind::Credential));
        assert_eq!(EntityKind::from_tab("Tags"), Some(EntityKind::TagType));
        assert_eq!(EntityKind::from_form("job-function"), Some(EntityKind::JobFunction));
        assert_eq!(
            EntityKind::from_path("/applications/application-imports"),
            Some(EntityKind::ApplicationImport)
        );
    }
}
