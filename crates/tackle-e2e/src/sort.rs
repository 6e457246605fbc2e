//! Column value coercion and sort verification.
//!
//! Cells are coerced by column name: a fixed set of count-like columns are
//! integers, the `Date` column is a Unix-millisecond timestamp and everything
//! else is trimmed lowercase text. The sort oracle compares with a
//! locale-style collation that ignores case and punctuation and, when every
//! reference value is numeric, compares digit runs by value.

use crate::result::{TackleError, TackleResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Columns whose cells hold integers
pub const NUMERIC_COLUMNS: &[&str] = &[
    "Group count",
    "Member count",
    "Tag count",
    "Rank",
    "Criticality",
    "Priority",
    "Confidence",
];

/// Column whose cells hold dates
pub const DATE_COLUMN: &str = "Date";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%b %d, %Y, %I:%M %p",
    "%b %d, %Y %I:%M %p",
    "%d %b %Y, %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y"];

// =============================================================================
// COERCION
// =============================================================================

/// Coercion rule for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer cells
    Numeric,
    /// Date cells, compared as timestamps
    Date,
    /// Lowercased text
    Text,
}

impl ColumnKind {
    /// Rule for a column display name; unknown columns are text
    #[must_use]
    pub fn for_column(name: &str) -> Self {
        if NUMERIC_COLUMNS.contains(&name) {
            Self::Numeric
        } else if name == DATE_COLUMN {
            Self::Date
        } else {
            Self::Text
        }
    }
}

/// A coerced cell value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnValue {
    /// Integer cell
    Number(i64),
    /// Date cell as Unix milliseconds
    Timestamp(i64),
    /// Lowercased, trimmed text
    Text(String),
}

impl ColumnValue {
    /// Coerce a raw cell; `None` for empty cells
    #[must_use]
    pub fn coerce(kind: ColumnKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let text = || Self::Text(raw.to_lowercase());
        Some(match kind {
            ColumnKind::Text => text(),
            ColumnKind::Numeric => match raw.parse::<i64>() {
                Ok(n) => Self::Number(n),
                Err(_) => {
                    tracing::warn!(cell = raw, "numeric column holds a non-integer cell");
                    text()
                }
            },
            ColumnKind::Date => match parse_timestamp(raw) {
                Some(ms) => Self::Timestamp(ms),
                None => {
                    tracing::warn!(cell = raw, "unparseable date cell");
                    text()
                }
            },
        })
    }

    /// String form used by the collation
    #[must_use]
    pub fn sort_key(&self) -> String {
        match self {
            Self::Number(n) | Self::Timestamp(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Whether the value reads as a number
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Number(_) | Self::Timestamp(_) => true,
            Self::Text(s) => s.trim().parse::<f64>().is_ok(),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) | Self::Timestamp(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Best-effort date parse to Unix milliseconds; naive times are taken as UTC
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.timestamp_millis());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }
    None
}

// =============================================================================
// COLLATION
// =============================================================================

/// Locale-style comparison: case and punctuation are ignored at the primary
/// level; with `numeric`, digit runs compare by value. Ties fall back to
/// lowercase-first, then to the raw strings.
#[must_use]
pub fn collate(a: &str, b: &str, numeric: bool) -> Ordering {
    primary(a, b, numeric)
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn significant(s: &str) -> Vec<char> {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn primary(a: &str, b: &str, numeric: bool) -> Ordering {
    let a = significant(a);
    let b = significant(b);
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if numeric && a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let start_a = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let start_b = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let ord = compare_digit_runs(&a[start_a..i], &b[start_b..j]);
            if ord != Ordering::Equal {
                return ord;
            }
            continue;
        }
        let ord = fold(a[i]).cmp(&fold(b[j]));
        if ord != Ordering::Equal {
            return ord;
        }
        i += 1;
        j += 1;
    }
    (a.len() - i).cmp(&(b.len() - j))
}

fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let trim = |run: &[char]| -> Vec<char> {
        let first = run.iter().position(|&c| c != '0').unwrap_or(run.len());
        run[first..].to_vec()
    };
    let (a, b) = (trim(a), trim(b));
    a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in significant(a).into_iter().zip(significant(b)) {
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

// =============================================================================
// SORT VERIFICATION
// =============================================================================

/// Sort direction reported by a column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// `aria-sort` value for the direction
    #[must_use]
    pub const fn aria(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Expected order of `reference` in `direction`; `reference` is not modified
#[must_use]
pub fn expected_order(reference: &[ColumnValue], direction: SortDirection) -> Vec<ColumnValue> {
    let numeric = reference.iter().all(ColumnValue::is_numeric);
    let mut sorted = reference.to_vec();
    sorted.sort_by(|a, b| {
        let ord = collate(&a.sort_key(), &b.sort_key(), numeric);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

fn verify(
    observed: &[ColumnValue],
    reference: &[ColumnValue],
    direction: SortDirection,
) -> TackleResult<()> {
    let expected = expected_order(reference, direction);
    if observed == expected.as_slice() {
        return Ok(());
    }
    let first_diff = observed
        .iter()
        .zip(&expected)
        .position(|(o, e)| o != e)
        .unwrap_or_else(|| observed.len().min(expected.len()));
    let render = |values: &[ColumnValue]| {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(TackleError::assertion(format!(
        "column is not sorted {} (first difference at index {first_diff}): \
         expected [{}], observed [{}]",
        direction.aria(),
        render(&expected),
        render(observed)
    )))
}

/// Assert `observed` is `reference` sorted ascending
pub fn verify_sort_asc(observed: &[ColumnValue], reference: &[ColumnValue]) -> TackleResult<()> {
    verify(observed, reference, SortDirection::Ascending)
}

/// Assert `observed` is `reference` sorted descending
pub fn verify_sort_desc(observed: &[ColumnValue], reference: &[ColumnValue]) -> TackleResult<()> {
    verify(observed, reference, SortDirection::Descending)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(values: &[&str]) -> Vec<ColumnValue> {
        values.iter().map(|v| ColumnValue::Text((*v).to_string())).collect()
    }

    mod coercion_tests {
        use super::*;

        #[test]
        fn test_kind_by_column_name() {
            assert_eq!(ColumnKind::for_column("Tag count"), ColumnKind::Numeric);
            assert_eq!(ColumnKind::for_column("Rank"), ColumnKind::Numeric);
            assert_eq!(ColumnKind::for_column("Date"), ColumnKind::Date);
            assert_eq!(ColumnKind::for_column("Name"), ColumnKind::Text);
            assert_eq!(ColumnKind::for_column("rank"), ColumnKind::Text);
        }

        #[test]
        fn test_empty_cells_skipped() {
            assert_eq!(ColumnValue::coerce(ColumnKind::Text, "   "), None);
            assert_eq!(ColumnValue::coerce(ColumnKind::Numeric, ""), None);
        }

        #[test]
        fn test_text_is_trimmed_lowercase() {
            assert_eq!(
                ColumnValue::coerce(ColumnKind::Text, "  Payroll App "),
                Some(ColumnValue::Text("payroll app".into()))
            );
        }

        #[test]
        fn test_numeric() {
            assert_eq!(
                ColumnValue::coerce(ColumnKind::Numeric, " 12 "),
                Some(ColumnValue::Number(12))
            );
            assert_eq!(
                ColumnValue::coerce(ColumnKind::Numeric, "n/a"),
                Some(ColumnValue::Text("n/a".into()))
            );
        }

        #[test]
        fn test_dates() {
            let iso = parse_timestamp("2022-03-15 10:22:33").unwrap();
            assert_eq!(iso, 1_647_339_753_000);
            assert_eq!(parse_timestamp("2022-03-15T10:22:33Z"), Some(iso));
            assert_eq!(parse_timestamp("03/15/2022, 10:22:33 AM"), Some(iso));
            assert!(parse_timestamp("2022-03-16").unwrap() > iso);
            assert_eq!(parse_timestamp("yesterday"), None);
        }

        #[test]
        fn test_unparseable_date_falls_back_to_text() {
            assert_eq!(
                ColumnValue::coerce(ColumnKind::Date, "Pending"),
                Some(ColumnValue::Text("pending".into()))
            );
        }
    }

    mod collation_tests {
        use super::*;

        #[test]
        fn test_case_and_punctuation_ignored() {
            assert_eq!(primary("a-b", "AB", false), Ordering::Equal);
            assert_eq!(collate("a z", "ab", false), Ordering::Greater);
            assert_eq!(collate("apple", "Banana", false), Ordering::Less);
        }

        #[test]
        fn test_lowercase_first_on_ties() {
            assert_eq!(collate("abc", "Abc", false), Ordering::Less);
        }

        #[test]
        fn test_numeric_digit_runs() {
            assert_eq!(collate("item2", "item10", true), Ordering::Less);
            assert_eq!(collate("item2", "item10", false), Ordering::Greater);
            assert_eq!(primary("007", "7", true), Ordering::Equal);
        }
    }

    mod verification_tests {
        use super::*;

        #[test]
        fn test_asc_text() {
            let reference = texts(&["charlie", "alpha", "bravo"]);
            verify_sort_asc(&texts(&["alpha", "bravo", "charlie"]), &reference).unwrap();
            assert!(verify_sort_asc(&texts(&["bravo", "alpha", "charlie"]), &reference).is_err());
        }

        #[test]
        fn test_desc_numbers() {
            let reference: Vec<ColumnValue> =
                [3, 10, 1].into_iter().map(ColumnValue::Number).collect();
            let observed: Vec<ColumnValue> =
                [10, 3, 1].into_iter().map(ColumnValue::Number).collect();
            verify_sort_desc(&observed, &reference).unwrap();
        }

        #[test]
        fn test_numeric_text_uses_numeric_collation() {
            let reference = texts(&["10", "9", "100"]);
            verify_sort_asc(&texts(&["9", "10", "100"]), &reference).unwrap();
        }

        #[test]
        fn test_mixed_text_is_lexical() {
            let reference = texts(&["app10", "app9", "x"]);
            verify_sort_asc(&texts(&["app10", "app9", "x"]), &reference).unwrap();
        }

        #[test]
        fn test_reference_untouched() {
            let reference = texts(&["b", "a"]);
            let _ = expected_order(&reference, SortDirection::Ascending);
            assert_eq!(reference, texts(&["b", "a"]));
        }

        #[test]
        fn test_length_mismatch_reported() {
            let err = verify_sort_asc(&texts(&["a"]), &texts(&["a", "b"])).unwrap_err();
            assert!(err.to_string().contains("index 1"));
        }
    }

    proptest! {
        #[test]
        fn prop_collate_is_antisymmetric(
            a in "[a-zA-Z0-9 ._-]{0,12}",
            b in "[a-zA-Z0-9 ._-]{0,12}",
            numeric: bool
        ) {
            prop_assert_eq!(collate(&a, &b, numeric), collate(&b, &a, numeric).reverse());
        }

        #[test]
        fn prop_collate_total_order_only_equal_for_identical(
            a in "[a-zA-Z0-9 -]{0,10}",
            b in "[a-zA-Z0-9 -]{0,10}"
        ) {
            prop_assert_eq!(collate(&a, &b, false) == Ordering::Equal, a == b);
        }

        #[test]
        fn prop_expected_order_is_a_fixed_point(
            values in proptest::collection::vec("[a-z0-9 ]{1,8}", 0..20)
        ) {
            let reference: Vec<ColumnValue> = values.into_iter().map(ColumnValue::Text).collect();
            let asc = expected_order(&reference, SortDirection::Ascending);
            prop_assert!(verify_sort_asc(&asc, &asc).is_ok());
            let desc = expected_order(&reference, SortDirection::Descending);
            prop_assert!(verify_sort_desc(&desc, &reference).is_ok());
        }

        #[test]
        fn prop_numbers_sort_by_value(
            values in proptest::collection::vec(0i64..100_000, 0..20)
        ) {
            let reference: Vec<ColumnValue> =
                values.iter().copied().map(ColumnValue::Number).collect();
            let mut sorted = values;
            sorted.sort_unstable();
            let expected: Vec<ColumnValue> = sorted.into_iter().map(ColumnValue::Number).collect();
            prop_assert_eq!(expected_order(&reference, SortDirection::Ascending), expected);
        }
    }
}
