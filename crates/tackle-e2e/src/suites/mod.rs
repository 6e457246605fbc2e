//! Built-in suites and their registry.

pub mod application_filters;
pub mod business_services_pagination;
pub mod tag_types_sort;

pub use application_filters::ApplicationFilters;
pub use business_services_pagination::BusinessServicesPagination;
pub use tag_types_sort::TagTypesSort;

use crate::harness::Suite;
use crate::result::{TackleError, TackleResult};
use crate::session::{Session, DEFAULT_PRESERVED_COOKIE};
use serde::Serialize;

/// Name, tags and tests of a registered suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteInfo {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub tests: &'static [&'static str],
}

/// Every built-in suite, in run order
#[must_use]
pub fn registry() -> Vec<Box<dyn Suite>> {
    vec![
        Box::new(BusinessServicesPagination::default()),
        Box::new(ApplicationFilters::default()),
        Box::new(TagTypesSort::default()),
    ]
}

/// Description of every built-in suite
#[must_use]
pub fn catalog() -> Vec<SuiteInfo> {
    registry()
        .iter()
        .map(|suite| SuiteInfo {
            name: suite.name(),
            tags: suite.tags(),
            tests: suite.tests(),
        })
        .collect()
}

/// The suites named in `names`, in registry order; all suites when empty
pub fn select(names: &[String]) -> TackleResult<Vec<Box<dyn Suite>>> {
    let all = registry();
    if let Some(unknown) = names
        .iter()
        .find(|name| !all.iter().any(|suite| suite.name() == name.as_str()))
    {
        return Err(TackleError::config(format!("unknown suite `{unknown}`")));
    }
    Ok(all
        .into_iter()
        .filter(|suite| names.is_empty() || names.iter().any(|n| n == suite.name()))
        .collect())
}

/// Log in and keep the login cookie across tests
pub(crate) async fn start(session: &Session) -> TackleResult<()> {
    session.login().await?;
    session.preserve_cookies(DEFAULT_PRESERVED_COOKIE)
}

pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> TackleResult<()> {
    if condition {
        Ok(())
    } else {
        Err(TackleError::assertion(message()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        let catalog = catalog();
        let mut names: Vec<&str> = catalog.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
        assert!(catalog.iter().all(|s| !s.tests.is_empty()));
    }

    #[test]
    fn test_select_by_name() {
        let picked = select(&["tag-types-sort".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name(), "tag-types-sort");
        assert_eq!(select(&[]).unwrap().len(), registry().len());
        assert!(matches!(
            select(&["nope".to_string()]),
            Err(TackleError::Config { .. })
        ));
    }
}
