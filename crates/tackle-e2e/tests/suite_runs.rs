//! The built-in suites run clean against the fake application.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use tackle_e2e::data::DEFAULT_TAG_TYPES;
use tackle_e2e::harness::NoopObserver;
use tackle_e2e::mock::{EntityKind, FakeTackle};
use tackle_e2e::{suites, Session, SuiteRunner, TackleConfig, TackleDriver};

fn fake_session() -> (Arc<FakeTackle>, Session) {
    let fake = Arc::new(FakeTackle::new());
    let driver: Arc<dyn TackleDriver> = fake.clone();
    let session = Session::new(driver, fake.config());
    (fake, session)
}

#[tokio::test]
async fn every_registered_suite_passes_and_leaves_no_fixtures() {
    let (fake, session) = fake_session();
    let mut all = suites::registry();
    let results = SuiteRunner::new()
        .run_all(&session, &mut all, &mut NoopObserver)
        .await;
    assert_eq!(results.len(), all.len());
    for suite in &results {
        assert!(suite.all_passed(), "{suite:?}");
    }
    assert!(fake.keys(EntityKind::Application).is_empty());
    assert!(fake.keys(EntityKind::BusinessService).is_empty());
    assert_eq!(fake.keys(EntityKind::TagType).len(), DEFAULT_TAG_TYPES.len());
}

#[tokio::test]
async fn grep_tags_from_config_select_suites() {
    let (fake, session) = fake_session();
    let config = TackleConfig::new().with_grep_tags(["@tier2"]);
    let mut all = suites::registry();
    let results = SuiteRunner::from_config(&config)
        .run_all(&session, &mut all, &mut NoopObserver)
        .await;
    let ran: Vec<&str> = results
        .iter()
        .filter(|r| !r.skipped)
        .map(|r| r.suite_name.as_str())
        .collect();
    assert_eq!(ran, vec!["application-inventory-filters"]);
    assert_eq!(results.iter().filter(|r| r.skipped).count(), 2);
    assert!(fake.keys(EntityKind::Application).is_empty());
}
