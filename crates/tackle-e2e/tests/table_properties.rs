//! End-to-end checks of the table, filter and lifecycle helpers against the
//! fake application.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use tackle_e2e::filter::{apply_search_filter, category, clear_all_filters, FilterSlot};
use tackle_e2e::lifecycle::{
    create_multiple_applications, create_multiple_business_services, delete_all_business_services,
    delete_all_job_functions, delete_all_stakeholders, delete_all_tag_types, delete_by_list,
};
use tackle_e2e::mock::{EntityKind, FakeTackle};
use tackle_e2e::models::{business_service, tag};
use tackle_e2e::sort::{verify_sort_asc, verify_sort_desc, ColumnValue};
use tackle_e2e::{Session, Table, TackleDriver};

async fn session() -> (Arc<FakeTackle>, Session) {
    let fake = Arc::new(FakeTackle::new());
    let driver: Arc<dyn TackleDriver> = fake.clone();
    let session = Session::new(driver, fake.config());
    session.login().await.unwrap();
    (fake, session)
}

mod pagination {
    use super::*;

    #[tokio::test]
    async fn eleven_services_leave_one_row_on_page_two() {
        let (_fake, s) = session().await;
        create_multiple_business_services(&s, 11, &[]).await.unwrap();
        business_service::VIEW.open(&s).await.unwrap();
        let table = Table::main(&s);
        table.select_items_per_page(10).await.unwrap();
        table.validate_pagination().await.unwrap();
        table.go_to_page(2).await.unwrap();
        assert_eq!(table.row_count().await.unwrap(), 1);
    }
}

mod columns {
    use super::*;

    #[tokio::test]
    async fn column_data_is_repeatable() {
        let (_fake, s) = session().await;
        create_multiple_business_services(&s, 3, &[]).await.unwrap();
        business_service::VIEW.open(&s).await.unwrap();
        let table = Table::main(&s);
        let first = table.column_data("Name").await.unwrap();
        let second = table.column_data("Name").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    async fn assert_sorts_both_ways(table: &Table<'_>, columns: &[&str]) {
        for &column in columns {
            let reference = table.column_data(column).await.unwrap();
            table.sort_asc(column).await.unwrap();
            verify_sort_asc(&table.column_data(column).await.unwrap(), &reference).unwrap();
            table.sort_desc(column).await.unwrap();
            verify_sort_desc(&table.column_data(column).await.unwrap(), &reference).unwrap();
        }
    }

    #[tokio::test]
    async fn text_numeric_and_date_columns_sort_both_ways() {
        let (fake, s) = session().await;
        tag::VIEW.open(&s).await.unwrap();
        assert_sorts_both_ways(&Table::main(&s), &["Tag type", "Rank", "Tag count"]).await;

        for (file, date) in [
            ("inventory-b.csv", "11/30/2022, 09:15:00 AM"),
            ("inventory-a.csv", "01/05/2023, 10:00:00 PM"),
            ("inventory-d.csv", "07/19/2023, 06:45:00 PM"),
            ("inventory-c.csv", "01/05/2023, 08:00:00 AM"),
        ] {
            fake.seed(
                EntityKind::ApplicationImport,
                &[("filename", file), ("date", date), ("status", "Completed")],
            );
        }
        s.visit("/applications/application-imports").await.unwrap();
        let table = Table::main(&s);
        let dates = table.column_data("Date").await.unwrap();
        assert_eq!(dates.len(), 4);
        assert!(dates.iter().all(|v| matches!(v, ColumnValue::Timestamp(_))));
        assert_sorts_both_ways(&table, &["Date", "Filename"]).await;
    }
}

mod filters {
    use super::*;

    #[tokio::test]
    async fn name_prefix_matches_and_random_text_empties_the_list() {
        let (_fake, s) = session().await;
        let apps = create_multiple_applications(&s, 2).await.unwrap();
        let prefix: String = apps[0].name.chars().take(11).collect();

        apply_search_filter(&s, category::NAME, &[prefix.as_str()], FilterSlot::default())
            .await
            .unwrap();
        Table::main(&s).exists(&apps[0].name).await.unwrap();
        clear_all_filters(&s).await.unwrap();

        let nonsense = tackle_e2e::data::non_matching();
        apply_search_filter(&s, category::NAME, &[nonsense.as_str()], FilterSlot::default())
            .await
            .unwrap();
        s.expect_text("h2", "No applications available").await.unwrap();
        assert!(Table::main(&s).is_empty().await.unwrap());
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn delete_by_list_removes_every_key() {
        let (fake, s) = session().await;
        let services = create_multiple_business_services(&s, 3, &[]).await.unwrap();
        delete_by_list(&s, &services).await.unwrap();
        let left = fake.keys(EntityKind::BusinessService);
        assert!(services.iter().all(|svc| !left.contains(&svc.name)));
    }

    #[tokio::test]
    async fn delete_all_on_empty_lists_never_touches_rows() {
        let (fake, s) = session().await;
        assert_eq!(delete_all_job_functions(&s).await.unwrap(), 0);
        assert_eq!(delete_all_stakeholders(&s).await.unwrap(), 0);
        assert_eq!(delete_all_business_services(&s).await.unwrap(), 0);
        assert!(!fake.was_called("AskDelete"));
    }

    #[tokio::test]
    async fn default_tag_types_survive_cleanup() {
        let (fake, s) = session().await;
        fake.seed(EntityKind::TagType, &[("name", "Scratch"), ("rank", "42")]);
        assert_eq!(delete_all_tag_types(&s).await.unwrap(), 1);
        assert!(!fake.keys(EntityKind::TagType).contains(&"Scratch".to_string()));
        assert_eq!(delete_all_tag_types(&s).await.unwrap(), 0);
    }
}
