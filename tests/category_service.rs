mod common;

use std::collections::BTreeMap;

use chrono::Utc;
use product_catalog::{
    dto::categories::CategoryInput,
    entity::categories,
    error::AppError,
    services::category_service,
    state::AppState,
};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

fn category(id: Uuid, name: &str, slug: &str) -> categories::Model {
    categories::Model {
        id,
        name: name.to_string(),
        description: None,
        slug: slug.to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
}

#[tokio::test]
async fn delete_is_blocked_while_products_reference_the_slug() {
    let id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category(id, "Elektronik", "elektronik")]])
        .append_query_results([vec![count_row(1)]])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let err = category_service::delete_category(&state, id)
        .await
        .expect_err("delete must be blocked");
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // Lookup and count only: nothing was deleted.
    let log = common::transaction_log(state.orm);
    assert_eq!(log.len(), 2);
    let count_statement = format!("{:?}", log[1]);
    assert!(count_statement.contains("elektronik"), "{count_statement}");
    assert!(!count_statement.contains(&id.to_string()), "{count_statement}");
    assert!(!format!("{log:?}").contains("DELETE"));
}

#[tokio::test]
async fn delete_goes_through_when_no_products_reference_the_slug() {
    let id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category(id, "Books", "books")]])
        .append_query_results([vec![count_row(0)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    category_service::delete_category(&state, id)
        .await
        .expect("delete succeeds");

    let log = common::transaction_log(state.orm);
    assert_eq!(log.len(), 3);
    let delete_statement = format!("{:?}", log[2]);
    assert!(delete_statement.contains("DELETE"), "{delete_statement}");
}

#[tokio::test]
async fn deleting_an_unknown_category_is_not_found() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<categories::Model>::new()])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let err = category_service::delete_category(&state, Uuid::new_v4())
        .await
        .expect_err("unknown id");
    assert!(matches!(err, AppError::NotFound), "{err:?}");
    assert_eq!(common::transaction_log(state.orm).len(), 1);
}

#[tokio::test]
async fn counts_come_from_a_single_joined_query() {
    let now = Utc::now();
    let rows = vec![
        BTreeMap::from([
            ("id", Value::from(Uuid::new_v4())),
            ("name", Value::from("Books")),
            ("description", Value::String(None)),
            ("slug", Value::from("books")),
            ("created_at", Value::from(now.fixed_offset())),
            ("updated_at", Value::from(now.fixed_offset())),
            ("product_count", Value::BigInt(Some(0))),
        ]),
        BTreeMap::from([
            ("id", Value::from(Uuid::new_v4())),
            ("name", Value::from("Elektronik")),
            ("description", Value::from("Gadgets")),
            ("slug", Value::from("elektronik")),
            ("created_at", Value::from(now.fixed_offset())),
            ("updated_at", Value::from(now.fixed_offset())),
            ("product_count", Value::BigInt(Some(3))),
        ]),
    ];
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let categories = category_service::list_with_product_counts(&state)
        .await
        .expect("aggregated list");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].category.slug, "books");
    assert_eq!(categories[0].product_count, 0);
    assert_eq!(categories[1].product_count, 3);
    assert_eq!(categories[1].category.description.as_deref(), Some("Gadgets"));

    let log = common::transaction_log(state.orm);
    assert_eq!(log.len(), 1, "one query for all categories");
    // Debug output escapes the identifier quotes.
    let statement = format!("{:?}", log[0]).replace('\\', "");
    assert!(statement.contains("LEFT JOIN"), "{statement}");
    assert!(statement.contains("GROUP BY"), "{statement}");
    assert!(statement.contains(r#""products"."category""#), "{statement}");
    assert!(statement.contains(r#""categories"."slug""#), "{statement}");
}

fn rename_to(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn rename_moves_products_to_the_new_slug() {
    let id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category(id, "Elektronik", "elektronik")]])
        .append_query_results([vec![count_row(0)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .append_query_results([vec![category(
            id,
            "Consumer Electronics",
            "consumer-electronics",
        )]])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let renamed = category_service::update_category(&state, id, rename_to("Consumer Electronics"))
        .await
        .expect("rename");
    assert_eq!(renamed.slug, "consumer-electronics");

    let log = format!("{:?}", common::transaction_log(state.orm)).replace('\\', "");
    assert!(log.contains(r#"UPDATE "products""#), "{log}");
    assert!(log.contains("consumer-electronics"), "{log}");
}

#[tokio::test]
async fn rename_leaves_products_when_another_category_shares_the_slug() {
    let id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category(id, "Elektronik", "elektronik")]])
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![category(
            id,
            "Consumer Electronics",
            "consumer-electronics",
        )]])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let renamed = category_service::update_category(&state, id, rename_to("Consumer Electronics"))
        .await
        .expect("rename");
    assert_eq!(renamed.slug, "consumer-electronics");

    let log = format!("{:?}", common::transaction_log(state.orm)).replace('\\', "");
    assert!(!log.contains(r#"UPDATE "products""#), "{log}");
    assert!(log.contains(r#"UPDATE "categories""#), "{log}");
}
