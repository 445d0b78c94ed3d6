mod common;

use std::collections::BTreeMap;

use chrono::Utc;
use product_catalog::{
    dto::products::ProductInput,
    entity::products,
    error::AppError,
    routes::params::PageRequest,
    services::product_service,
    state::AppState,
};
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

fn input(category: &str) -> ProductInput {
    ProductInput {
        name: "Phone X".to_string(),
        description: "A phone".to_string(),
        price: 499.0,
        category: category.to_string(),
        brand: Some("Acme".to_string()),
        stock: 3,
        rating: None,
        images: Vec::new(),
        features: Vec::new(),
    }
}

fn product(category: &str, price: f64) -> products::Model {
    products::Model {
        id: Uuid::new_v4(),
        name: format!("Item {price}"),
        description: String::new(),
        price,
        category: category.to_string(),
        brand: None,
        stock: 1,
        rating: 4.0,
        images: Vec::new(),
        features: Vec::new(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
}

#[tokio::test]
async fn short_search_terms_never_reach_the_database() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = AppState::new(orm, "Test Catalog");

    for terms in ["", "a", "  b  "] {
        let err = product_service::search_products(&state, terms, PageRequest::default())
            .await
            .expect_err("too short");
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors, vec!["Search term must be at least 2 characters"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    assert!(common::transaction_log(state.orm).is_empty());
}

#[tokio::test]
async fn products_cannot_point_at_a_missing_category() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(0)]])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let err = product_service::create_product(&state, input("ghost"))
        .await
        .expect_err("unknown category");
    match err {
        AppError::Validation(errors) => assert!(errors[0].contains("ghost"), "{errors:?}"),
        other => panic!("unexpected error: {other:?}"),
    }

    let log = common::transaction_log(state.orm);
    assert_eq!(log.len(), 1);
    assert!(!format!("{log:?}").contains("INSERT"));
}

#[tokio::test]
async fn listing_reports_pagination_for_the_whole_result() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(14)]])
        .append_query_results([vec![
            product("elektronik", 10.0),
            product("elektronik", 20.0),
        ]])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let page = PageRequest::parse(Some("2"));
    let result = product_service::list_products(
        &state,
        &Default::default(),
        Default::default(),
        page,
    )
    .await
    .expect("listing");

    assert_eq!(result.products.len(), 2);
    assert_eq!(result.pagination.page, Some(2));
    assert_eq!(result.pagination.total, Some(14));
    assert_eq!(result.pagination.pages, Some(2));

    let log = format!("{:?}", common::transaction_log(state.orm));
    assert!(log.contains("LIMIT"), "{log}");
    assert!(log.contains("OFFSET"), "{log}");
}

#[tokio::test]
async fn pages_past_the_end_are_empty_without_a_fetch() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(5)]])
        .into_connection();
    let state = AppState::new(orm, "Test Catalog");

    let result = product_service::list_products(
        &state,
        &Default::default(),
        Default::default(),
        PageRequest::parse(Some("3")),
    )
    .await
    .expect("listing");

    assert!(result.products.is_empty());
    assert_eq!(result.pagination.total, Some(5));
    assert_eq!(common::transaction_log(state.orm).len(), 1);
}
