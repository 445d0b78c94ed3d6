use product_catalog::{
    db::{create_orm_conn, run_migrations},
    dto::{categories::CategoryForm, products::ProductForm},
    error::AppError,
    routes::params::{PageRequest, ProductFilter, ProductQuery, ProductSort},
    services::{category_service, product_service},
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

// End-to-end catalog flow against a real Postgres: categories, filtered
// listings, search, the deletion guard and slug renames.
#[tokio::test]
async fn catalog_browse_and_manage_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let elektronik = create_category(&state, "Elektronik").await?;
    let books = create_category(&state, "Books").await?;
    assert_eq!(elektronik.slug, "elektronik");

    let phone = create_product(&state, "Phone X", "100", "elektronik", "Samsung", "5", "4.5").await?;
    create_product(&state, "Laptop Pro", "200", "elektronik", "Acme", "0", "3").await?;
    create_product(&state, "Tablet Mini", "300", "elektronik", "samsung", "2", "").await?;
    create_product(&state, "Rust Book", "40", "books", "", "9", "5").await?;

    // Category filter plus default sort.
    let query = ProductQuery {
        category: Some("elektronik".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query.filter(), query.sort(), query.page())
        .await?;
    assert_eq!(page.products.len(), 3);
    assert!(page.products.iter().all(|p| p.category == "elektronik"));
    assert_eq!(page.pagination.total, Some(3));
    assert_eq!(page.pagination.pages, Some(1));

    // Price bounds are inclusive.
    let query = ProductQuery {
        min_price: Some("100".into()),
        max_price: Some("200".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query.filter(), query.sort(), query.page())
        .await?;
    let mut prices: Vec<f64> = page.products.iter().map(|p| p.price).collect();
    prices.sort_by(f64::total_cmp);
    assert_eq!(prices, vec![100.0, 200.0]);

    // Highest price first.
    let page = product_service::list_products(
        &state,
        &ProductFilter::default(),
        ProductSort::PriceHigh,
        PageRequest::default(),
    )
    .await?;
    let prices: Vec<f64> = page.products.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![300.0, 200.0, 100.0, 40.0]);

    // Brand matches case-insensitively, in stock excludes zero stock.
    let query = ProductQuery {
        brand: Some("SAMS".into()),
        in_stock: Some("true".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query.filter(), query.sort(), query.page())
        .await?;
    assert_eq!(page.products.len(), 2);

    // A page past the end is empty but still reports the total.
    let page = product_service::list_products(
        &state,
        &ProductFilter::default(),
        ProductSort::default(),
        PageRequest::parse(Some("9")),
    )
    .await?;
    assert!(page.products.is_empty());
    assert_eq!(page.pagination.total, Some(4));

    // Full-text search over name, description and brand.
    let found = product_service::search_products(&state, "phone", PageRequest::default()).await?;
    assert_eq!(found.products.len(), 1);
    assert_eq!(found.products[0].id, phone.id);

    let similar = product_service::similar_products(&state, &phone).await?;
    assert_eq!(similar.len(), 2);
    assert!(similar.iter().all(|p| p.id != phone.id));

    let mut brands = product_service::list_brands(&state).await?;
    brands.sort();
    assert_eq!(brands, vec!["Acme", "Samsung", "samsung"]);

    // Product counts per category.
    let counts = category_service::list_with_product_counts(&state).await?;
    let count_of = |slug: &str| {
        counts
            .iter()
            .find(|c| c.category.slug == slug)
            .map(|c| c.product_count)
    };
    assert_eq!(count_of("books"), Some(1));
    assert_eq!(count_of("elektronik"), Some(3));

    // The deletion guard blocks a category with products.
    let blocked = category_service::delete_category(&state, elektronik.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    // Renaming moves the products to the new slug.
    let renamed = category_service::update_category(
        &state,
        elektronik.id,
        CategoryForm {
            name: "Consumer Electronics".into(),
            description: String::new(),
        }
        .parse()
        .map_err(|errors| anyhow::anyhow!(errors.join("; ")))?,
    )
    .await?;
    assert_eq!(renamed.slug, "consumer-electronics");
    assert_eq!(
        category_service::count_products_in_category(state.db(), "consumer-electronics").await?,
        3
    );
    assert_eq!(
        category_service::count_products_in_category(state.db(), "elektronik").await?,
        0
    );

    // An empty category can go.
    let rust_book = product_service::list_products(
        &state,
        &ProductFilter {
            category: Some("books".into()),
            ..Default::default()
        },
        ProductSort::default(),
        PageRequest::default(),
    )
    .await?;
    product_service::delete_product(&state, rust_book.products[0].id).await?;
    category_service::delete_category(&state, books.id).await?;
    assert!(matches!(
        category_service::get_category(&state, books.id).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE products, categories",
    ))
    .await?;

    Ok(AppState::new(orm, "Test Catalog"))
}

async fn create_category(
    state: &AppState,
    name: &str,
) -> anyhow::Result<product_catalog::models::Category> {
    let input = CategoryForm {
        name: name.into(),
        description: String::new(),
    }
    .parse()
    .map_err(|errors| anyhow::anyhow!(errors.join("; ")))?;
    Ok(category_service::create_category(state, input).await?)
}

async fn create_product(
    state: &AppState,
    name: &str,
    price: &str,
    category: &str,
    brand: &str,
    stock: &str,
    rating: &str,
) -> anyhow::Result<product_catalog::models::Product> {
    let input = ProductForm {
        name: name.into(),
        description: format!("{name} description"),
        price: price.into(),
        category: category.into(),
        brand: brand.into(),
        stock: stock.into(),
        rating: rating.into(),
        ..Default::default()
    }
    .parse()
    .map_err(|errors| anyhow::anyhow!(errors.join("; ")))?;
    Ok(product_service::create_product(state, input).await?)
}
