use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::{
    config::{POPULAR_LIMIT, SIMILAR_LIMIT},
    dto::products::{ProductInput, ProductPage},
    entity::products::{ActiveModel, Column, Entity as Products},
    error::{AppError, AppResult},
    models::Product,
    response::Meta,
    routes::params::{PageRequest, ProductFilter, ProductSort},
    services::category_service,
    state::AppState,
};

/// Minimum length of a full-text search term.
pub const MIN_SEARCH_LEN: usize = 2;

/// Translate a filter and sort order into a product query. All filters are
/// ANDed; ties are broken by id so pages are stable.
pub fn build_product_query(filter: &ProductFilter, sort: ProductSort) -> Select<Products> {
    let mut condition = Condition::all();

    if let Some(category) = &filter.category {
        condition = condition.add(Column::Category.eq(category.as_str()));
    }

    if let Some(min_price) = filter.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = filter.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(min_rating) = filter.min_rating {
        condition = condition.add(Column::Rating.gte(min_rating));
    }

    if filter.in_stock {
        condition = condition.add(Column::Stock.gt(0));
    }

    if let Some(brand) = &filter.brand {
        let pattern = format!("%{}%", escape_like(brand));
        condition = condition.add(Expr::col(Column::Brand).ilike(pattern));
    }

    if let Some(search) = &filter.search {
        condition = condition.add(Expr::cust_with_values(
            "\"products\".\"search_vector\" @@ plainto_tsquery('simple', $1)",
            [search.as_str()],
        ));
    }

    let finder = Products::find().filter(condition);
    let finder = match sort {
        ProductSort::Newest => finder.order_by_desc(Column::CreatedAt),
        ProductSort::PriceLow => finder.order_by_asc(Column::Price),
        ProductSort::PriceHigh => finder.order_by_desc(Column::Price),
        ProductSort::Rating => finder.order_by_desc(Column::Rating),
        ProductSort::Name => finder.order_by_asc(Column::Name),
    };
    finder.order_by_asc(Column::Id)
}

pub async fn list_products(
    state: &AppState,
    filter: &ProductFilter,
    sort: ProductSort,
    page: PageRequest,
) -> AppResult<ProductPage> {
    let finder = build_product_query(filter, sort);

    let total = finder.clone().count(state.db()).await?;

    // Past the last page there is nothing to fetch.
    let products = if page.offset() >= total {
        Vec::new()
    } else {
        finder
            .limit(page.limit())
            .offset(page.offset())
            .all(state.db())
            .await?
            .into_iter()
            .map(Product::from)
            .collect()
    };

    let pagination = Meta::new(page.page, page.limit(), total);
    Ok(ProductPage {
        products,
        pagination,
    })
}

/// Reject a search term that is too short. Runs before any query.
pub fn validate_search_term(terms: &str) -> AppResult<&str> {
    let terms = terms.trim();
    if terms.chars().count() < MIN_SEARCH_LEN {
        return Err(AppError::validation(
            "Search term must be at least 2 characters",
        ));
    }
    Ok(terms)
}

pub async fn search_products(
    state: &AppState,
    terms: &str,
    page: PageRequest,
) -> AppResult<ProductPage> {
    let terms = validate_search_term(terms)?;
    let filter = ProductFilter::search(terms);
    list_products(state, &filter, ProductSort::default(), page).await
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let result = Products::find_by_id(id)
        .one(state.db())
        .await?
        .map(Product::from);
    match result {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound),
    }
}

/// Up to `SIMILAR_LIMIT` other products from the same category.
pub async fn similar_products(state: &AppState, product: &Product) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .filter(Column::Category.eq(product.category.as_str()))
        .filter(Column::Id.ne(product.id))
        .order_by_desc(Column::CreatedAt)
        .limit(SIMILAR_LIMIT)
        .all(state.db())
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

pub async fn popular_products(state: &AppState) -> AppResult<Vec<Product>> {
    let items = build_product_query(&ProductFilter::default(), ProductSort::Rating)
        .limit(POPULAR_LIMIT)
        .all(state.db())
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

/// Distinct, non-blank brands in alphabetical order.
pub async fn list_brands(state: &AppState) -> AppResult<Vec<String>> {
    let brands: Vec<Option<String>> = Products::find()
        .select_only()
        .column(Column::Brand)
        .distinct()
        .filter(Column::Brand.is_not_null())
        .order_by_asc(Column::Brand)
        .into_tuple()
        .all(state.db())
        .await?;

    Ok(brands
        .into_iter()
        .flatten()
        .filter(|brand| !brand.trim().is_empty())
        .collect())
}

pub async fn create_product(state: &AppState, input: ProductInput) -> AppResult<Product> {
    ensure_category(state, &input.category).await?;

    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        category: Set(input.category),
        brand: Set(input.brand),
        stock: Set(input.stock),
        rating: Set(input.rating.unwrap_or(0.0)),
        images: Set(input.images),
        features: Set(input.features),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let product = active.insert(state.db()).await?;

    tracing::info!(product_id = %product.id, category = %product.category, "product created");
    Ok(Product::from(product))
}

pub async fn update_product(state: &AppState, id: Uuid, input: ProductInput) -> AppResult<Product> {
    let existing = Products::find_by_id(id).one(state.db()).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    ensure_category(state, &input.category).await?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(input.name);
    active.description = Set(input.description);
    active.price = Set(input.price);
    active.category = Set(input.category);
    active.brand = Set(input.brand);
    active.stock = Set(input.stock);
    // An empty rating field keeps the stored rating.
    if let Some(rating) = input.rating {
        active.rating = Set(rating);
    }
    active.images = Set(input.images);
    active.features = Set(input.features);
    active.updated_at = Set(Utc::now().into());

    let product = active.update(state.db()).await?;

    tracing::info!(product_id = %product.id, "product updated");
    Ok(Product::from(product))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<()> {
    let result = Products::delete_by_id(id).exec(state.db()).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(())
}

async fn ensure_category(state: &AppState, slug: &str) -> AppResult<()> {
    if category_service::category_exists(state.db(), slug).await? {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Category \"{slug}\" does not exist"
        )))
    }
}

/// Escape LIKE wildcards so user input only matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
