use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::categories::CategoryInput,
    entity::{
        categories::{ActiveModel, Column, Entity as Categories},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{Category, CategoryWithCount, slugify},
    state::AppState,
};

/// Shown when a category still has products pointing at its slug.
pub const CATEGORY_IN_USE: &str =
    "This category still has products. Delete or move them before deleting the category.";

#[derive(Debug, FromQueryResult)]
struct CategoryCountRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    slug: String,
    created_at: DateTimeWithTimeZone,
    updated_at: DateTimeWithTimeZone,
    product_count: i64,
}

/// Categories ordered by name, for navigation menus and select boxes.
pub async fn list_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let items = Categories::find()
        .order_by_asc(Column::Name)
        .all(state.db())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(items)
}

/// Every category with the number of products referencing its slug, in one
/// `LEFT JOIN ... GROUP BY` query. Categories without products count 0.
pub async fn list_with_product_counts(state: &AppState) -> AppResult<Vec<CategoryWithCount>> {
    let rows = Categories::find()
        .select_only()
        .columns([
            Column::Id,
            Column::Name,
            Column::Description,
            Column::Slug,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .column_as(Expr::col((Products, ProductCol::Id)).count(), "product_count")
        .left_join(Products)
        .group_by(Column::Id)
        .order_by_asc(Column::Name)
        .into_model::<CategoryCountRow>()
        .all(state.db())
        .await?;

    Ok(rows.into_iter().map(category_with_count).collect())
}

/// Number of products whose `category` equals `slug`.
pub async fn count_products_in_category<C>(db: &C, slug: &str) -> AppResult<u64>
where
    C: ConnectionTrait,
{
    let count = Products::find()
        .filter(ProductCol::Category.eq(slug))
        .count(db)
        .await?;
    Ok(count)
}

pub async fn category_exists<C>(db: &C, slug: &str) -> AppResult<bool>
where
    C: ConnectionTrait,
{
    let count = Categories::find()
        .filter(Column::Slug.eq(slug))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<Category> {
    let result = Categories::find_by_id(id)
        .one(state.db())
        .await?
        .map(Category::from);
    match result {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_category(state: &AppState, input: CategoryInput) -> AppResult<Category> {
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        slug: Set(slugify(&input.name)),
        name: Set(input.name),
        description: Set(input.description),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let category = active.insert(state.db()).await?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
    Ok(Category::from(category))
}

/// Update name and description, regenerating the slug. Products that
/// referenced the old slug follow the rename in the same transaction,
/// unless another category still has that slug.
pub async fn update_category(
    state: &AppState,
    id: Uuid,
    input: CategoryInput,
) -> AppResult<Category> {
    let txn = state.orm.begin().await?;

    let existing = Categories::find_by_id(id).one(&txn).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let old_slug = existing.slug.clone();
    let new_slug = slugify(&input.name);
    let now = Utc::now();

    if new_slug != old_slug {
        // Products stay put while another category still owns the old slug.
        let shared = Categories::find()
            .filter(Column::Slug.eq(old_slug.as_str()))
            .filter(Column::Id.ne(id))
            .count(&txn)
            .await?
            > 0;

        if shared {
            tracing::info!(
                category_id = %id,
                slug = %old_slug,
                "old slug still in use, products not moved"
            );
        } else {
            let moved = Products::update_many()
                .col_expr(ProductCol::Category, Expr::value(new_slug.clone()))
                .col_expr(ProductCol::UpdatedAt, Expr::value(now))
                .filter(ProductCol::Category.eq(old_slug.as_str()))
                .exec(&txn)
                .await?;
            tracing::info!(
                category_id = %id,
                from = %old_slug,
                to = %new_slug,
                products = moved.rows_affected,
                "category slug changed"
            );
        }
    }

    let mut active: ActiveModel = existing.into();
    active.name = Set(input.name);
    active.description = Set(input.description);
    active.slug = Set(new_slug);
    active.updated_at = Set(now.into());
    let category = active.update(&txn).await?;

    txn.commit().await?;

    Ok(Category::from(category))
}

/// Delete a category unless products still reference it. Products point at
/// the slug, so the guard counts by slug and the delete goes by id.
pub async fn delete_category(state: &AppState, id: Uuid) -> AppResult<()> {
    let category = Categories::find_by_id(id).one(state.db()).await?;
    let category = match category {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let product_count = count_products_in_category(state.db(), &category.slug).await?;
    if product_count > 0 {
        tracing::warn!(
            category_id = %id,
            slug = %category.slug,
            product_count,
            "category delete blocked"
        );
        return Err(AppError::Conflict(CATEGORY_IN_USE.to_string()));
    }

    let result = Categories::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(category_id = %id, "category deleted");
    Ok(())
}

fn category_with_count(row: CategoryCountRow) -> CategoryWithCount {
    CategoryWithCount {
        category: Category {
            id: row.id,
            name: row.name,
            description: row.description,
            slug: row.slug,
            created_at: row.created_at.with_timezone(&Utc),
            updated_at: row.updated_at.with_timezone(&Utc),
        },
        product_count: row.product_count,
    }
}
