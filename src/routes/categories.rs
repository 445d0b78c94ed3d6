use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryForm, CategoryListing},
    error::{AppError, AppResult, parse_id},
    extract::Form,
    middleware::page::Page,
    response::ApiResponse,
    services::category_service,
    state::AppState,
    view::View,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}/edit",
            get(edit_category_form)
                .put(update_category)
                .post(update_category),
        )
        .route(
            "/{id}/delete",
            axum::routing::delete(delete_category).post(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories with product counts", body = ApiResponse<CategoryListing>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(State(state): State<AppState>, page: Page) -> AppResult<Response> {
    category_list(&state, &page, StatusCode::OK, &[]).await
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirected to /categories"),
        (status = 400, description = "List re-rendered with validation errors"),
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    page: Page,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => {
            return category_list(&state, &page, StatusCode::BAD_REQUEST, &errors).await;
        }
    };

    category_service::create_category(&state, input).await?;
    Ok(page.redirect("/categories"))
}

#[utoipa::path(
    get,
    path = "/categories/{id}/edit",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category form filled with current values"),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn edit_category_form(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let category = category_service::get_category(&state, id).await?;

    let view = View::new("categories/edit", "Edit Category")
        .with("categoryId", category.id)
        .with("category", CategoryForm::from(&category));
    page.render(view).await
}

#[utoipa::path(
    put,
    path = "/categories/{id}/edit",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirected to /categories"),
        (status = 400, description = "Form re-rendered with validation errors"),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => return category_form_error(&page, id, form, &errors).await,
    };

    category_service::update_category(&state, id, input).await?;
    Ok(page.redirect("/categories"))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}/delete",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 303, description = "Deleted, redirected to /categories"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has products"),
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match category_service::delete_category(&state, id).await {
        Ok(()) => Ok(page.redirect("/categories")),
        Err(AppError::Conflict(message)) => {
            category_list(&state, &page, StatusCode::CONFLICT, &[message]).await
        }
        Err(err) => Err(err),
    }
}

/// The category list page, optionally carrying inline errors.
async fn category_list(
    state: &AppState,
    page: &Page,
    status: StatusCode,
    errors: &[String],
) -> AppResult<Response> {
    let categories = category_service::list_with_product_counts(state).await?;
    let mut view = View::new("categories/list", "Categories")
        .status(status)
        .merge(CategoryListing { categories });
    if !errors.is_empty() {
        view = view.errors(errors);
    }
    page.render(view).await
}

async fn category_form_error(
    page: &Page,
    id: Uuid,
    form: CategoryForm,
    errors: &[String],
) -> AppResult<Response> {
    let view = View::new("categories/edit", "Edit Category")
        .status(StatusCode::BAD_REQUEST)
        .with("categoryId", id)
        .with("category", form)
        .errors(errors);
    page.render(view).await
}
