use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};

use crate::{
    config::PAGE_LIMIT,
    dto::products::{ProductDetail, ProductForm, ProductListing},
    error::{AppError, AppResult, parse_id},
    extract::{Form, Query},
    middleware::page::Page,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{PageRequest, ProductQuery, SearchQuery},
    services::product_service,
    state::AppState,
    view::View,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/search", get(search_products))
        .route("/new", get(new_product_form).post(create_product))
        .route("/{id}", get(get_product))
        .route(
            "/{id}/edit",
            get(edit_product_form).put(update_product).post(update_product),
        )
        .route(
            "/{id}/delete",
            axum::routing::delete(delete_product).post(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Filtered, sorted page of products", body = ApiResponse<ProductListing>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<ProductQuery>,
) -> AppResult<Response> {
    let result =
        product_service::list_products(&state, &query.filter(), query.sort(), query.page()).await?;
    let brands = product_service::list_brands(&state).await?;

    let view = View::new("products/list", "Products").merge(ProductListing::new(
        result, query, brands,
    ));
    page.render(view).await
}

#[utoipa::path(
    get,
    path = "/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Full-text search results", body = ApiResponse<ProductListing>),
        (status = 303, description = "Empty query, redirected to /products"),
        (status = 400, description = "Query shorter than 2 characters"),
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let terms = query.q.as_deref().map(str::trim).unwrap_or_default();
    if terms.is_empty() {
        return Ok(page.redirect("/products"));
    }
    let page_request = PageRequest::parse(query.page.as_deref());

    let result = match product_service::search_products(&state, terms, page_request).await {
        Ok(result) => result,
        Err(AppError::Validation(errors)) => {
            let view = View::new("products/list", "Search Results")
                .status(StatusCode::BAD_REQUEST)
                .with("products", Vec::<Product>::new())
                .with("pagination", Meta::new(1, PAGE_LIMIT, 0))
                .with("searchQuery", terms)
                .errors(&errors);
            return Ok(page.render_without_nav(view));
        }
        Err(err) => return Err(err),
    };
    let brands = product_service::list_brands(&state).await?;

    let filters = ProductQuery {
        search: Some(terms.to_string()),
        page: query.page.clone(),
        ..ProductQuery::default()
    };
    let mut listing = ProductListing::new(result, filters, brands);
    listing.search_query = Some(terms.to_string());

    let view = View::new("products/list", format!("Search results for \"{terms}\"")).merge(listing);
    page.render(view).await
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with similar products", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let product = product_service::get_product(&state, id).await?;
    let similar_products = product_service::similar_products(&state, &product).await?;

    let title = product.name.clone();
    let view = View::new("products/detail", title).merge(ProductDetail {
        product,
        similar_products,
    });
    page.render(view).await
}

#[utoipa::path(
    get,
    path = "/products/new",
    responses(
        (status = 200, description = "Empty product form")
    ),
    tag = "Products"
)]
pub async fn new_product_form(page: Page) -> AppResult<Response> {
    let view = View::new("products/new", "New Product").with("product", ProductForm::default());
    page.render(view).await
}

#[utoipa::path(
    post,
    path = "/products/new",
    request_body(content = ProductForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirected to the product page"),
        (status = 400, description = "Form re-rendered with validation errors"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    page: Page,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => return product_form_error(&page, None, form, &errors).await,
    };

    match product_service::create_product(&state, input).await {
        Ok(product) => Ok(page.redirect(&format!("/products/{}", product.id))),
        Err(AppError::Validation(errors)) => product_form_error(&page, None, form, &errors).await,
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}/edit",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product form filled with current values"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn edit_product_form(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let product = product_service::get_product(&state, id).await?;

    let view = View::new("products/edit", "Edit Product")
        .with("productId", product.id)
        .with("product", ProductForm::from(&product));
    page.render(view).await
}

#[utoipa::path(
    put,
    path = "/products/{id}/edit",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body(content = ProductForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirected to the product page"),
        (status = 400, description = "Form re-rendered with validation errors"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => return product_form_error(&page, Some(id), form, &errors).await,
    };

    match product_service::update_product(&state, id, input).await {
        Ok(product) => Ok(page.redirect(&format!("/products/{}", product.id))),
        Err(AppError::Validation(errors)) => {
            product_form_error(&page, Some(id), form, &errors).await
        }
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}/delete",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 303, description = "Deleted, redirected to /products"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    product_service::delete_product(&state, id).await?;
    Ok(page.redirect("/products"))
}

/// Re-render the new/edit form with the submitted values and the error list.
async fn product_form_error(
    page: &Page,
    id: Option<uuid::Uuid>,
    form: ProductForm,
    errors: &[String],
) -> AppResult<Response> {
    let view = match id {
        Some(id) => View::new("products/edit", "Edit Product").with("productId", id),
        None => View::new("products/new", "New Product"),
    };
    let view = view
        .status(StatusCode::BAD_REQUEST)
        .with("product", form)
        .errors(errors);
    page.render(view).await
}
