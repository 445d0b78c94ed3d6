use axum::{Router, extract::State, response::Response, routing::get};

use crate::{
    error::AppResult, middleware::page::Page, services::product_service, state::AppState,
    view::View,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/contact", get(contact))
}

/// Home page with the highest-rated products.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Home page with popular products")
    ),
    tag = "Pages"
)]
pub async fn home(State(state): State<AppState>, page: Page) -> AppResult<Response> {
    let popular_products = product_service::popular_products(&state).await?;
    let view = View::new("home", "Home").with("popularProducts", popular_products);
    page.render(view).await
}

pub async fn about(page: Page) -> AppResult<Response> {
    page.render(View::new("about", "About Us")).await
}

pub async fn contact(page: Page) -> AppResult<Response> {
    page.render(View::new("contact", "Contact")).await
}
