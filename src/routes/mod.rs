use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::{
    error::AppError, middleware::error_page::render_error_pages, routes::doc::scalar_docs,
    state::AppState,
};

pub mod categories;
pub mod doc;
pub mod health;
pub mod home;
pub mod params;
pub mod products;

/// Build the page router without binding state; it will be provided at the top level.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .route("/health", get(health::health_check))
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// The full application: pages, docs and the HTML error fallback, bound to `state`.
pub fn create_app(state: AppState) -> Router {
    create_router()
        .merge(scalar_docs())
        .layer(from_fn_with_state(state.clone(), render_error_pages))
        .with_state(state)
}
