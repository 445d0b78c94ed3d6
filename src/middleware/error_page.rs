use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::{
    error::ErrorPage,
    services::category_service,
    state::AppState,
    view::{ResponseFormat, View},
};

/// Top-level error fallback. `AppError` responses carry an [`ErrorPage`]
/// extension; browsers get it rendered as the `error` view, JSON clients
/// keep the structured body.
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let format = ResponseFormat::from_headers(request.headers());
    let response = next.run(request).await;

    if format == ResponseFormat::Json {
        return response;
    }
    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    // A failed lookup must not hide the original error.
    let nav = match category_service::list_categories(&state).await {
        Ok(nav) => nav,
        Err(err) => {
            tracing::warn!(error = %err, "navigation unavailable for error page");
            Vec::new()
        }
    };

    let status = response.status();
    let view = View::error(status, page.title, page.message);
    (status, Html(state.presenter.render(&view, &nav))).into_response()
}
