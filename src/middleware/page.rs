use std::convert::Infallible;

use axum::{
    Json,
    extract::FromRequestParts,
    http::request::Parts,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::Category,
    response::ApiResponse,
    services::category_service,
    state::AppState,
    view::{ResponseFormat, View},
};

/// Per-request rendering context. Pages get the navigation categories
/// through this value rather than from shared state.
pub struct Page {
    state: AppState,
    format: ResponseFormat,
}

impl FromRequestParts<AppState> for Page {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Page {
            state: state.clone(),
            format: ResponseFormat::from_headers(&parts.headers),
        })
    }
}

impl Page {
    /// Render a full page, loading the navigation categories for HTML clients.
    pub async fn render(&self, view: View) -> AppResult<Response> {
        match self.format {
            ResponseFormat::Json => Ok(self.render_without_nav(view)),
            ResponseFormat::Html => {
                let nav = category_service::list_categories(&self.state).await?;
                Ok(self.html(&view, &nav))
            }
        }
    }

    /// Render without touching the database.
    pub fn render_without_nav(&self, view: View) -> Response {
        match self.format {
            ResponseFormat::Json => {
                let status = view.status;
                let body = ApiResponse::success(view.title, Value::Object(view.data), None);
                (status, Json(body)).into_response()
            }
            ResponseFormat::Html => self.html(&view, &[]),
        }
    }

    pub fn redirect(&self, to: &str) -> Response {
        Redirect::to(to).into_response()
    }

    fn html(&self, view: &View, nav: &[Category]) -> Response {
        (view.status, Html(self.state.presenter.render(view, nav))).into_response()
    }
}
