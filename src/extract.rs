//! `Query` and `Form` extractors whose rejections become [`AppError`], so a
//! malformed query string or form body gets the same error page (or JSON
//! envelope) as any other failure.

use axum::extract::{FromRequest, FromRequestParts};
use axum::extract::rejection::{FormRejection, QueryRejection};

use crate::error::AppError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct Form<T>(pub T);

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection, "query string rejected");
        AppError::validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!(error = %rejection, "form body rejected");
        AppError::validation(rejection.body_text())
    }
}
