use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use cb_core::DomainError;
use cb_shared::types::RequestScope;

use super::envelope::{http_status, EnvelopeBuilder};

/// Handler-facing error type
///
/// Wraps a `DomainError` so handlers can return `Result<_, AppError>` and
/// use `?` on raisers. The response built here has no request scope; the
/// error envelope middleware replaces it with one rendered for the request.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct AppError(#[from] pub DomainError);

impl AppError {
    pub fn into_inner(self) -> DomainError {
        self.0
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        http_status(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        let envelope = EnvelopeBuilder::degraded().build_error(&self.0, &RequestScope::default());
        HttpResponse::build(self.status_code()).json(envelope)
    }
}

/// Result type for request handlers
pub type ApiResult<T> = Result<T, AppError>;
