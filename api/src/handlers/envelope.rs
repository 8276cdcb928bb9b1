//! Envelope assembly
//!
//! The one place a `DomainError` turns into wire data. Both the error
//! middleware and `AppError::error_response` come through here, whichever
//! way the failure travelled to the boundary.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use cb_core::i18n::{EmptyCatalog, MessageCatalog};
use cb_core::{ConstraintViolation, DomainError};
use cb_shared::config::EnvelopeConfig;
use cb_shared::types::{
    ApiError, ApiMessage, ApiValidationError, RequestScope, ResponseEnvelope, ResponseMetadata, ZonedTimestamp,
};
use cb_shared::utils::now_utc;

use crate::middleware::request_context::RequestContextExt;

/// Builds success and failure envelopes for one application
#[derive(Clone)]
pub struct EnvelopeBuilder {
    catalog: Arc<dyn MessageCatalog>,
    config: EnvelopeConfig,
}

impl EnvelopeBuilder {
    pub fn new(catalog: Arc<dyn MessageCatalog>, config: EnvelopeConfig) -> Self {
        Self { catalog, config }
    }

    /// Builder with no templates, used when no configured builder is reachable
    pub fn degraded() -> Self {
        Self::new(Arc::new(EmptyCatalog), EnvelopeConfig::default())
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn MessageCatalog {
        self.catalog.as_ref()
    }

    pub fn build_error(&self, error: &DomainError, scope: &RequestScope) -> ResponseEnvelope {
        self.build_error_at(error, scope, now_utc())
    }

    /// Failure envelope stamped with `at`
    ///
    /// The message is rendered in the scope's locale. If the catalog faults,
    /// the message degrades to the stable code and the envelope is still
    /// produced.
    pub fn build_error_at(&self, error: &DomainError, scope: &RequestScope, at: DateTime<Utc>) -> ResponseEnvelope {
        let locale = scope.context.locale();

        let short_message = match error.try_render_message(self.catalog(), locale) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(
                    code = error.stable_code(),
                    locale = %locale,
                    error = %err,
                    "Message catalog failed, falling back to error code"
                );
                error.stable_code().to_string()
            }
        };

        let debug_message = error.formatted_message(&short_message);

        let mut api_error = ApiError {
            path: scope.path.clone(),
            method: scope.method.clone(),
            status: status_name(error.http_status()),
            http_status_code: error.http_status(),
            error_code: error.stable_code().to_string(),
            short_message,
            debug_message: self.config.include_debug_message.then_some(debug_message),
            trace_id: scope.trace_id.clone(),
            timestamp: ZonedTimestamp::new(at, scope.context.time_zone().clone()),
            sub_errors: Vec::new(),
        };
        api_error.add_validation_errors(error.violations().iter().map(|v| self.localize_violation(v, scope)));

        ResponseEnvelope::error(api_error, self.metadata(scope))
    }

    pub fn build_success<T>(&self, data: Option<T>, status: StatusCode, scope: &RequestScope) -> ResponseEnvelope<T> {
        self.build_success_at(data, status, scope, now_utc())
    }

    pub fn build_success_at<T>(
        &self,
        data: Option<T>,
        status: StatusCode,
        scope: &RequestScope,
        at: DateTime<Utc>,
    ) -> ResponseEnvelope<T> {
        let message = ApiMessage {
            path: scope.path.clone(),
            method: scope.method.clone(),
            status: status_name(status.as_u16()),
            status_code: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
            trace_id: scope.trace_id.clone(),
            timestamp: ZonedTimestamp::new(at, scope.context.time_zone().clone()),
            data,
        };
        ResponseEnvelope::success(message, self.metadata(scope))
    }

    /// HTTP response carrying the failure envelope; 5xx failures are logged
    pub fn error_response(&self, error: &DomainError, scope: &RequestScope) -> HttpResponse {
        let envelope = self.build_error(error, scope);
        if let Some(api_error) = envelope.api_error() {
            log_failure(error, api_error);
        }
        HttpResponse::build(http_status(error)).json(envelope)
    }

    /// HTTP response carrying a success envelope for `req`
    pub fn success_response<T: Serialize>(&self, req: &HttpRequest, status: StatusCode, data: T) -> HttpResponse {
        let envelope = self.build_success(Some(data), status, &req.request_scope());
        HttpResponse::build(status).json(envelope)
    }

    fn metadata(&self, scope: &RequestScope) -> ResponseMetadata {
        ResponseMetadata::new(
            self.config.api_version.as_str(),
            self.config.more_info_url.as_str(),
            ResponseMetadata::report_link(&self.config.report_base_uri, scope.trace_id.as_deref()),
        )
    }

    /// Violation messages naming a catalog key are rendered with
    /// `[field, data type, rejected value]`; literal messages pass through.
    fn localize_violation(&self, violation: &ConstraintViolation, scope: &RequestScope) -> ApiValidationError {
        let locale = scope.context.locale();
        if !matches!(self.catalog.lookup(&violation.message, locale), Ok(Some(_))) {
            return violation.clone().into();
        }

        let rejected = violation.rejected_value.clone().unwrap_or(Value::Null);
        let args = [
            violation.field_name.clone().map_or(Value::Null, Into::into),
            Value::from(data_type(&rejected)),
            rejected,
        ];
        let message = self.catalog.resolve(&violation.message, locale, &args);
        ConstraintViolation { message, ..violation.clone() }.into()
    }
}

fn data_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn log_failure(error: &DomainError, api_error: &ApiError) {
    if error.kind().is_server_error() {
        tracing::error!(
            trace_id = api_error.trace_id.as_deref().unwrap_or_default(),
            code = %api_error.error_code,
            path = %api_error.path,
            debug_message = %error.formatted_message(&api_error.short_message),
            "Request failed"
        );
    } else {
        tracing::debug!(code = %api_error.error_code, path = %api_error.path, "Request rejected");
    }
}

/// Status of the response for `error`
pub fn http_status(error: &DomainError) -> StatusCode {
    StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Upper snake case reason phrase, e.g. `UNPROCESSABLE_ENTITY`
pub fn status_name(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(|reason| {
            reason
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                .collect()
        })
        .unwrap_or_else(|| status.to_string())
}
