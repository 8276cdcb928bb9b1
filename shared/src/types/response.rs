//! API response envelope
//!
//! Every outcome, success or failure, is wrapped in one `ResponseEnvelope`
//! shape so clients parse a single schema.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::timezone::TimeZoneId;
use crate::utils::time::format_in_zone;

/// Top-level message on success envelopes
pub const SUCCESS_MESSAGE: &str = "SUCCESS!";
/// Top-level message on failure envelopes
pub const ERROR_MESSAGE: &str = "ERROR!";

/// Wire payload root
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope<T = ()> {
    /// Whether the request was successful
    pub success: bool,

    /// `SUCCESS!` or `ERROR!`
    pub message: String,

    /// Versioning and support links
    pub metadata: ResponseMetadata,

    /// Error or success payload
    pub response: ResponseBody<T>,
}

impl<T> ResponseEnvelope<T> {
    /// Wrap a success payload
    pub fn success(message: ApiMessage<T>, metadata: ResponseMetadata) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            metadata,
            response: ResponseBody::Message(message),
        }
    }

    /// Wrap a failure payload
    pub fn error(error: ApiError, metadata: ResponseMetadata) -> Self {
        Self {
            success: false,
            message: ERROR_MESSAGE.to_string(),
            metadata,
            response: ResponseBody::Error(error),
        }
    }

    /// The failure payload, if this is an error envelope
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.response {
            ResponseBody::Error(error) => Some(error),
            ResponseBody::Message(_) => None,
        }
    }

    /// The success payload, if this is a success envelope
    pub fn api_message(&self) -> Option<&ApiMessage<T>> {
        match &self.response {
            ResponseBody::Message(message) => Some(message),
            ResponseBody::Error(_) => None,
        }
    }
}

/// Envelope metadata block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub api_version: String,

    #[serde(rename = "moreInfo")]
    pub more_info_url: String,

    /// `{reportBaseUri}?id={traceId}`
    #[serde(rename = "sendReport")]
    pub report_url: String,
}

impl ResponseMetadata {
    pub fn new(api_version: impl Into<String>, more_info_url: impl Into<String>, report_url: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            more_info_url: more_info_url.into(),
            report_url: report_url.into(),
        }
    }

    /// Build the report link for a trace id; a missing id leaves `id=` empty
    pub fn report_link(report_base_uri: &str, trace_id: Option<&str>) -> String {
        format!("{}?id={}", report_base_uri, trace_id.unwrap_or_default())
    }
}

/// Response payload, failure or success
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseBody<T> {
    Error(ApiError),
    Message(ApiMessage<T>),
}

/// Instant anchored in UTC, rendered in the request's zone
///
/// The UTC value is the stored record; only serialization converts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedTimestamp {
    pub utc: DateTime<Utc>,
    pub zone: TimeZoneId,
}

impl ZonedTimestamp {
    pub fn new(utc: DateTime<Utc>, zone: TimeZoneId) -> Self {
        Self { utc, zone }
    }

    /// Client-facing rendering
    pub fn rendered(&self) -> String {
        format_in_zone(self.utc, &self.zone)
    }
}

impl Serialize for ZonedTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.rendered())
    }
}

/// Failure payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub path: String,

    pub method: String,

    /// Status name, e.g. `UNPROCESSABLE_ENTITY`
    pub status: String,

    #[serde(rename = "statusCode")]
    pub http_status_code: u16,

    /// Stable application error code
    pub error_code: String,

    /// Localized message
    #[serde(rename = "message")]
    pub short_message: String,

    /// Detailed message including diagnostic context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_message: Option<String>,

    pub trace_id: Option<String>,

    pub timestamp: ZonedTimestamp,

    /// Ordered field-level errors; empty for single-cause failures
    #[serde(rename = "errorDetails")]
    pub sub_errors: Vec<ApiSubError>,
}

impl ApiError {
    pub fn has_sub_errors(&self) -> bool {
        !self.sub_errors.is_empty()
    }

    pub fn add_sub_error(&mut self, sub_error: ApiSubError) {
        self.sub_errors.push(sub_error);
    }

    pub fn add_validation_error(&mut self, error: ApiValidationError) {
        self.add_sub_error(ApiSubError::Validation(error));
    }

    /// Append validation errors preserving their order
    pub fn add_validation_errors<I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = ApiValidationError>,
    {
        self.sub_errors.extend(errors.into_iter().map(ApiSubError::Validation));
    }
}

/// Success payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage<T> {
    pub path: String,

    pub method: String,

    pub status: String,

    pub status_code: u16,

    /// Reason phrase for the status
    pub message: String,

    pub trace_id: Option<String>,

    pub timestamp: ZonedTimestamp,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Field-level error attached to an `ApiError`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiSubError {
    Validation(ApiValidationError),
}

/// One rejected field or object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiValidationError {
    /// Name of the validated object
    pub object: String,

    /// Name of the field; `None` for object-level errors
    pub field: Option<String>,

    pub rejected_value: Option<serde_json::Value>,

    pub message: String,
}

impl ApiValidationError {
    pub fn new(
        object: impl Into<String>,
        field: Option<String>,
        rejected_value: Option<serde_json::Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object: object.into(),
            field,
            rejected_value,
            message: message.into(),
        }
    }

    /// Object-level error with no field
    pub fn for_object(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(object, None, None, message)
    }
}
