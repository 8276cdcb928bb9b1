//! Type definitions module with domain-specific sub-modules
//!
//! - `context` - Per-request locale/time zone state and request scope
//! - `locale` - Locale identifiers
//! - `response` - Response envelope wire types
//! - `timezone` - IANA time zone identifiers

pub mod context;
pub mod locale;
pub mod response;
pub mod timezone;

pub use context::{RequestContext, RequestScope};
pub use locale::{Locale, DEFAULT_LOCALE};
pub use response::{
    ApiError, ApiMessage, ApiSubError, ApiValidationError, ResponseBody, ResponseEnvelope,
    ResponseMetadata, ZonedTimestamp, ERROR_MESSAGE, SUCCESS_MESSAGE,
};
pub use timezone::{TimeZoneId, DEFAULT_TIMEZONE};
