//! Shared types for the Cometbid API backbone
//!
//! - Configuration loaded from the environment
//! - Request-scoped locale and time zone context
//! - Response envelope wire types
//! - Time-zone aware rendering and parsing of instants

pub mod config;
pub mod types;
pub mod utils;

pub use config::{AppConfig, ConfigError, EnvelopeConfig, Environment, I18nConfig, LoggingConfig, ServerConfig};
pub use types::{Locale, RequestContext, RequestScope, TimeZoneId};
