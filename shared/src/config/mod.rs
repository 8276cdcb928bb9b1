//! Configuration module with sub-modules per concern
//!
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding
//! - `envelope` - Response envelope metadata
//! - `i18n` - Message bundle location and request-context defaults

pub mod envelope;
pub mod environment;
pub mod i18n;
pub mod server;

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

pub use envelope::EnvelopeConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use i18n::I18nConfig;
pub use server::ServerConfig;

/// Configuration loading failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid default locale: {0}")]
    InvalidLocale(String),

    #[error("Unknown default time zone: {0}")]
    InvalidTimeZone(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Envelope metadata
    #[serde(default)]
    pub envelope: EnvelopeConfig,

    /// Localization
    #[serde(default)]
    pub i18n: I18nConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            envelope: EnvelopeConfig::default(),
            i18n: I18nConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            envelope: EnvelopeConfig {
                include_debug_message: false,
                ..Default::default()
            },
            i18n: I18nConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            envelope: EnvelopeConfig::from_env(environment),
            i18n: I18nConfig::from_env()?,
            logging: LoggingConfig::from_env(environment),
        })
    }
}

pub(crate) fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(name, value = %raw, "Ignoring unparseable flag");
            None
        }
    }
}
