//! Message bundle and request-context defaults

use serde::{Deserialize, Serialize};
use std::env;

use super::{env_flag, ConfigError};
use crate::types::{Locale, TimeZoneId, DEFAULT_LOCALE, DEFAULT_TIMEZONE};

/// Localization settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct I18nConfig {
    /// Path of the TOML message bundle; the embedded bundle is used when absent
    pub bundle_path: String,

    /// Locale used when a request names none
    pub default_locale: Locale,

    /// Time zone used when a request names none
    pub default_time_zone: TimeZoneId,

    /// Refuse to start when a registered message key has no base template
    #[serde(default)]
    pub strict: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            bundle_path: String::from("i18n/response-messages.toml"),
            default_locale: Locale::default(),
            default_time_zone: TimeZoneId::default(),
            strict: false,
        }
    }
}

impl I18nConfig {
    /// Read `I18N_BUNDLE_PATH`, `I18N_DEFAULT_LOCALE`, `I18N_DEFAULT_TIMEZONE`, `I18N_STRICT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let default_locale = match env::var("I18N_DEFAULT_LOCALE") {
            Ok(raw) => Locale::parse(&raw).ok_or(ConfigError::InvalidLocale(raw))?,
            Err(_) => defaults.default_locale,
        };
        let default_time_zone = match env::var("I18N_DEFAULT_TIMEZONE") {
            Ok(raw) => TimeZoneId::parse(&raw).ok_or(ConfigError::InvalidTimeZone(raw))?,
            Err(_) => defaults.default_time_zone,
        };

        Ok(Self {
            bundle_path: env::var("I18N_BUNDLE_PATH").unwrap_or(defaults.bundle_path),
            default_locale,
            default_time_zone,
            strict: env_flag("I18N_STRICT").unwrap_or(false),
        })
    }

    /// Whether the configured defaults differ from the built-in ones
    pub fn overrides_builtin_defaults(&self) -> bool {
        self.default_locale.as_str() != DEFAULT_LOCALE || self.default_time_zone.as_str() != DEFAULT_TIMEZONE
    }
}
