//! Response envelope settings

use serde::{Deserialize, Serialize};
use std::env;

use super::environment::Environment;
use super::env_flag;

/// Settings stamped into every envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnvelopeConfig {
    /// Current API version
    pub api_version: String,

    /// Documentation link for clients
    pub more_info_url: String,

    /// Base of the error report link; `?id={traceId}` is appended
    pub report_base_uri: String,

    /// Expose `debugMessage` in error envelopes
    #[serde(default = "default_include_debug")]
    pub include_debug_message: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            api_version: String::from("v1"),
            more_info_url: String::from("https://api.cometbid.org/docs/errors"),
            report_base_uri: String::from("https://api.cometbid.org/support/report"),
            include_debug_message: default_include_debug(),
        }
    }
}

impl EnvelopeConfig {
    /// Read `API_VERSION`, `API_MORE_INFO_URL`, `API_REPORT_BASE_URI`
    ///
    /// Debug messages are hidden in production unless
    /// `API_INCLUDE_DEBUG_MESSAGE=true`.
    pub fn from_env(environment: Environment) -> Self {
        let defaults = Self::default();
        Self {
            api_version: env::var("API_VERSION").unwrap_or(defaults.api_version),
            more_info_url: env::var("API_MORE_INFO_URL").unwrap_or(defaults.more_info_url),
            report_base_uri: env::var("API_REPORT_BASE_URI").unwrap_or(defaults.report_base_uri),
            include_debug_message: env_flag("API_INCLUDE_DEBUG_MESSAGE").unwrap_or(environment.is_debug()),
        }
    }
}

fn default_include_debug() -> bool {
    true
}
