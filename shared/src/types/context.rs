//! Request-scoped locale and time zone state
//!
//! A `RequestContext` is built once per inbound request by the boundary
//! middleware and handed by reference to message rendering and timestamp
//! formatting. It lives in the request's own extensions, so nothing carries
//! over to the next request served by the same worker.

use serde::{Deserialize, Serialize};

use super::locale::Locale;
use super::timezone::TimeZoneId;

/// Header consulted first for the locale
pub const LOCALE_HEADER: &str = "locale";
/// Query parameters consulted for the locale, in order
pub const LOCALE_PARAMS: [&str; 3] = ["lang", "language", "locale"];
/// Header consulted first for the time zone
pub const TIMEZONE_HEADER: &str = "timezone";
/// Query parameter consulted for the time zone
pub const TIMEZONE_PARAM: &str = "tz";

/// Per-request locale and time zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    locale: Locale,
    time_zone: TimeZoneId,
}

impl RequestContext {
    pub fn new(locale: Locale, time_zone: TimeZoneId) -> Self {
        Self { locale, time_zone }
    }

    /// Resolve the context from raw request inputs
    ///
    /// Locale: `locale` header, then the `lang`, `language` and `locale`
    /// query parameters, then the default. Time zone: `timezone` header, then
    /// the `tz` query parameter, then the default. Blank values count as
    /// absent; a present but unparseable value resolves to the default.
    pub fn resolve<'a, F>(locale_header: Option<&str>, timezone_header: Option<&str>, param: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self::resolve_over(Self::default(), locale_header, timezone_header, param)
    }

    /// Same lookup order as [`RequestContext::resolve`] with `base` supplying the defaults
    pub fn resolve_over<'a, F>(
        base: RequestContext,
        locale_header: Option<&str>,
        timezone_header: Option<&str>,
        param: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut ctx = base;

        let locale = non_blank(locale_header)
            .or_else(|| LOCALE_PARAMS.iter().find_map(|name| non_blank(param(name))));
        if let Some(code) = locale {
            match Locale::parse(code) {
                Some(parsed) => ctx.locale = parsed,
                None => tracing::warn!(code, default = %ctx.locale, "Rejected locale, using default"),
            }
        }

        let zone = non_blank(timezone_header).or_else(|| non_blank(param(TIMEZONE_PARAM)));
        if let Some(id) = zone {
            match TimeZoneId::parse(id) {
                Some(parsed) => ctx.time_zone = parsed,
                None => tracing::warn!(id, default = %ctx.time_zone, "Rejected time zone, using default"),
            }
        }

        tracing::debug!(locale = %ctx.locale, time_zone = %ctx.time_zone, "Request context resolved");
        ctx
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn time_zone(&self) -> &TimeZoneId {
        &self.time_zone
    }

    /// Set the locale from a raw code; invalid codes select the default
    pub fn set_locale(&mut self, code: &str) -> &Locale {
        self.locale = match Locale::parse(code) {
            Some(locale) => locale,
            None => {
                tracing::warn!(code, "Rejected locale, using default");
                Locale::default()
            }
        };
        tracing::debug!(locale = %self.locale, "Request locale set");
        &self.locale
    }

    /// Set the time zone from a raw id; unknown ids select the default
    pub fn set_time_zone(&mut self, id: &str) -> &TimeZoneId {
        self.time_zone = match TimeZoneId::parse(id) {
            Some(zone) => zone,
            None => {
                tracing::warn!(id, "Rejected time zone, using default");
                TimeZoneId::default()
            }
        };
        tracing::debug!(time_zone = %self.time_zone, "Request time zone set");
        &self.time_zone
    }

    pub fn with_locale(mut self, code: &str) -> Self {
        self.set_locale(code);
        self
    }

    pub fn with_time_zone(mut self, id: &str) -> Self {
        self.set_time_zone(id);
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Everything the envelope builder needs to know about the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestScope {
    pub path: String,
    pub method: String,
    /// Trace id received from the tracing collaborator, never generated here
    pub trace_id: Option<String>,
    pub context: RequestContext,
}

impl RequestScope {
    pub fn new(path: impl Into<String>, method: impl Into<String>, context: RequestContext) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            trace_id: None,
            context,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}
