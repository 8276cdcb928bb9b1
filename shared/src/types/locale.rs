//! Locale identifiers used for message localization

use serde::{Deserialize, Serialize};

/// Locale applied when a request does not name one
pub const DEFAULT_LOCALE: &str = "en_US";

/// A normalized locale tag such as `en_US`, `de` or `fr_CA`
///
/// Tags are stored in underscore form with a lowercase language and an
/// uppercase region, so `en-us`, `EN_us` and `en_US` all compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    tag: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            tag: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Locale {
    /// Parse a locale tag, returning `None` for blank or malformed input
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut parts = raw.split(['_', '-']);
        let language = parts.next()?.to_ascii_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let mut tag = language;
        if let Some(region) = parts.next() {
            if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            tag.push('_');
            tag.push_str(&region.to_ascii_uppercase());
        }
        if let Some(variant) = parts.next() {
            if variant.is_empty() || !variant.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            tag.push('_');
            tag.push_str(variant);
        }
        if parts.next().is_some() {
            return None;
        }

        Some(Self { tag })
    }

    /// Parse a locale tag, falling back to the default locale
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }

    /// Full tag, e.g. `en_US`
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// ISO 639 language part, e.g. `en`
    pub fn language(&self) -> &str {
        self.tag.split('_').next().unwrap_or(&self.tag)
    }

    /// Region part if present, e.g. `US`
    pub fn region(&self) -> Option<&str> {
        self.tag.split('_').nth(1)
    }

    /// Candidate bundle names from most to least specific
    ///
    /// `de_CH_1996` yields `["de_CH_1996", "de_CH", "de"]`. The base bundle is
    /// not included; catalogs consult it after every candidate misses.
    pub fn fallback_chain(&self) -> Vec<String> {
        let mut chain = vec![self.tag.clone()];
        let mut current = self.tag.as_str();
        while let Some(idx) = current.rfind('_') {
            current = &current[..idx];
            chain.push(current.to_string());
        }
        chain
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag)
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported locale: {}", s))
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag
    }
}
