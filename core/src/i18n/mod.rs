//! Localized message resolution
//!
//! A [`MessageCatalog`] maps a message key and locale to a template. Templates
//! use positional `{0}`, `{1}` placeholders; a placeholder naming another key,
//! e.g. `{emp.not.found}`, is expanded with that key's template.

mod bundle;

pub use bundle::{BundleCatalog, EmptyCatalog};

use cb_shared::types::Locale;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Nested placeholder passes after the first rendering
pub const MAX_NESTED_PASSES: usize = 2;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]+)\}").unwrap());
static POSITIONAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Catalog failures
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read message bundle {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed message bundle: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid bundle section [{0}]")]
    InvalidSection(String),

    #[error("Message catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Message bundle is missing {} key(s) for {locale}: {}", keys.len(), keys.join(", "))]
    Incomplete { locale: String, keys: Vec<String> },
}

/// Key to localized template lookup
///
/// Implementations are shared read-only across requests.
pub trait MessageCatalog: Send + Sync {
    /// Template for `key` in `locale`, or `None` when no bundle defines it
    fn lookup(&self, key: &str, locale: &Locale) -> Result<Option<String>, CatalogError>;

    /// Render `key` with `args`, surfacing collaborator faults
    ///
    /// A missing key renders as the key itself. Nested `{key}` placeholders
    /// are expanded in the templates only; arguments are substituted last
    /// and never expanded.
    fn try_resolve(&self, key: &str, locale: &Locale, args: &[Value]) -> Result<String, CatalogError> {
        let mut template = self.lookup(key, locale)?.unwrap_or_else(|| key.to_string());

        for _ in 0..MAX_NESTED_PASSES {
            if !PLACEHOLDER.is_match(&template) {
                break;
            }
            let expanded = expand_nested(self, &template, locale)?;
            if expanded == template {
                break;
            }
            template = expanded;
        }

        Ok(format_positional(&template, args))
    }

    /// Render `key` with `args`; never fails
    fn resolve(&self, key: &str, locale: &Locale, args: &[Value]) -> String {
        match self.try_resolve(key, locale, args) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(key, locale = %locale, error = %err, "Message lookup failed, using key");
                key.to_string()
            }
        }
    }
}

/// Substitute `{n}` with the n-th argument; unmatched indices are left as-is
pub fn format_positional(template: &str, args: &[Value]) -> String {
    if args.is_empty() {
        return template.to_string();
    }
    POSITIONAL
        .replace_all(template, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| args.get(idx))
                .map(display_value)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Argument as it appears inside a message
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn expand_nested<C>(catalog: &C, template: &str, locale: &Locale) -> Result<String, CatalogError>
where
    C: MessageCatalog + ?Sized,
{
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        // positional slots are filled after expansion
        let nested = if POSITIONAL.is_match(whole.as_str()) {
            None
        } else {
            catalog.lookup(token.as_str(), locale)?
        };
        out.push_str(nested.as_deref().unwrap_or(whole.as_str()));
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}
