use std::collections::HashMap;
use std::fs;
use std::path::Path;

use cb_shared::types::Locale;

use super::{CatalogError, MessageCatalog};
use crate::errors::kind;

/// Section holding the base templates
pub const BASE_SECTION: &str = "default";

/// Catalog backed by a TOML bundle
///
/// `[default]` holds the base templates; every other section is named by a
/// locale tag (`[de]`, `[en_US]`) and overrides the base for that locale.
/// Dotted keys may be written quoted or bare:
///
/// ```toml
/// [default]
/// "not.found.error" = "{0} with id {1} was not found"
///
/// [de]
/// not.found.error = "{0} mit der ID {1} wurde nicht gefunden"
/// ```
#[derive(Debug, Clone, Default)]
pub struct BundleCatalog {
    base: HashMap<String, String>,
    locales: HashMap<String, HashMap<String, String>>,
}

impl BundleCatalog {
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = toml::from_str(source)?;
        let mut catalog = Self::default();

        for (section, value) in table {
            let toml::Value::Table(entries) = value else {
                return Err(CatalogError::InvalidSection(section));
            };
            let mut templates = HashMap::new();
            flatten_into(&mut templates, None, entries).map_err(|key| {
                CatalogError::InvalidSection(format!("{}.{}", section, key))
            })?;

            if section == BASE_SECTION {
                catalog.base = templates;
            } else {
                let locale = Locale::parse(&section).ok_or_else(|| CatalogError::InvalidSection(section.clone()))?;
                catalog.locales.entry(locale.as_str().to_string()).or_default().extend(templates);
            }
        }

        tracing::debug!(
            base_keys = catalog.base.len(),
            locales = catalog.locales.len(),
            "Message bundle loaded"
        );
        Ok(catalog)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Locale tags with their own section
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    fn template(&self, key: &str, locale: &Locale) -> Option<&String> {
        locale
            .fallback_chain()
            .iter()
            .find_map(|tag| self.locales.get(tag).and_then(|bundle| bundle.get(key)))
            .or_else(|| self.base.get(key))
    }

    /// Registered message keys with no template reachable from `locale`
    pub fn missing_keys(&self, locale: &Locale) -> Vec<&'static str> {
        kind::registry()
            .iter()
            .map(|kind| kind.message_key)
            .filter(|key| self.template(key, locale).is_none())
            .collect()
    }

    /// Fail when any registered key has no template for `locale`
    pub fn ensure_complete(&self, locale: &Locale) -> Result<(), CatalogError> {
        let missing = self.missing_keys(locale);
        if missing.is_empty() {
            return Ok(());
        }
        Err(CatalogError::Incomplete {
            locale: locale.to_string(),
            keys: missing.into_iter().map(String::from).collect(),
        })
    }
}

impl MessageCatalog for BundleCatalog {
    fn lookup(&self, key: &str, locale: &Locale) -> Result<Option<String>, CatalogError> {
        Ok(self.template(key, locale).cloned())
    }
}

/// Catalog with no templates; every key renders as itself
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl MessageCatalog for EmptyCatalog {
    fn lookup(&self, _key: &str, _locale: &Locale) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: Option<&str>, entries: toml::Table) -> Result<(), String> {
    for (key, value) in entries {
        let full = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };
        match value {
            toml::Value::String(template) => {
                out.insert(full, template);
            }
            toml::Value::Table(nested) => flatten_into(out, Some(&full), nested)?,
            _ => return Err(full),
        }
    }
    Ok(())
}
