//! Message bundle loading for the server

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;

use cb_core::i18n::{BundleCatalog, CatalogError, MessageCatalog};
use cb_shared::config::I18nConfig;

/// Bundle compiled into the binary, used when no bundle file is present
pub const EMBEDDED_BUNDLE: &str = include_str!("../../i18n/response-messages.toml");

/// Parsed embedded bundle
pub static EMBEDDED_CATALOG: Lazy<Result<BundleCatalog, CatalogError>> =
    Lazy::new(|| BundleCatalog::from_toml_str(EMBEDDED_BUNDLE));

/// Load the catalog named by `config`
///
/// The file at `bundle_path` wins when it exists; otherwise the embedded
/// bundle is used. In strict mode every registered key must have a template
/// for the default locale.
pub fn load_catalog(config: &I18nConfig) -> Result<Arc<dyn MessageCatalog>, CatalogError> {
    let path = Path::new(&config.bundle_path);

    let catalog = if path.exists() {
        tracing::info!(path = %path.display(), "Loading message bundle");
        BundleCatalog::from_file(path)?
    } else {
        tracing::info!(path = %path.display(), "Bundle file not found, using embedded messages");
        embedded_catalog()?
    };

    let missing = catalog.missing_keys(&config.default_locale);
    if config.strict {
        catalog.ensure_complete(&config.default_locale)?;
    } else if !missing.is_empty() {
        tracing::warn!(
            locale = %config.default_locale,
            missing = missing.len(),
            "Message bundle is incomplete, missing keys render as their key"
        );
    }

    Ok(Arc::new(catalog))
}

/// Copy of the embedded bundle
pub fn embedded_catalog() -> Result<BundleCatalog, CatalogError> {
    match &*EMBEDDED_CATALOG {
        Ok(catalog) => Ok(catalog.clone()),
        Err(err) => Err(CatalogError::Unavailable(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_shared::types::Locale;

    #[test]
    fn test_embedded_bundle_complete() {
        let catalog = embedded_catalog().unwrap();
        assert!(catalog.missing_keys(&Locale::default()).is_empty());
        assert!(catalog.ensure_complete(&Locale::parse("de").unwrap()).is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_embedded() {
        let config = I18nConfig {
            bundle_path: "does/not/exist.toml".to_string(),
            strict: true,
            ..I18nConfig::default()
        };
        let catalog = load_catalog(&config).unwrap();
        let message = catalog.resolve("emp.not.found", &Locale::default(), &[serde_json::json!(42)]);
        assert_eq!(message, "Employee with id 42 was not found");
    }

    #[test]
    fn test_client_arguments_render_literally() {
        let catalog = embedded_catalog().unwrap();
        let message = catalog.resolve(
            "not.found.error",
            &Locale::default(),
            &[serde_json::json!("Employee"), serde_json::json!("{app.name}")],
        );
        assert_eq!(message, "Employee with id {app.name} was not found");
    }
}
