//! # Cometbid Core
//!
//! Error taxonomy, the context-carrying `DomainError`, per-kind raisers and
//! the localized message catalog. Nothing here knows about HTTP transport;
//! the `api` crate renders errors into envelopes.

pub mod errors;
pub mod i18n;

pub use errors::{ConstraintViolation, DomainError, DomainResult, ErrorKind, ErrorKindId};
pub use i18n::{BundleCatalog, CatalogError, MessageCatalog};
