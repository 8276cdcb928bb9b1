//! The single failure value raised by business logic
//!
//! A `DomainError` captures the kind, message key, positional arguments, an
//! optional cause and diagnostic context. It holds no rendered text: the
//! message is produced on demand for whatever locale the boundary asks for,
//! so an error built under one request can be rendered under another.

use std::borrow::Cow;
use std::fmt::Write as _;

use cb_shared::types::{ApiValidationError, Locale};
use serde_json::Value;
use thiserror::Error;

use super::kind::{ErrorKind, ErrorKindId};
use crate::i18n::{display_value, CatalogError, MessageCatalog};

/// Positional message arguments
pub type Args = Vec<Value>;

/// Boxed cause attached to a `DomainError`
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Context label under which generic errors record their cause
pub const CAUSE_LABEL: &str = "cause";

/// One rejected field or object reported by validation
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    pub object_name: String,
    /// `None` for object-level constraints
    pub field_name: Option<String>,
    pub rejected_value: Option<Value>,
    /// Already-interpolated validation message
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(
        object_name: impl Into<String>,
        field_name: Option<String>,
        rejected_value: Option<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            field_name,
            rejected_value,
            message: message.into(),
        }
    }

    pub fn field(
        object_name: impl Into<String>,
        field_name: impl Into<String>,
        rejected_value: impl Into<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(object_name, Some(field_name.into()), Some(rejected_value.into()), message)
    }
}

impl From<ConstraintViolation> for ApiValidationError {
    fn from(violation: ConstraintViolation) -> Self {
        ApiValidationError::new(
            violation.object_name,
            violation.field_name,
            violation.rejected_value,
            violation.message,
        )
    }
}

#[derive(Error, Debug)]
#[error("{}: {}", .kind.stable_code, .message_key)]
pub struct DomainError {
    kind: &'static ErrorKind,
    message_key: Cow<'static, str>,
    args: Vec<Value>,
    #[source]
    cause: Option<BoxError>,
    context: Vec<(String, Value)>,
    violations: Vec<ConstraintViolation>,
}

impl DomainError {
    /// Error of kind `id` rendered from the kind's message key
    pub fn new(id: ErrorKindId, args: Vec<Value>) -> Self {
        let kind = id.kind();
        Self {
            kind,
            message_key: Cow::Borrowed(kind.message_key),
            args,
            cause: None,
            context: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Error of kind `id` with no arguments
    pub fn of(id: ErrorKindId) -> Self {
        Self::new(id, Vec::new())
    }

    /// Render from `key` instead of the kind's default message key
    pub fn with_message_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.message_key = key.into();
        self
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn with_violations(mut self, violations: Vec<ConstraintViolation>) -> Self {
        self.violations = violations;
        self
    }

    /// Append a diagnostic entry; earlier entries with the same label are kept
    pub fn add_context(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_context(label, value);
        self
    }

    /// In-place form of [`DomainError::add_context`]
    pub fn push_context(&mut self, label: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.context.push((label.into(), value.into()));
        self
    }

    /// Replace every entry under `label` with a single one
    pub fn set_context(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        let label = label.into();
        self.context.retain(|(existing, _)| *existing != label);
        self.context.push((label, value.into()));
        self
    }

    /// Every value recorded under `label`, oldest first
    pub fn context_values(&self, label: &str) -> Vec<&Value> {
        self.context
            .iter()
            .filter(|(existing, _)| existing == label)
            .map(|(_, value)| value)
            .collect()
    }

    /// Latest value recorded under `label`
    pub fn context_value(&self, label: &str) -> Option<&Value> {
        self.context
            .iter()
            .rev()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    pub fn first_context_value(&self, label: &str) -> Option<&Value> {
        self.context
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    /// All entries in insertion order
    pub fn context_entries(&self) -> &[(String, Value)] {
        &self.context
    }

    /// Distinct labels in first-seen order
    pub fn context_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for (label, _) in &self.context {
            if !labels.contains(&label.as_str()) {
                labels.push(label.as_str());
            }
        }
        labels
    }

    pub fn kind(&self) -> &'static ErrorKind {
        self.kind
    }

    pub fn id(&self) -> ErrorKindId {
        self.kind.id
    }

    pub fn stable_code(&self) -> &'static str {
        self.kind.stable_code
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Localized message, surfacing catalog faults
    ///
    /// A raw key with no template falls back to the kind's key before
    /// falling back to the key text itself.
    pub fn try_render_message(&self, catalog: &dyn MessageCatalog, locale: &Locale) -> Result<String, CatalogError> {
        let message = catalog.try_resolve(&self.message_key, locale, &self.args)?;
        if message == self.message_key && self.message_key != self.kind.message_key {
            return catalog.try_resolve(self.kind.message_key, locale, &self.args);
        }
        Ok(message)
    }

    /// Localized message; catalog faults degrade to the message key
    pub fn render_message(&self, catalog: &dyn MessageCatalog, locale: &Locale) -> String {
        self.try_render_message(catalog, locale).unwrap_or_else(|err| {
            tracing::warn!(code = self.stable_code(), error = %err, "Message rendering degraded");
            self.message_key.to_string()
        })
    }

    /// Localized message followed by the context entries and the cause
    pub fn render_debug_message(&self, catalog: &dyn MessageCatalog, locale: &Locale) -> String {
        self.formatted_message(&self.render_message(catalog, locale))
    }

    /// `base` followed by numbered context entries and the cause chain
    pub fn formatted_message(&self, base: &str) -> String {
        let mut out = String::from(base);

        if !self.context.is_empty() {
            out.push_str("\nContext:");
            for (idx, (label, value)) in self.context.iter().enumerate() {
                let _ = write!(out, "\n\t[{}:{}={}]", idx + 1, label, display_value(value));
            }
        }

        let mut source = self.cause.as_deref().map(|err| err as &(dyn std::error::Error + 'static));
        while let Some(err) = source {
            let _ = write!(out, "\nCaused by: {}", err);
            source = err.source();
        }

        out
    }
}

/// Convert any serializable value into a message argument
pub fn arg<T: serde::Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Build a positional argument list from heterogeneous values
///
/// ```
/// use cb_core::args;
/// let args = args!["Employee", 42];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::errors::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::errors::arg(&$value)),+]
    };
}
