//! `validator` results as constraint violations
//!
//! `ValidationErrors` keeps fields in a hash map, so violations are ordered
//! by field path to keep sub-error order stable between runs. Messages are
//! catalog keys; the envelope builder localizes them per request.

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use cb_core::errors::raise;
use cb_core::{ConstraintViolation, DomainError};

/// Key `validator` uses for struct-level (schema) errors
const OBJECT_LEVEL_KEY: &str = "__all__";

/// Prefix for message keys derived from a validation code
pub const VALIDATION_KEY_PREFIX: &str = "validation.";

/// Validate `value`, turning every failure into one INV-DATA-001 error
pub fn validate<T: Validate>(object_name: &str, value: &T) -> Result<(), DomainError> {
    value.validate().map_err(|errors| validation_error(object_name, &errors))
}

pub fn validation_error(object_name: &str, errors: &ValidationErrors) -> DomainError {
    raise::validation_failed(violations_from(object_name, errors))
}

/// Flatten `errors` into violations ordered by field path
///
/// Nested structs become `parent.child`, list items `parent[i].child`.
pub fn violations_from(object_name: &str, errors: &ValidationErrors) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();
    collect(object_name, None, errors, &mut violations);
    violations
}

fn collect(object_name: &str, prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<ConstraintViolation>) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (field, kind) in entries {
        let field: &str = field.as_ref();
        let path = match (prefix, field) {
            (_, OBJECT_LEVEL_KEY) => prefix.map(String::from),
            (Some(prefix), field) => Some(format!("{}.{}", prefix, field)),
            (None, field) => Some(field.to_string()),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|err| violation(object_name, path.clone(), err)));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect(object_name, path.as_deref(), nested, out);
            }
            ValidationErrorsKind::List(items) => {
                let base = path.unwrap_or_default();
                for (idx, nested) in items {
                    let item_path = format!("{}[{}]", base, idx);
                    collect(object_name, Some(&item_path), nested, out);
                }
            }
        }
    }
}

fn violation(object_name: &str, field: Option<String>, err: &ValidationError) -> ConstraintViolation {
    let message = match &err.message {
        Some(message) => message.to_string(),
        None => format!("{}{}", VALIDATION_KEY_PREFIX, err.code),
    };
    let rejected_value = err.params.get("value").cloned();
    ConstraintViolation::new(object_name, field, rejected_value, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_error(code: &'static str, value: serde_json::Value, message: Option<&'static str>) -> ValidationError {
        let mut err = ValidationError::new(code);
        err.add_param("value".into(), &value);
        if let Some(message) = message {
            err.message = Some(message.into());
        }
        err
    }

    #[test]
    fn test_fields_sorted_with_keys() {
        let mut errors = ValidationErrors::new();
        errors.add("name", field_error("length", json!(""), Some("validation.name.length")));
        errors.add("email", field_error("email", json!("nope"), None));
        errors.add("age", field_error("range", json!(7), None));

        let violations = violations_from("newEmployee", &errors);
        let fields: Vec<_> = violations.iter().map(|v| v.field_name.as_deref()).collect();
        assert_eq!(fields, vec![Some("age"), Some("email"), Some("name")]);

        assert_eq!(violations[0].message, "validation.range");
        assert_eq!(violations[0].rejected_value, Some(json!(7)));
        assert_eq!(violations[1].message, "validation.email");
        assert_eq!(violations[2].message, "validation.name.length");
        assert!(violations.iter().all(|v| v.object_name == "newEmployee"));
    }

    #[test]
    fn test_nested_and_object_level() {
        let mut address = ValidationErrors::new();
        address.add("city", field_error("required", json!(null), None));

        let mut errors = ValidationErrors::new();
        errors.add("__all__", ValidationError::new("passwords_match"));
        errors.errors_mut().insert("address", ValidationErrorsKind::Struct(Box::new(address)));

        let violations = violations_from("signup", &errors);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field_name, None);
        assert_eq!(violations[0].message, "validation.passwords_match");
        assert_eq!(violations[0].rejected_value, None);
        assert_eq!(violations[1].field_name.as_deref(), Some("address.city"));
    }

    #[test]
    fn test_validation_error_kind() {
        let mut errors = ValidationErrors::new();
        errors.add("email", field_error("email", json!("x"), None));
        let error = validation_error("newEmployee", &errors);
        assert_eq!(error.stable_code(), "INV-DATA-001");
        assert_eq!(error.violations().len(), 1);
    }
}
