// Envelope assembly for domain errors and success payloads

mod common;

use actix_web::http::StatusCode;
use serde_json::{json, Value};

use cb_api::handlers::EnvelopeBuilder;
use cb_core::args;
use cb_core::errors::{raise, ConstraintViolation};
use cb_core::i18n::{CatalogError, MessageCatalog};
use cb_shared::config::EnvelopeConfig;
use cb_shared::types::{Locale, RequestContext, RequestScope};

use common::{envelope_builder, envelope_builder_with, fixed_instant};

fn scope(context: RequestContext) -> RequestScope {
    RequestScope::new("/api/v1/employees/42", "GET", context)
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

struct FailingCatalog;

impl MessageCatalog for FailingCatalog {
    fn lookup(&self, _key: &str, _locale: &Locale) -> Result<Option<String>, CatalogError> {
        Err(CatalogError::Unavailable("bundle store offline".to_string()))
    }
}

#[test]
fn test_not_found_in_new_york() {
    let context = RequestContext::default().with_time_zone("America/New_York");
    let error = raise::resource_not_found(args!["Employee", 42]).add_context("id", 42);

    let envelope = envelope_builder().build_error_at(&error, &scope(context), fixed_instant());
    let body = to_json(&envelope);

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("ERROR!"));
    assert_eq!(body["response"]["statusCode"], json!(404));
    assert_eq!(body["response"]["status"], json!("NOT_FOUND"));
    assert_eq!(body["response"]["errorCode"], json!("GEN-NF-001"));
    assert_eq!(body["response"]["message"], json!("Employee with id 42 was not found"));
    assert_eq!(body["response"]["path"], json!("/api/v1/employees/42"));
    assert_eq!(body["response"]["method"], json!("GET"));
    assert_eq!(body["response"]["timestamp"], json!("2024-01-02 10:04:05 AM America/New_York"));
    assert_eq!(body["response"]["traceId"], Value::Null);
    assert_eq!(body["response"]["errorDetails"], json!([]));
    assert_eq!(
        body["metadata"]["sendReport"],
        json!("https://api.cometbid.org/support/report?id=")
    );
    assert_eq!(body["metadata"]["apiVersion"], json!("v1"));
}

#[test]
fn test_same_error_rendered_per_locale() {
    let error = raise::employee_not_found(args!["7"]);
    let builder = envelope_builder();

    let german = builder.build_error_at(&error, &scope(RequestContext::default().with_locale("de")), fixed_instant());
    let english = builder.build_error_at(&error, &scope(RequestContext::default()), fixed_instant());

    assert_eq!(german.api_error().unwrap().short_message, "Mitarbeiter mit der ID 7 wurde nicht gefunden");
    assert_eq!(english.api_error().unwrap().short_message, "Employee with id 7 was not found");
    assert_eq!(german.api_error().unwrap().error_code, english.api_error().unwrap().error_code);
}

#[test]
fn test_regional_locale_falls_back_to_language() {
    let error = raise::resource_not_found(args!["Employee", 3]);
    let context = RequestContext::default().with_locale("fr_CA");

    let envelope = envelope_builder().build_error_at(&error, &scope(context), fixed_instant());
    assert_eq!(envelope.api_error().unwrap().short_message, "Employee avec l'identifiant 3 est introuvable");
}

#[test]
fn test_generic_error_without_templates() {
    let error = raise::application_error("connection pool exhausted", None);
    let envelope = EnvelopeBuilder::degraded().build_error_at(&error, &scope(RequestContext::default()), fixed_instant());

    let api_error = envelope.api_error().unwrap();
    assert_eq!(api_error.short_message, "app.def.error");
    assert_eq!(api_error.http_status_code, 500);
    assert_eq!(api_error.status, "INTERNAL_SERVER_ERROR");
    let debug = api_error.debug_message.as_deref().unwrap();
    assert!(debug.starts_with("app.def.error"));
    assert!(debug.contains("[1:detail=connection pool exhausted]"));
}

#[test]
fn test_nested_templates_expand() {
    let error = raise::system_error(args![]);
    let envelope = envelope_builder().build_error_at(&error, &scope(RequestContext::default()), fixed_instant());
    assert_eq!(
        envelope.api_error().unwrap().short_message,
        "Cometbid encountered a system error. If the problem persists, contact support"
    );
}

#[test]
fn test_catalog_fault_degrades_to_code() {
    let builder = EnvelopeBuilder::new(std::sync::Arc::new(FailingCatalog), EnvelopeConfig::default());
    let error = raise::employee_not_found(args!["42"]);

    let envelope = builder.build_error_at(&error, &scope(RequestContext::default()), fixed_instant());
    let api_error = envelope.api_error().unwrap();
    assert_eq!(api_error.short_message, "EMP-NF-001");
    assert_eq!(api_error.error_code, "EMP-NF-001");
    assert_eq!(api_error.http_status_code, 404);
}

#[test]
fn test_validation_errors_fan_in_order() {
    let error = raise::validation_failed(vec![
        ConstraintViolation::field("newEmployee", "name", "A", "validation.name.length"),
        ConstraintViolation::field("newEmployee", "email", "nope", "validation.email"),
        ConstraintViolation::new("newEmployee", None, None, "Passwords must match"),
    ]);

    let envelope = envelope_builder().build_error_at(&error, &scope(RequestContext::default()), fixed_instant());
    let body = to_json(&envelope);

    assert_eq!(body["response"]["statusCode"], json!(422));
    assert_eq!(body["response"]["errorCode"], json!("INV-DATA-001"));
    assert_eq!(
        body["response"]["errorDetails"],
        json!([
            {
                "object": "newEmployee",
                "field": "name",
                "rejectedValue": "A",
                "message": "Name must be between 2 and 100 characters"
            },
            {
                "object": "newEmployee",
                "field": "email",
                "rejectedValue": "nope",
                "message": "nope is not a valid email address"
            },
            {
                "object": "newEmployee",
                "field": null,
                "rejectedValue": null,
                "message": "Passwords must match"
            }
        ])
    );
}

#[test]
fn test_literal_violation_messages_untouched() {
    let error = raise::validation_failed(vec![ConstraintViolation::field(
        "newEmployee",
        "code",
        "X1",
        "Value must match {0} or {app.name}",
    )]);

    let envelope = envelope_builder().build_error_at(&error, &scope(RequestContext::default()), fixed_instant());
    let body = to_json(&envelope);
    assert_eq!(
        body["response"]["errorDetails"][0]["message"],
        json!("Value must match {0} or {app.name}")
    );
}

#[test]
fn test_violation_arguments_carry_value_type() {
    let error = raise::validation_failed(vec![
        ConstraintViolation::field("newEmployee", "age", "forty", "validation.type"),
        ConstraintViolation::field("newEmployee", "email", "{app.name}", "validation.email"),
    ]);

    let envelope = envelope_builder().build_error_at(&error, &scope(RequestContext::default()), fixed_instant());
    let body = to_json(&envelope);
    assert_eq!(
        body["response"]["errorDetails"][0]["message"],
        json!("age does not accept a string value")
    );
    assert_eq!(
        body["response"]["errorDetails"][1]["message"],
        json!("{app.name} is not a valid email address")
    );
}

#[test]
fn test_debug_message_hidden_in_production() {
    let config = EnvelopeConfig {
        include_debug_message: false,
        ..EnvelopeConfig::default()
    };
    let error = raise::application_error("boom", None);
    let envelope = envelope_builder_with(config).build_error_at(&error, &scope(RequestContext::default()), fixed_instant());

    let body = to_json(&envelope);
    assert!(body["response"].get("debugMessage").is_none());
}

#[test]
fn test_trace_id_links_report() {
    let scope = scope(RequestContext::default()).with_trace_id("abc123");
    let error = raise::bad_request(args![]);

    let envelope = envelope_builder().build_error_at(&error, &scope, fixed_instant());
    let body = to_json(&envelope);
    assert_eq!(body["response"]["traceId"], json!("abc123"));
    assert_eq!(
        body["metadata"]["sendReport"],
        json!("https://api.cometbid.org/support/report?id=abc123")
    );
}

#[test]
fn test_upstream_failure_keeps_424() {
    let error = raise::api_response_error("payments returned 503", Some(503), None);
    let envelope = envelope_builder().build_error_at(&error, &scope(RequestContext::default()), fixed_instant());

    let api_error = envelope.api_error().unwrap();
    assert_eq!(api_error.http_status_code, 424);
    assert_eq!(api_error.error_code, "API-RESP-001");
    assert_eq!(api_error.short_message, "A dependent service returned an error");
    assert!(api_error.debug_message.as_deref().unwrap().contains("[2:upstreamStatus=503]"));
}

#[test]
fn test_success_envelope() {
    let scope = RequestScope::new("/health", "GET", RequestContext::default());
    let envelope =
        envelope_builder().build_success_at(Some(json!({"status": "healthy"})), StatusCode::OK, &scope, fixed_instant());
    let body = to_json(&envelope);

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("SUCCESS!"));
    assert_eq!(body["response"]["status"], json!("OK"));
    assert_eq!(body["response"]["statusCode"], json!(200));
    assert_eq!(body["response"]["message"], json!("OK"));
    assert_eq!(body["response"]["timestamp"], json!("2024-01-02 03:04:05 PM UTC"));
    assert_eq!(body["response"]["data"]["status"], json!("healthy"));
}

#[actix_web::test]
async fn test_async_raisers_match_eager() {
    let builder = envelope_builder();
    let scope = scope(RequestContext::default().with_locale("de").with_time_zone("Europe/Berlin"));

    let eager = raise::employee_already_exists(args!["ada@cometbid.org"]);
    let deferred = raise::employee_already_exists_async::<()>(args!["ada@cometbid.org"])
        .await
        .unwrap_err();

    let eager = to_json(&builder.build_error_at(&eager, &scope, fixed_instant()));
    let deferred = to_json(&builder.build_error_at(&deferred, &scope, fixed_instant()));
    assert_eq!(eager, deferred);
    assert_eq!(eager["response"]["statusCode"], json!(409));
}
