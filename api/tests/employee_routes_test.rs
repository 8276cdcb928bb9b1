// End-to-end behaviour of the demo routes through the full middleware stack

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::{json, Value};

use cb_api::app::create_app;
use cb_shared::types::RequestContext;

use common::app_state;

macro_rules! init_app {
    () => {
        test::init_service(create_app(app_state(), RequestContext::default())).await
    };
}

#[actix_web::test]
async fn test_get_existing_employee() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/employees/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("SUCCESS!"));
    assert_eq!(body["response"]["data"]["name"], json!("Ada Lovelace"));
    assert_eq!(body["response"]["path"], json!("/api/v1/employees/1"));
}

#[actix_web::test]
async fn test_missing_employee_localized() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/employees/42")
        .insert_header(("locale", "de"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["response"]["errorCode"], json!("EMP-NF-001"));
    assert_eq!(body["response"]["statusCode"], json!(404));
    assert_eq!(body["response"]["message"], json!("Mitarbeiter mit der ID 42 wurde nicht gefunden"));
    assert!(body["response"]["debugMessage"].as_str().unwrap().contains("[1:id=42]"));
}

#[actix_web::test]
async fn test_create_employee() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/employees")
        .set_json(json!({
            "name": "Grace Hopper",
            "email": "grace@navy.mil",
            "age": 45
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["status"], json!("CREATED"));
    assert_eq!(body["response"]["data"]["id"], json!("2"));
    assert_eq!(body["response"]["data"]["email"], json!("grace@navy.mil"));
}

#[actix_web::test]
async fn test_invalid_employee_reports_every_field() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/employees")
        .set_json(json!({
            "name": "A",
            "email": "nope",
            "age": 7
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("INV-DATA-001"));
    assert_eq!(body["response"]["message"], json!("Validation failed for one or more fields"));

    let details = body["response"]["errorDetails"].as_array().unwrap();
    let fields: Vec<&str> = details.iter().map(|d| d["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["age", "email", "name"]);

    assert_eq!(details[0]["message"], json!("Age must be between 18 and 70"));
    assert_eq!(details[0]["rejectedValue"], json!(7));
    assert_eq!(details[1]["message"], json!("nope is not a valid email address"));
    assert_eq!(details[2]["message"], json!("Name must be between 2 and 100 characters"));
    assert!(details.iter().all(|d| d["object"] == json!("newEmployee")));
}

#[actix_web::test]
async fn test_duplicate_employee_conflicts() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/employees")
        .set_json(json!({
            "name": "Ada Again",
            "email": "ADA@cometbid.org",
            "age": 40
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("EMP-EXIST-001"));
    assert_eq!(
        body["response"]["message"],
        json!("An employee with email ADA@cometbid.org already exists")
    );
}

#[actix_web::test]
async fn test_malformed_json() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/employees")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("HTTP-ERR-0005"));
    assert_eq!(body["response"]["message"], json!("The request body is not valid JSON"));
}

#[actix_web::test]
async fn test_wrong_content_type() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/employees")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("name=Grace")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("HTTP-ERR-0002"));
}

#[actix_web::test]
async fn test_unknown_route() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("GEN-NF-001"));
    assert_eq!(body["response"]["message"], json!("No resource found at /api/v1/nowhere"));
    assert_eq!(body["response"]["method"], json!("GET"));
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["data"]["status"], json!("healthy"));
}

#[actix_web::test]
async fn test_time_echo_in_request_zone() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/time/echo?at=2024-01-02T10:04:05&tz=America/New_York")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["response"]["data"];
    assert_eq!(data["utc"], json!("2024-01-02T15:04:05Z"));
    assert_eq!(data["rendered"], json!("2024-01-02 10:04:05 AM America/New_York"));
    assert_eq!(data["timeZone"], json!("America/New_York"));
}

#[actix_web::test]
async fn test_time_echo_offset_ignores_zone() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/time/echo?at=2024-01-02T15:04:05Z&tz=Asia/Tokyo")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["data"]["utc"], json!("2024-01-02T15:04:05Z"));
}

#[actix_web::test]
async fn test_time_echo_rejects_garbage() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/time/echo?at=yesterday").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("INV-PARAM-001"));
    assert_eq!(body["response"]["message"], json!("Invalid parameter: at"));
}

#[actix_web::test]
async fn test_time_echo_missing_parameter() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/time/echo").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"]["errorCode"], json!("INV-PARAM-001"));
}
