//! HTTP routes
//!
//! Handlers return `ApiResult`; every failure, including extractor
//! rejections, leaves as an error envelope.

pub mod employees;
pub mod health;
pub mod time;

use actix_web::{error, web, HttpRequest, HttpResponse};

use cb_core::args;
use cb_core::errors::{raise, ErrorKindId};

use crate::handlers::{ApiResult, AppError};
use crate::middleware::error_handler::PATH_NOT_FOUND_KEY;

pub use employees::EmployeeDirectory;

/// Register every route under `cfg`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/employees")
                        .route("", web::post().to(employees::create_employee))
                        .route("/{id}", web::get().to(employees::get_employee)),
                )
                .route("/time/echo", web::get().to(time::echo)),
        );
}

/// JSON body rejections mapped onto their kinds
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        let error = match err {
            error::JsonPayloadError::Deserialize(_) => raise::json_parse_error(args![]),
            error::JsonPayloadError::ContentType => raise::unsupported_media_type(args![]),
            _ => raise::request_not_readable(args![]),
        };
        AppError::from(error.add_context("detail", detail)).into()
    })
}

/// Query string rejections become INV-PARAM-001
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        AppError::from(raise::invalid_parameter(args![detail.clone()]).add_context("detail", detail)).into()
    })
}

/// Fallback for requests that match no route
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(raise::raise_with_key(ErrorKindId::ResourceNotFound, PATH_NOT_FOUND_KEY, args![req.path()])
        .add_context("method", req.method().as_str())
        .into())
}
