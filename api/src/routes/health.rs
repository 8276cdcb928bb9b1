use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::app::AppState;

/// `GET /health`
pub async fn health_check(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    state.envelope.success_response(
        &req,
        StatusCode::OK,
        json!({
            "status": "healthy",
            "service": "cometbid-api",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}
