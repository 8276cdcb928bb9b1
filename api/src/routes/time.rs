use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use chrono::SecondsFormat;

use cb_core::args;
use cb_core::errors::raise;
use cb_shared::utils::{parse_from_client, to_context_zone};

use crate::app::AppState;
use crate::dto::{TimeEchoQuery, TimeEchoResponse};
use crate::handlers::ApiResult;
use crate::middleware::request_context::RequestContextExt;

/// `GET /api/v1/time/echo?at=...`
///
/// Reads `at` in the request's time zone unless it carries its own offset or
/// zone, then echoes the instant in UTC and in the request's zone.
pub async fn echo(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<TimeEchoQuery>,
) -> ApiResult<HttpResponse> {
    let context = req.request_context();
    let instant = parse_from_client(&query.at, &context)
        .map_err(|err| raise::invalid_parameter(args!["at"]).add_context("detail", err.to_string()))?;

    let body = TimeEchoResponse {
        received: query.at.clone(),
        utc: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        rendered: to_context_zone(instant, &context),
        time_zone: context.time_zone().to_string(),
    };
    Ok(state.envelope.success_response(&req, StatusCode::OK, body))
}
