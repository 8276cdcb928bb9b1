use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::StatusCode,
    Error,
};
use futures_util::future::LocalBoxFuture;

use cb_core::args;
use cb_core::errors::{raise, DomainError, ErrorKindId, CAUSE_LABEL};

use crate::handlers::envelope::EnvelopeBuilder;
use crate::handlers::error::AppError;
use crate::middleware::request_context::RequestContextExt;

/// Message key for requests that match no resource
pub const PATH_NOT_FOUND_KEY: &str = "not.found.path";

/// Middleware rendering every failed response as an error envelope
///
/// `AppError`s are re-rendered with the request's locale, time zone and
/// trace id. Any other error, whether from an extractor, the router or
/// another middleware, is classified by its status and rendered the same way.
#[derive(Clone)]
pub struct ErrorEnvelopeMiddleware {
    builder: Arc<EnvelopeBuilder>,
}

impl ErrorEnvelopeMiddleware {
    pub fn new(builder: Arc<EnvelopeBuilder>) -> Self {
        Self { builder }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorEnvelopeMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorEnvelopeMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorEnvelopeMiddlewareService {
            service: Rc::new(service),
            builder: Arc::clone(&self.builder),
        }))
    }
}

pub struct ErrorEnvelopeMiddlewareService<S> {
    service: Rc<S>,
    builder: Arc<EnvelopeBuilder>,
}

impl<S, B> Service<ServiceRequest> for ErrorEnvelopeMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let builder = Arc::clone(&self.builder);
        // Owned snapshot; the router needs sole ownership of the request
        let scope = req.request_scope();

        Box::pin(async move {
            let res = match service.call(req).await {
                Ok(res) => res,
                Err(err) => {
                    let error = classify(&err, err.as_response_error().status_code(), &scope.path);
                    let response = builder.error_response(&error, &scope);
                    return Err(InternalError::from_response(err, response).into());
                }
            };

            let status = res.status();
            let rendered = res.response().error().map(|err| match err.as_error::<AppError>() {
                Some(app_error) => builder.error_response(&app_error.0, &scope),
                None => builder.error_response(&classify(err, status, &scope.path), &scope),
            });

            match rendered {
                Some(response) => {
                    let (req, _) = res.into_parts();
                    Ok(ServiceResponse::new(req, response).map_into_right_body())
                }
                None => Ok(res.map_into_left_body()),
            }
        })
    }
}

/// Map an error that is not a `DomainError` onto the closest kind
pub fn classify(err: &Error, status: StatusCode, path: &str) -> DomainError {
    let detail = err.to_string();
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => raise::unsupported_media_type(args![]).add_context("detail", detail),
        StatusCode::NOT_ACCEPTABLE => raise::media_type_not_acceptable(args![]).add_context("detail", detail),
        StatusCode::BAD_REQUEST => raise::request_not_readable(args![]).add_context("detail", detail),
        StatusCode::NOT_FOUND => raise::raise_with_key(ErrorKindId::ResourceNotFound, PATH_NOT_FOUND_KEY, args![path])
            .add_context("detail", detail),
        StatusCode::REQUEST_TIMEOUT => raise::request_timeout(args![]).add_context("detail", detail),
        _ => raise::application_error(format!("Unhandled error with status {}", status), None)
            .add_context(CAUSE_LABEL, detail),
    }
}
