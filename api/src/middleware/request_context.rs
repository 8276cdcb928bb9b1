//! Per-request locale, time zone and trace id
//!
//! Resolved once before the handler runs and stored in the request's
//! extensions, which are dropped with the request.

use std::collections::HashMap;
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use cb_shared::types::context::{LOCALE_HEADER, TIMEZONE_HEADER};
use cb_shared::types::{RequestContext, RequestScope};

/// Trace id headers, in the order they are consulted
pub const TRACE_ID_HEADERS: [&str; 2] = ["X-B3-TraceId", "X-Request-ID"];

/// Trace id received from the tracing collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// Middleware resolving the `RequestContext` for every request
#[derive(Clone, Default)]
pub struct RequestContextMiddleware {
    defaults: RequestContext,
}

impl RequestContextMiddleware {
    /// Use `defaults` when a request names no locale or time zone
    pub fn new(defaults: RequestContext) -> Self {
        Self { defaults }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextMiddlewareService {
            service: Rc::new(service),
            defaults: self.defaults.clone(),
        }))
    }
}

pub struct RequestContextMiddlewareService<S> {
    service: Rc<S>,
    defaults: RequestContext,
}

impl<S, B> Service<ServiceRequest> for RequestContextMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let context = resolve_context(req.request(), self.defaults.clone());
        let trace_id = extract_trace_id(req.request());

        req.extensions_mut().insert(context);
        if let Some(trace_id) = trace_id {
            req.extensions_mut().insert(TraceId(trace_id));
        }

        Box::pin(async move { service.call(req).await })
    }
}

/// Resolve locale and time zone from headers, then query parameters
pub fn resolve_context(req: &HttpRequest, defaults: RequestContext) -> RequestContext {
    let params = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    RequestContext::resolve_over(
        defaults,
        header_value(req, LOCALE_HEADER),
        header_value(req, TIMEZONE_HEADER),
        |name| params.get(name).map(String::as_str),
    )
}

/// First non-blank trace id header; never generated here
pub fn extract_trace_id(req: &HttpRequest) -> Option<String> {
    TRACE_ID_HEADERS
        .iter()
        .filter_map(|name| header_value(req, name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(String::from)
}

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Access the resolved request state from handlers and middleware
pub trait RequestContextExt {
    /// Resolved context, or the built-in defaults outside the middleware
    fn request_context(&self) -> RequestContext;

    fn trace_id(&self) -> Option<String>;

    /// Path, method, trace id and context of the current request
    fn request_scope(&self) -> RequestScope;
}

impl RequestContextExt for HttpRequest {
    fn request_context(&self) -> RequestContext {
        self.extensions().get::<RequestContext>().cloned().unwrap_or_default()
    }

    fn trace_id(&self) -> Option<String> {
        self.extensions().get::<TraceId>().map(|id| id.0.clone())
    }

    fn request_scope(&self) -> RequestScope {
        RequestScope {
            path: self.path().to_string(),
            method: self.method().to_string(),
            trace_id: RequestContextExt::trace_id(self),
            context: self.request_context(),
        }
    }
}

impl RequestContextExt for ServiceRequest {
    fn request_context(&self) -> RequestContext {
        self.request().request_context()
    }

    fn trace_id(&self) -> Option<String> {
        RequestContextExt::trace_id(self.request())
    }

    fn request_scope(&self) -> RequestScope {
        self.request().request_scope()
    }
}
