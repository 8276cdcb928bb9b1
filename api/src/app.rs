//! Application state and factory
//!
//! Builds the actix-web `App` with the shared state, the request context and
//! error envelope middleware, and every route.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use tracing_actix_web::TracingLogger;

use cb_shared::types::RequestContext;

use crate::handlers::EnvelopeBuilder;
use crate::middleware::{ErrorEnvelopeMiddleware, RequestContextMiddleware};
use crate::routes::{self, EmployeeDirectory};

/// State shared by all workers
pub struct AppState {
    pub envelope: Arc<EnvelopeBuilder>,
    pub employees: EmployeeDirectory,
}

impl AppState {
    pub fn new(envelope: EnvelopeBuilder, employees: EmployeeDirectory) -> Self {
        Self {
            envelope: Arc::new(envelope),
            employees,
        }
    }
}

/// Create the application
///
/// Middleware runs outermost first: request span, then context resolution,
/// then error envelope rendering, so the envelope always sees the resolved
/// locale, time zone and trace id.
pub fn create_app(
    state: web::Data<AppState>,
    defaults: RequestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let envelope = Arc::clone(&state.envelope);

    App::new()
        .app_data(state)
        .wrap(ErrorEnvelopeMiddleware::new(envelope))
        .wrap(RequestContextMiddleware::new(defaults))
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::route().to(routes::not_found))
}
