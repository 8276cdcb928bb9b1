pub mod error_handler;
pub mod request_context;

pub use error_handler::ErrorEnvelopeMiddleware;
pub use request_context::{RequestContextExt, RequestContextMiddleware};
