pub mod envelope;
pub mod error;
pub mod validation;

pub use envelope::EnvelopeBuilder;
pub use error::{ApiResult, AppError};
pub use validation::{validate, validation_error, violations_from};
