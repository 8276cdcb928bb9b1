//! Error taxonomy and the domain error value

pub mod kind;
pub mod raise;

mod domain_error;


pub use domain_error::{arg, Args, BoxError, ConstraintViolation, DomainError, CAUSE_LABEL};
pub use kind::{lookup, lookup_code, ErrorKind, ErrorKindId};

pub type DomainResult<T> = Result<T, DomainError>;
