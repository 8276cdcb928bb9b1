pub mod employee;
pub mod time;

pub use employee::{Employee, NewEmployeeRequest};
pub use time::{TimeEchoQuery, TimeEchoResponse};
