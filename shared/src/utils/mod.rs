//! Common utility functions

pub mod time;

pub use time::{format_in_zone, now_utc, parse_from_client, to_context_zone, to_zone, TimeParseError};
