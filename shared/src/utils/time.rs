//! Conversion between canonical UTC instants and client-facing time strings
//!
//! Instants are stored in UTC and rendered in the request's time zone.
//! Parsing accepts, in priority order, offset-qualified input, zone-qualified
//! input and finally local input. Local input carries no offset, so it is
//! interpreted in the request's time zone before conversion to UTC: the same
//! string parses to different instants under different request contexts.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::types::{RequestContext, TimeZoneId};

/// Locale-independent display pattern; the zone id is appended after a space
pub const DISPLAY_PATTERN: &str = "%Y-%m-%d %I:%M:%S %p";

const OFFSET_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y%m%dT%H%M%S%z",
];

const LOCAL_PATTERNS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    DISPLAY_PATTERN,
];

const DATE_PATTERNS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Failures when reading client-supplied times
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Unrecognized date-time format: {0}")]
    UnrecognizedFormat(String),

    #[error("Local time {local} cannot be placed in zone {zone}")]
    OutOfRange { local: String, zone: String },
}

/// Current instant in UTC
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a UTC instant into the given zone
pub fn to_zone(instant: DateTime<Utc>, zone: &TimeZoneId) -> DateTime<FixedOffset> {
    instant.with_timezone(&zone.offset_at(instant))
}

/// Render a UTC instant in an explicit zone
pub fn format_in_zone(instant: DateTime<Utc>, zone: &TimeZoneId) -> String {
    format!("{} {}", to_zone(instant, zone).format(DISPLAY_PATTERN), zone)
}

/// Render a UTC instant in the request's time zone
///
/// `2024-01-02T15:04:05Z` renders as `2024-01-02 03:04:05 PM UTC` under the
/// default context and `2024-01-02 10:04:05 AM America/New_York` under a
/// New York context.
pub fn to_context_zone(instant: DateTime<Utc>, ctx: &RequestContext) -> String {
    format_in_zone(instant, ctx.time_zone())
}

/// Parse a client-supplied time and normalize it to UTC
///
/// Input with an explicit offset yields the same instant under any context.
/// Input without one is read as wall-clock time in `ctx`'s zone.
pub fn parse_from_client(text: &str, ctx: &RequestContext) -> Result<DateTime<Utc>, TimeParseError> {
    let text = text.trim();

    if let Some(instant) = parse_offset_qualified(text) {
        return Ok(instant);
    }
    if let Some(result) = parse_zone_qualified(text) {
        return result;
    }
    if let Some(local) = parse_local(text) {
        return local_to_utc(local, ctx.time_zone());
    }

    Err(TimeParseError::UnrecognizedFormat(text.to_string()))
}

fn parse_offset_qualified(text: &str) -> Option<DateTime<Utc>> {
    // An explicit offset takes precedence over a bracketed zone suffix.
    let text = strip_bracketed_zone(text).map_or(text, |(head, _)| head);

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    OFFSET_PATTERNS
        .iter()
        .find_map(|pattern| DateTime::parse_from_str(text, pattern).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_zone_qualified(text: &str) -> Option<Result<DateTime<Utc>, TimeParseError>> {
    let (local_part, zone_part) = strip_bracketed_zone(text).or_else(|| {
        let idx = text.rfind(' ')?;
        Some((&text[..idx], &text[idx + 1..]))
    })?;

    let zone = TimeZoneId::parse(zone_part)?;
    let local = parse_local(local_part.trim())?;
    Some(local_to_utc(local, &zone))
}

fn strip_bracketed_zone(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_suffix(']')?;
    let idx = inner.rfind('[')?;
    Some((&inner[..idx], &inner[idx + 1..]))
}

fn parse_local(text: &str) -> Option<NaiveDateTime> {
    LOCAL_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .or_else(|| {
            DATE_PATTERNS
                .iter()
                .find_map(|pattern| NaiveDate::parse_from_str(text, pattern).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Interpret wall-clock time in `zone` using jiff's `compatible` disambiguation
///
/// Times repeated by a DST fold take the earlier instant; times skipped by a
/// DST gap are pushed forward by the gap length.
fn local_to_utc(local: NaiveDateTime, zone: &TimeZoneId) -> Result<DateTime<Utc>, TimeParseError> {
    if zone.is_utc() {
        return Ok(Utc.from_utc_datetime(&local));
    }

    let out_of_range = || TimeParseError::OutOfRange {
        local: local.to_string(),
        zone: zone.to_string(),
    };

    let civil = to_civil(local).ok_or_else(out_of_range)?;
    let ts = zone
        .rules()
        .to_ambiguous_timestamp(civil)
        .compatible()
        .map_err(|_| out_of_range())?;
    let nanos = i64::try_from(ts.as_nanosecond()).map_err(|_| out_of_range())?;
    Ok(Utc.timestamp_nanos(nanos))
}

fn to_civil(local: NaiveDateTime) -> Option<jiff::civil::DateTime> {
    use chrono::{Datelike, Timelike};

    jiff::civil::DateTime::new(
        i16::try_from(local.year()).ok()?,
        i8::try_from(local.month()).ok()?,
        i8::try_from(local.day()).ok()?,
        i8::try_from(local.hour()).ok()?,
        i8::try_from(local.minute()).ok()?,
        i8::try_from(local.second()).ok()?,
        i32::try_from(local.nanosecond() % 1_000_000_000).ok()?,
    )
    .ok()
}
