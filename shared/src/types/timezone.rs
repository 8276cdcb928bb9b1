//! IANA time zone identifiers

use chrono::{DateTime, FixedOffset, Offset, Utc};
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

/// Time zone applied when a request does not name one
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// A validated IANA time zone id such as `America/New_York`
///
/// Validation resolves the id against the bundled tz database; the canonical
/// spelling returned by the database is kept, so `america/new_york` is stored
/// as `America/New_York`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeZoneId {
    name: String,
}

impl Default for TimeZoneId {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimeZoneId {
    /// The UTC zone
    pub fn utc() -> Self {
        Self {
            name: DEFAULT_TIMEZONE.to_string(),
        }
    }

    /// Validate a zone id, returning `None` when the database does not know it
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.eq_ignore_ascii_case("utc") || raw.eq_ignore_ascii_case("z") {
            return Some(Self::utc());
        }

        let tz = TimeZone::get(raw).ok()?;
        let name = tz.iana_name().unwrap_or(raw).to_string();
        Some(Self { name })
    }

    /// Validate a zone id, falling back to UTC
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }

    /// The zone id as stored
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Whether this is the UTC zone
    pub fn is_utc(&self) -> bool {
        self.name == DEFAULT_TIMEZONE
    }

    /// Resolve the zone rules; unknown ids resolve to UTC
    pub fn rules(&self) -> TimeZone {
        if self.is_utc() {
            return TimeZone::UTC;
        }
        TimeZone::get(&self.name).unwrap_or_else(|err| {
            tracing::warn!(zone = %self.name, error = %err, "Time zone lookup failed, using UTC");
            TimeZone::UTC
        })
    }

    /// UTC offset in effect at `instant`
    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        let seconds = jiff::Timestamp::from_second(instant.timestamp())
            .map(|ts| self.rules().to_offset(ts).seconds())
            .unwrap_or(0);
        FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
    }
}

impl std::fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for TimeZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown time zone: {}", s))
    }
}

impl TryFrom<String> for TimeZoneId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZoneId> for String {
    fn from(zone: TimeZoneId) -> Self {
        zone.name
    }
}
