use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::ParseError;

/// ISO-8601 shapes RFC 3339 refuses: minute precision, compact `+0800` offsets
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a server timestamp into a UTC instant.
///
/// The server emits ISO-8601, sometimes with a trailing `Z`. The `Z` is
/// rewritten to `+00:00` before RFC 3339 parsing. Timestamps without any
/// offset are taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::InvalidTimestamp("empty timestamp".to_string()));
    }

    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stem) => format!("{}+00:00", stem),
        None => raw.to_string(),
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Some(instant) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
    {
        return Ok(instant.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ParseError::InvalidTimestamp(raw.to_string()))
}

/// `deserialize_with` adapter for [`parse_timestamp`]
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
