//! Event date input
//!
//! Accepts RFC 3339 timestamps and offset-less `datetime-local` values
//! (`2024-10-01T18:30`, `2024-10-01T18:30:00`), the latter read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

use crate::domain::FieldUpdate;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an event date in any accepted form
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn invalid_date<E: de::Error>(value: &str) -> E {
    E::custom(format!("invalid date: {}", value))
}

/// `deserialize_with` for a required date
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| invalid_date(&raw))
}

/// `deserialize_with` for a date in a partial update. Pair with `#[serde(default)]`.
pub fn deserialize_update<'de, D>(deserializer: D) -> Result<FieldUpdate<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(FieldUpdate::Null),
        Some(raw) => parse_event_date(&raw)
            .map(FieldUpdate::Value)
            .ok_or_else(|| invalid_date(&raw)),
    }
}
