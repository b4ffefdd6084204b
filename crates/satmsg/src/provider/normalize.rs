//! Provider response normalization
//!
//! Pulls typed records out of the provider's loosely shaped JSON. Absent or
//! malformed lists are treated as "no data", never as errors.

use chrono::{DateTime, NaiveDateTime};
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract the list stored under `field` of a provider response object.
///
/// Returns `None` when the field is missing or is not a JSON array.
pub fn list_field<'a>(response: &'a Value, field: &str) -> Option<&'a Vec<Value>> {
    response.get(field).and_then(Value::as_array)
}

/// Decode every element of a provider list into `T`.
///
/// A missing or non-list value yields an empty vector. Elements that do not
/// match the expected shape are skipped with a warning.
pub fn parse_list<T: DeserializeOwned>(items: Option<&Vec<Value>>, what: &str) -> Vec<T> {
    let Some(items) = items else {
        warn!("Provider returned no {} list", what);
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<T>(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping malformed {} entry at index {}: {}", what, idx, e);
                None
            }
        })
        .collect()
}

/// Parse a provider timestamp for ordering.
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS` (space or `T` separator,
/// optional fractional seconds). Fields need not be zero-padded.
pub fn parse_utc(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    let naive = raw.trim_end_matches('Z');
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
}
