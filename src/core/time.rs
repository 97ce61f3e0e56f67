//! Timestamp normalisation. Every canonical timestamp is milliseconds since
//! the Unix epoch.

use crate::core::errors::ExchangeError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds to milliseconds, truncating toward zero.
pub const fn micros_to_millis(micros: i64) -> i64 {
    micros / 1000
}

/// ISO-8601 UTC string with millisecond precision, e.g. `2019-12-07T22:55:00.000Z`.
pub fn iso8601(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse an RFC 3339 / ISO-8601 string into milliseconds.
pub fn parse8601(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Current wall-clock time in milliseconds
pub fn now_millis() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| ExchangeError::NetworkError(format!("Failed to get timestamp: {}", e)))
}
