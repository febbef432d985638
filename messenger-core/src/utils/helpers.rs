use chrono::{DateTime, SecondsFormat, Utc};

/// Render a timestamp the way it is stored: ISO-8601, UTC, microseconds, `Z` suffix.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Any RFC 3339 offset is accepted and normalized to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}
