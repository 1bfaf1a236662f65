//! Lenient parsing of the timestamp strings the remote service emits.
//!
//! Timestamps arrive as SQLite `CURRENT_TIMESTAMP` text, ISO-8601 with or
//! without fractional seconds, RFC 3339 with an offset, or a bare date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A single parse attempt.
pub type Parser<T> = fn(&str) -> Option<T>;

/// Display format for list rows (`day.month.year hour:minute`).
pub const DISPLAY_FORMAT: &str = "%d.%m.%y %H:%M";

/// Formats tried in order; the first success wins.
pub const TIMESTAMP_PARSERS: [Parser<NaiveDateTime>; 4] =
    [space_separated, iso_local, rfc3339_wall_clock, date_only];

/// Runs `parsers` in order against `input` and returns the first success.
pub fn first_success<T>(input: &str, parsers: &[Parser<T>]) -> Option<T> {
    parsers.iter().find_map(|parse| parse(input))
}

fn space_separated(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f").ok()
}

fn iso_local(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

fn rfc3339_wall_clock(input: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.naive_local())
}

fn date_only(input: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parses a remote timestamp with the standard parser list.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    first_success(raw.trim(), &TIMESTAMP_PARSERS)
}

/// Formats a remote timestamp for display, falling back to the raw string.
pub fn format_display(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
