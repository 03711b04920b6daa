//! Wall-clock helpers for the configured service timezone.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// Default timezone used when neither configuration nor `TZ` names one.
pub const DEFAULT_TIMEZONE: &str = "Europe/Kiev";

/// Returns the current time in `tz`.
#[must_use]
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Formats an instant as ISO 8601 with microseconds and a numeric offset,
/// e.g. `2024-03-01T12:00:00.000000+02:00`.
#[must_use]
pub fn format_timestamp(at: &DateTime<Tz>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Returns the current time in `tz`, formatted by [`format_timestamp`].
#[must_use]
pub fn timestamp(tz: Tz) -> String {
    format_timestamp(&now_in(tz))
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns the parser's message if `name` is not a known timezone.
pub fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>().map_err(|e| e.to_string())
}
