//! Date validation functions

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

/// `YYYY-MM-DD` that is also a real calendar date (no February 30th)
pub fn is_valid_date(s: &str) -> bool {
    ISO_DATE_REGEX.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Parses a date or timestamp into a UTC instant
///
/// Plain `YYYY-MM-DD` dates are taken as midnight UTC. RFC 3339 timestamps
/// are converted to UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if ISO_DATE_REGEX.is_match(s) {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Strictly after `now`; unparseable input is never in the future
pub fn is_future_date(s: &str, now: DateTime<Utc>) -> bool {
    parse_instant(s).map_or(false, |instant| instant > now)
}

/// Strictly before `now`; unparseable input is never in the past
pub fn is_past_date(s: &str, now: DateTime<Utc>) -> bool {
    parse_instant(s).map_or(false, |instant| instant < now)
}
