//! Date parsing and formatting
//!
//! Route and transfer dates travel to the backend as compact `YYYYMMDD`
//! strings while users type them in whatever shape their locale suggests.
//! These helpers normalize the common shapes and render dates for display.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn slashed_us() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"))
}

fn iso_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").expect("valid regex"))
}

fn compact() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("valid regex"))
}

/// Parse a user- or API-supplied date into `YYYYMMDD`.
///
/// Accepted shapes:
/// - `YYYY-MM-DD`, `YYYY/MM/DD` (single-digit month/day allowed)
/// - `MM/DD/YYYY`, `M/D/YYYY`
/// - `YYYYMMDD`
/// - RFC 3339 timestamps (`2024-03-05T10:00:00Z`)
/// - local timestamps without offset (`2024-03-05T10:00` or `...T10:00:00`)
///
/// Returns `None` for anything else or for impossible calendar dates.
pub fn parse_to_yyyymmdd(input: &str) -> Option<String> {
    parse_date(input).map(|d| d.format("%Y%m%d").to_string())
}

/// Parse any of the shapes accepted by [`parse_to_yyyymmdd`] into a date
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = compact().captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = iso_like().captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = slashed_us().captures(s) {
        return ymd(&caps[3], &caps[1], &caps[2]);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Convert a `YYYYMMDD` string back into a date
pub fn yyyymmdd_to_date(input: &str) -> Option<NaiveDate> {
    let caps = compact().captures(input.trim())?;
    ymd(&caps[1], &caps[2], &caps[3])
}

/// `YYYY-MM-DD` form used in request bodies
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `MM/DD/YYYY` form used in tables
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Render any accepted input for display, or `"-"` when it cannot be parsed
pub fn display_or_dash(input: Option<&str>) -> String {
    input
        .and_then(parse_date)
        .map(format_display_date)
        .unwrap_or_else(|| "-".to_string())
}

/// Today's date (UTC) as `YYYYMMDD`
pub fn today_yyyymmdd() -> String {
    Utc::now().date_naive().format("%Y%m%d").to_string()
}
