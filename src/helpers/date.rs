//! Date helper functions

use chrono::{DateTime, Datelike, Utc};

/// Format a timestamp the way the site displays dates
///
/// # Examples
/// ```ignore
/// format_date(&date) // -> "2024年1月5日"
/// ```
pub fn format_date(date: &DateTime<Utc>) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

/// Format an optional timestamp, empty string when absent
pub fn format_date_opt(date: Option<&DateTime<Utc>>) -> String {
    date.map(format_date).unwrap_or_default()
}
