use chrono::NaiveDateTime;

use crate::orders::dates::display_datetime;

/// Returns the value, or "—" if absent.
pub fn or_dash(v: Option<&str>) -> &str {
    v.unwrap_or("—")
}

/// Formats an optional date-time for reports, or returns "—" if absent.
pub fn fmt_opt_datetime(v: Option<NaiveDateTime>) -> String {
    v.map(display_datetime).unwrap_or_else(|| "—".to_owned())
}

/// Generation date as shown in report headers, e.g. "October 30, 2025".
pub fn long_date(date: chrono::NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
