//! Lenient date/time parsing for export cells.
//!
//! The order portal, Excel and hand-edited CSVs all spell dates differently.
//! Anything we cannot read becomes `None` (coerce semantics), never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    // two-digit years first, `%Y` would accept "25" as year 25
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y/%m/%d",
];

/// Parse a cell into a date-time, or `None` when it is blank or unreadable.
///
/// Date-only spellings resolve to midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Milliseconds since the Unix epoch, the physical value of a `Datetime(ms)` cell.
pub fn to_millis(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

pub fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Days since the Unix epoch, the physical value of a `Date` cell.
pub fn epoch_days(date: NaiveDate) -> i64 {
    date.signed_duration_since(DateTime::UNIX_EPOCH.date_naive())
        .num_days()
}

/// Render a ship/order date the way reports show it.
pub fn display_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .expect("valid test date")
    }

    #[test]
    fn test_parses_common_spellings() {
        let midnight = ymd_hms(2025, 10, 30, 0, 0, 0);
        for raw in [
            "2025-10-30",
            "10/30/2025",
            "10/30/25",
            "30-Oct-2025",
            "Oct 30, 2025",
            "October 30, 2025",
            " 2025-10-30 ",
        ] {
            assert_eq!(parse_datetime(raw), Some(midnight), "failed on {raw:?}");
        }
    }

    #[test]
    fn test_parses_time_of_day() {
        let expected = ymd_hms(2025, 10, 30, 14, 5, 0);
        assert_eq!(parse_datetime("2025-10-30 14:05:00"), Some(expected));
        assert_eq!(parse_datetime("2025-10-30T14:05:00"), Some(expected));
        assert_eq!(parse_datetime("10/30/2025 14:05"), Some(expected));
        assert_eq!(parse_datetime("10/30/2025 2:05 PM"), Some(expected));
    }

    #[test]
    fn test_unreadable_values_become_absent() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("   "), None);
        assert_eq!(parse_datetime("TBD"), None);
        assert_eq!(parse_datetime("13/45/2025"), None);
    }

    #[test]
    fn test_millis_round_trip() {
        let dt = ymd_hms(2025, 10, 31, 8, 30, 0);
        assert_eq!(from_millis(to_millis(dt)), Some(dt));
    }

    #[test]
    fn test_epoch_days() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 2).expect("valid date");
        assert_eq!(epoch_days(epoch), 1);
    }

    #[test]
    fn test_display_drops_midnight() {
        assert_eq!(display_datetime(ymd_hms(2025, 10, 31, 0, 0, 0)), "2025-10-31");
        assert_eq!(
            display_datetime(ymd_hms(2025, 10, 31, 9, 15, 0)),
            "2025-10-31 09:15:00"
        );
    }
}
