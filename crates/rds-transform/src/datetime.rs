//! Lenient date/time parsing.
//!
//! Answers arrive as free text in many shapes. Full datetimes are tried
//! first, then date-only forms, then year-month. US month-first forms win
//! over day-first ones when both would match.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f", // Polars' own Datetime -> String rendering
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S", // US
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
    "%d-%b-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",  // US: 01/15/2024
    "%m-%d-%Y",  // US: 01-15-2024
    "%d/%m/%Y",  // European fallback: 15/01/2024
    "%d-%b-%Y",  // 15-Jan-2024
    "%d-%B-%Y",  // 15-January-2024
    "%d.%m.%Y",  // 15.01.2024
    "%Y%m%d",    // 20240115
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d %b %Y",  // 15 Jan 2024
    "%d %B %Y",  // 15 January 2024
];

/// Parse a date or datetime string. Dates are returned at midnight.
///
/// Returns `None` for empty or unparseable input.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // RFC 3339 with an offset: keep the wall-clock value in UTC.
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    try_parse_date(trimmed)
        .or_else(|| try_parse_year_month(trimmed))
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// `YYYY-MM` resolves to the first of the month.
fn try_parse_year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn parses_iso_forms() {
        assert_eq!(parse_datetime("2024-01-15"), Some(ymd(2024, 1, 15)));
        let dt = parse_datetime("2024-01-15T10:30:45").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "10:30:45");
    }

    #[test]
    fn prefers_us_month_first() {
        assert_eq!(parse_datetime("01/02/2024"), Some(ymd(2024, 1, 2)));
        // Only valid day-first.
        assert_eq!(parse_datetime("15/01/2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn parses_text_months() {
        assert_eq!(parse_datetime("15-Jan-2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_datetime("January 15, 2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn parses_polars_datetime_rendering() {
        let dt = parse_datetime("2024-01-15 10:30:00.000").unwrap();
        assert_eq!(dt.format("%Y-%m-%dT%H:%M").to_string(), "2024-01-15T10:30");
    }

    #[test]
    fn parses_rfc3339_offset() {
        let dt = parse_datetime("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn year_month_is_first_of_month() {
        assert_eq!(parse_datetime("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_datetime("2024-13"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("   "), None);
        assert_eq!(parse_datetime("not a date"), None);
        assert_eq!(parse_datetime("2023-02-30"), None);
    }
}
