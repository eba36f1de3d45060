//! Local calendar date helpers shared by the stores and the month view.
//!
//! Dates are keyed as `YYYY-MM-DD` strings. All math here is on local calendar dates; there is no
//! time zone handling beyond asking for today's local date.

use chrono::{Datelike, Local, NaiveDate};

/// The format of a date key, e.g. `2024-03-15`.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The format used to show a date to the user, e.g. `Mar 15, 2024`.
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats `date` as a date key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a date key. Returns `None` for anything that is not a valid `YYYY-MM-DD` date.
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT).ok()
}

/// Formats a date key for display, e.g. `2024-03-15` -> `Mar 15, 2024`. Strings that are not date
/// keys are returned unchanged.
pub fn format_date_for_display(date_key: &str) -> String {
    match parse_date_key(date_key) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => date_key.to_string(),
    }
}

/// The Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// The first day of `date`'s month.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// January 1st of `date`'s year.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

/// Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// The number of days in the given month, or `None` for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date_key(s).unwrap()
    }

    #[test]
    fn test_parse_and_format_date_key() {
        let d = date("2024-03-05");
        assert_eq!(format_date_key(d), "2024-03-05");
        assert!(parse_date_key("2024-02-30").is_none());
        assert!(parse_date_key("March 5").is_none());
        assert!(parse_date_key("").is_none());
    }

    #[test]
    fn test_format_for_display() {
        assert_eq!(format_date_for_display("2024-03-15"), "Mar 15, 2024");
        assert_eq!(format_date_for_display("2024-03-05"), "Mar 5, 2024");
        assert_eq!(format_date_for_display("someday"), "someday");
    }

    #[test]
    fn test_start_of_week_is_sunday() {
        // 2024-03-15 is a Friday.
        assert_eq!(start_of_week(date("2024-03-15")), date("2024-03-10"));
        assert_eq!(start_of_week(date("2024-03-10")), date("2024-03-10"));
        // Crossing a month boundary.
        assert_eq!(start_of_week(date("2024-03-01")), date("2024-02-25"));
    }

    #[test]
    fn test_start_of_month_and_year() {
        assert_eq!(start_of_month(date("2024-03-15")), date("2024-03-01"));
        assert_eq!(start_of_year(date("2024-03-15")), date("2024-01-01"));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(date("2024-03-16")));
        assert!(is_weekend(date("2024-03-17")));
        assert!(!is_weekend(date("2024-03-15")));
    }
}
