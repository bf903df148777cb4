//! Timestamp parsing and display labels for transactions

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use medtrack_utils::ordinal_suffix;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a stored transaction timestamp.
///
/// Accepts RFC 3339 (`2024-03-15T15:04:05Z`), naive date-times (read as UTC)
/// and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    let utc = FixedOffset::east_opt(0)?;
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| utc.from_utc_datetime(&naive))
}

/// Long display form, e.g. `15th of March 2024 (3:04:05 PM)`
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    let hours = dt.hour();
    let hour12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if hours >= 12 { "PM" } else { "AM" };

    format!(
        "{}{} of {} {} ({}:{:02}:{:02} {})",
        dt.day(),
        ordinal_suffix(dt.day()),
        dt.format("%B"),
        dt.year(),
        hour12,
        dt.minute(),
        dt.second(),
        meridiem
    )
}

/// Display label for a raw stored timestamp; unparseable values are shown as stored
pub fn time_label(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => format_timestamp(&dt),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-03-15T15:04:05.123Z").unwrap();
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.day(), 15);
    }

    #[test]
    fn test_parse_keeps_offset_instant() {
        let a = parse_timestamp("2024-03-15T12:00:00+02:00").unwrap();
        let b = parse_timestamp("2024-03-15T10:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert!(parse_timestamp("2024-03-15T15:04:05").is_some());
        assert!(parse_timestamp("2024-03-15 15:04:05.5").is_some());
        let midnight = parse_timestamp("2024-03-15").unwrap();
        assert_eq!(midnight.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_format_afternoon() {
        let dt = parse_timestamp("2024-03-15T15:04:05Z").unwrap();
        assert_eq!(format_timestamp(&dt), "15th of March 2024 (3:04:05 PM)");
    }

    #[test]
    fn test_format_midnight_and_noon() {
        let midnight = parse_timestamp("2023-01-01T00:00:09Z").unwrap();
        assert_eq!(format_timestamp(&midnight), "1st of January 2023 (12:00:09 AM)");

        let noon = parse_timestamp("2023-12-22T12:30:00Z").unwrap();
        assert_eq!(format_timestamp(&noon), "22nd of December 2023 (12:30:00 PM)");
    }

    #[test]
    fn test_time_label_falls_back_to_raw() {
        assert_eq!(time_label("not a date"), "not a date");
        assert_eq!(time_label("2024-06-03T09:05:00Z"), "3rd of June 2024 (9:05:00 AM)");
    }
}
