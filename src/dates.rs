//! Date parsing and formatting shared by the router and the client adapter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a date string in any accepted form. Offset-less values are taken as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM-DD`, the wire form of a due date.
pub fn format_day(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// ISO-8601 timestamp as stored in the database.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_accepted_forms() {
        let rfc = parse_datetime("2024-03-05T10:20:30+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let zulu = parse_datetime("2024-03-05T10:20:30.123Z").unwrap();
        assert_eq!(zulu.minute(), 20);

        let naive = parse_datetime("2024-03-05T10:20:30").unwrap();
        assert_eq!(naive.second(), 30);

        let spaced = parse_datetime("2024-03-05 10:20:30").unwrap();
        assert_eq!(spaced.hour(), 10);

        let local_input = parse_datetime("2024-03-05T10:20").unwrap();
        assert_eq!(local_input.minute(), 20);

        let day = parse_datetime("2023-12-31").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2023, 12, 31));
        assert_eq!(day.hour(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("invalid-date").is_none());
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("2023-02-30").is_none());
    }

    #[test]
    fn test_format_day() {
        let dt = parse_datetime("2024-07-09T23:59:00Z").unwrap();
        assert_eq!(format_day(&dt), "2024-07-09");
        assert_eq!(format_timestamp(&dt), "2024-07-09T23:59:00.000Z");
    }
}
