// Fixed wire pattern (CCYYMMDD'T'hh:mm:ss) and display rendering
//
// Pure functions over chrono format strings: no formatter objects are shared
// between payloads or threads.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use super::error::{DomainError, Result};

/// Wire pattern. `%I` is the 12-hour clock with no AM/PM marker, so afternoon
/// hours render as `01`..`11` and midnight/noon as `12`.
pub const UTC_PATTERN: &str = "%Y%m%dT%I:%M:%S";

/// Pattern used to read the wire value back. The hour field is taken as-is
/// and `12` is folded to `00`, i.e. every value is read as ante meridiem.
const UTC_PARSE_PATTERN: &str = "%Y%m%dT%H:%M:%S";

/// Default medium date-time style (`Jan 15, 2024 10:30:00 AM`)
pub const DISPLAY_PATTERN: &str = "%b %-d, %Y %-I:%M:%S %p";

/// Render a timestamp with the fixed wire pattern
pub fn format_utc(time: &NaiveDateTime) -> String {
    time.format(UTC_PATTERN).to_string()
}

/// Parse a timestamp written with the fixed wire pattern
pub fn parse_utc(input: &str) -> Result<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(input, UTC_PARSE_PATTERN).map_err(|source| {
        DomainError::InvalidTimeString {
            input: input.to_string(),
            source,
        }
    })?;

    if parsed.hour() == 12 {
        Ok(parsed - TimeDelta::hours(12))
    } else {
        Ok(parsed)
    }
}

/// Render a timestamp in the human-readable display style
pub fn format_display(time: &NaiveDateTime) -> String {
    time.format(DISPLAY_PATTERN).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_format_morning() {
        assert_eq!(format_utc(&at(8, 30, 0)), "20240115T08:30:00");
    }

    #[test]
    fn test_format_afternoon_uses_twelve_hour_clock() {
        assert_eq!(format_utc(&at(20, 30, 0)), "20240115T08:30:00");
        assert_eq!(format_utc(&at(13, 5, 9)), "20240115T01:05:09");
    }

    #[test]
    fn test_format_midnight_and_noon() {
        assert_eq!(format_utc(&at(0, 5, 0)), "20240115T12:05:00");
        assert_eq!(format_utc(&at(12, 5, 0)), "20240115T12:05:00");
    }

    #[test]
    fn test_parse_reads_ante_meridiem() {
        assert_eq!(parse_utc("20240115T08:30:00").unwrap(), at(8, 30, 0));
        assert_eq!(parse_utc("20240115T12:05:00").unwrap(), at(0, 5, 0));
    }

    #[test]
    fn test_parse_accepts_hours_past_twelve() {
        assert_eq!(parse_utc("20240115T17:45:10").unwrap(), at(17, 45, 10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_utc("not-a-date").unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeString { ref input, .. } if input == "not-a-date"));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_parse_rejects_iso_layout() {
        assert!(parse_utc("2024-01-15T08:30:00").is_err());
    }

    #[test]
    fn test_display_style() {
        assert_eq!(format_display(&at(10, 30, 0)), "Jan 15, 2024 10:30:00 AM");
        assert_eq!(format_display(&at(22, 30, 0)), "Jan 15, 2024 10:30:00 PM");
    }
}
