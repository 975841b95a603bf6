//! Timestamp parsing and formatting
//!
//! WooCommerce returns local wall-clock timestamps without an offset
//! (`2017-03-22T16:28:02`), while the configured start date and stored
//! bookmarks carry one. Both shapes are accepted here.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp into its wall-clock time and, when present, its offset
pub fn parse_wall_clock(s: &str) -> Option<(NaiveDateTime, Option<FixedOffset>)> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some((dt.naive_local(), Some(*dt.offset())));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some((dt.naive_local(), Some(*dt.offset())));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some((naive, None));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| (naive, None))
}

/// Parse a timestamp to an instant; values without an offset are taken as UTC
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let (naive, offset) = parse_wall_clock(s)?;
    let offset = offset.unwrap_or_else(|| Utc.fix());
    naive.and_local_timezone(offset).single()
}

/// Keep the wall-clock time of `s` and replace its offset with `tz`
///
/// This is a relabel, not a conversion: `10:00+02:00` restamped to UTC is
/// `10:00+00:00`.
pub fn restamp(s: &str, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let (naive, _) = parse_wall_clock(s)?;
    naive.and_local_timezone(tz).single()
}

/// Render a timestamp as ISO 8601 with a `+HH:MM` offset
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2020-01-01T00:00:00+02:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
        assert_eq!(format_timestamp(&dt), "2020-01-01T00:00:00+02:00");
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse_timestamp("2017-03-22T16:28:02").unwrap();
        assert_eq!(format_timestamp(&dt), "2017-03-22T16:28:02+00:00");
    }

    #[test]
    fn test_parse_zulu() {
        let dt = parse_timestamp("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(format_timestamp(&dt), "2020-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2020-06-15").unwrap();
        assert_eq!(format_timestamp(&dt), "2020-06-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_restamp_replaces_offset_without_converting() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let dt = restamp("2020-01-01T10:00:00+02:00", tz).unwrap();
        assert_eq!(format_timestamp(&dt), "2020-01-01T10:00:00+00:00");

        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let dt = restamp("2017-03-22T16:28:02", tz).unwrap();
        assert_eq!(format_timestamp(&dt), "2017-03-22T16:28:02-05:00");
    }

    #[test]
    fn test_format_keeps_fraction() {
        let dt = parse_timestamp("2020-01-01T00:00:00.250+00:00").unwrap();
        assert_eq!(format_timestamp(&dt), "2020-01-01T00:00:00.250+00:00");
    }
}
