//! Lenient timestamp parsing for pack and PO header dates

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M %z",
];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a timestamp as written by the record store or a PO header.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` with or without a numeric
/// offset, and plain dates. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2020-01-15 10:30:00", Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap())]
    #[case("2020-01-15 10:30+0000", Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap())]
    #[case("2020-01-15 10:30+0200", Utc.with_ymd_and_hms(2020, 1, 15, 8, 30, 0).unwrap())]
    #[case("2020-01-15 10:30:15 -0100", Utc.with_ymd_and_hms(2020, 1, 15, 11, 30, 15).unwrap())]
    #[case("2020-01-15T10:30:00Z", Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap())]
    #[case("2020-01-15", Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap())]
    #[case("  2020-01-15  ", Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap())]
    fn parse_timestamp_accepts_known_formats(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_timestamp(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("YEAR-MO-DA HO:MI+ZONE")]
    #[case("2020-13-45")]
    #[case("yesterday")]
    fn parse_timestamp_rejects_garbage(#[case] input: &str) {
        assert_eq!(parse_timestamp(input), None);
    }
}
