//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a front-matter date string in the formats blog posts use.
///
/// Values carrying an offset are normalized to UTC; naive values are taken
/// as-is, so all results compare on the same clock.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S %z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }

    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format used for `date:` in generated front matter
pub fn front_matter_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Short card date, like "Jun 1, 2024". Unparseable input is shown verbatim.
pub fn short_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Long dashboard date, like "June 1, 2024"
pub fn long_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_date("2024-06-01").unwrap();
        assert_eq!(front_matter_date(&dt), "2024-06-01T00:00:00");
    }

    #[test]
    fn test_parse_iso_without_offset() {
        let dt = parse_date("2024-01-15T10:30:00").unwrap();
        assert_eq!(front_matter_date(&dt), "2024-01-15T10:30:00");
    }

    #[test]
    fn test_offset_normalized_to_utc() {
        let dt = parse_date("2024-01-15T10:30:00+07:00").unwrap();
        assert_eq!(front_matter_date(&dt), "2024-01-15T03:30:00");
        let dt = parse_date("2024-01-15T10:30:00.123Z").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn test_unparseable() {
        assert!(parse_date("").is_none());
        assert!(parse_date("next tuesday").is_none());
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(short_date("2024-06-01T09:00:00"), "Jun 1, 2024");
        assert_eq!(long_date("2024-06-01"), "June 1, 2024");
        assert_eq!(long_date("someday"), "someday");
    }
}
