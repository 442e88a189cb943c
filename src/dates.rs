// ⏰ Message Date Extractor
// Send time comes from the RFC-2822-ish "Date" header; timezone is ignored.

use crate::mailbox::Header;
use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of the first 25 characters of a Date header after the
/// "<weekday>, " prefix, e.g. "13 Jan 2025 10:22:33"
pub const DATE_HEADER_FORMAT: &str = "%d %b %Y %H:%M:%S";

/// Only this many leading characters are parsed; the zone offset is dropped
pub const DATE_HEADER_PREFIX_CHARS: usize = 25;

/// Outcome of reading a message's send time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDate {
    /// Parsed send time (local wall clock of the sender, no zone)
    Sent(NaiveDateTime),

    /// Date header present but not in the expected layout; raw value kept
    Unparsed(String),

    /// No Date header at all
    Unknown,
}

impl MessageDate {
    /// Parsed timestamp, if any. Only these are usable for sorting.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            MessageDate::Sent(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, MessageDate::Sent(_))
    }
}

impl fmt::Display for MessageDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageDate::Sent(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            MessageDate::Unparsed(raw) => write!(f, "{}", raw),
            MessageDate::Unknown => write!(f, "Unknown Date"),
        }
    }
}

/// Parse a Date header value. Falls back to the raw value instead of failing.
///
/// The weekday must be a short English name but is not checked against the
/// date. With a single-digit day the 25-character prefix ends in the space
/// before the zone, so trailing whitespace is dropped before parsing.
pub fn parse_date_header(value: &str) -> MessageDate {
    let prefix: String = value.chars().take(DATE_HEADER_PREFIX_CHARS).collect();

    match parse_prefix(prefix.trim_end()) {
        Some(dt) => MessageDate::Sent(dt),
        None => MessageDate::Unparsed(value.to_string()),
    }
}

/// "Mon, 13 Jan 2025 10:22:33" → timestamp
fn parse_prefix(prefix: &str) -> Option<NaiveDateTime> {
    let (weekday, rest) = prefix.split_once(", ")?;
    if weekday.len() != 3 || weekday.parse::<Weekday>().is_err() {
        return None;
    }

    NaiveDateTime::parse_from_str(rest, DATE_HEADER_FORMAT).ok()
}

/// Extract the send time from a message's headers.
///
/// Only the first header named exactly "Date" is considered.
pub fn message_date(headers: &[Header]) -> MessageDate {
    match headers.iter().find(|h| h.name == "Date") {
        Some(header) => parse_date_header(&header.value),
        None => MessageDate::Unknown,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_standard_header() {
        let headers = vec![
            Header::new("From", "jobs@linkedin.com"),
            Header::new("Date", "Mon, 13 Jan 2025 10:22:33 +0000"),
        ];

        assert_eq!(message_date(&headers), MessageDate::Sent(at(2025, 1, 13, 10, 22, 33)));
    }

    #[test]
    fn test_timezone_is_ignored() {
        let utc = parse_date_header("Fri, 28 Feb 2025 23:59:59 +0000");
        let pst = parse_date_header("Fri, 28 Feb 2025 23:59:59 -0800 (PST)");

        assert_eq!(utc, pst);
        assert_eq!(utc.as_datetime(), Some(at(2025, 2, 28, 23, 59, 59)));
    }

    #[test]
    fn test_single_digit_day() {
        let parsed = parse_date_header("Fri, 7 Feb 2025 08:00:00 +0000");
        assert_eq!(parsed.as_datetime(), Some(at(2025, 2, 7, 8, 0, 0)));
    }

    #[test]
    fn test_weekday_mismatch_still_parses() {
        // 13 Jan 2025 is a Monday
        let parsed = parse_date_header("Tue, 13 Jan 2025 10:22:33 +0000");
        assert_eq!(parsed.as_datetime(), Some(at(2025, 1, 13, 10, 22, 33)));

        let control = parse_date_header("Mon, 03 Mar 2025 09:00:00 +0000");
        assert_eq!(control.as_datetime(), Some(at(2025, 3, 3, 9, 0, 0)));
    }

    #[test]
    fn test_weekday_must_be_short_name() {
        assert!(!parse_date_header("Xyz, 13 Jan 2025 10:22:33 +0000").is_parsed());
        assert!(!parse_date_header("Monday, 13 Jan 2025 10:22:33").is_parsed());
        assert!(!parse_date_header("13 Jan 2025 10:22:33 +0000").is_parsed());
    }

    #[test]
    fn test_unparseable_falls_back_to_raw() {
        let raw = "2025-01-13T10:22:33Z";
        let parsed = message_date(&[Header::new("Date", raw)]);

        assert_eq!(parsed, MessageDate::Unparsed(raw.to_string()));
        assert!(!parsed.is_parsed());
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn test_missing_header_is_unknown() {
        let parsed = message_date(&[Header::new("Subject", "Hello")]);

        assert_eq!(parsed, MessageDate::Unknown);
        assert_eq!(parsed.to_string(), "Unknown Date");
        assert_eq!(parsed.as_datetime(), None);
    }

    #[test]
    fn test_header_name_is_exact() {
        let parsed = message_date(&[Header::new("date", "Mon, 13 Jan 2025 10:22:33 +0000")]);
        assert_eq!(parsed, MessageDate::Unknown);
    }

    #[test]
    fn test_first_date_header_wins() {
        let headers = vec![
            Header::new("Date", "garbage"),
            Header::new("Date", "Mon, 13 Jan 2025 10:22:33 +0000"),
        ];

        assert_eq!(message_date(&headers), MessageDate::Unparsed("garbage".to_string()));
    }

    #[test]
    fn test_multibyte_value_does_not_panic() {
        let parsed = parse_date_header("月曜日, 13 一月 2025 10:22:33 +0900 ✉️");
        assert!(!parsed.is_parsed());
    }
}
