use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::Timestamp;

/// Numbers below this are Unix seconds, numbers at or above it are Unix milliseconds
pub const SECONDS_THRESHOLD: f64 = 10_000_000_000.0;

/// Largest magnitude a millisecond timestamp may have (±100,000,000 days)
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const NAIVE_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Normalize a record's raw `timestamp` value into an absolute time
///
/// Missing or `null` values take the current time. Never fails: an unusable value
/// yields [`Timestamp::Invalid`].
pub fn normalize_timestamp(value: Option<&Value>) -> Timestamp {
    normalize_timestamp_at(value, Utc::now())
}

/// [`normalize_timestamp`] with an explicit "current time"
pub fn normalize_timestamp_at(value: Option<&Value>, now: DateTime<Utc>) -> Timestamp {
    match value {
        None | Some(Value::Null) => Timestamp::Valid(now),
        Some(Value::Number(n)) => n.as_f64().map_or(Timestamp::Invalid, from_epoch_number),
        Some(Value::String(s)) => parse_date_string(s),
        Some(_) => Timestamp::Invalid,
    }
}

fn from_epoch_number(n: f64) -> Timestamp {
    if !n.is_finite() {
        return Timestamp::Invalid;
    }

    let millis = (if n < SECONDS_THRESHOLD { n * 1000.0 } else { n }).trunc();
    if millis.abs() > MAX_EPOCH_MILLIS {
        return Timestamp::Invalid;
    }

    DateTime::from_timestamp_millis(millis as i64).map_or(Timestamp::Invalid, Timestamp::Valid)
}

/// Parse RFC 3339 / ISO 8601, RFC 2822, offset-less date-times (UTC) and bare dates
/// (UTC midnight)
pub fn parse_date_string(raw: &str) -> Timestamp {
    let s = raw.trim();
    if s.is_empty() {
        return Timestamp::Invalid;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Timestamp::Valid(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Timestamp::Valid(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Timestamp::Valid(naive.and_utc());
        }
    }
    if let Some(midnight) =
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Timestamp::Valid(midnight.and_utc());
    }

    Timestamp::Invalid
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn millis(ts: Timestamp) -> i64 {
        ts.timestamp_millis().expect("timestamp should be valid")
    }

    #[test]
    fn test_seconds_and_millis_are_same_instant() {
        let seconds = normalize_timestamp(Some(&json!(1700000000)));
        let ms = normalize_timestamp(Some(&json!(1700000000000_i64)));
        assert_eq!(seconds, ms);
        assert_eq!(millis(seconds), 1_700_000_000_000);
    }

    #[test]
    fn test_threshold_boundary() {
        let below = normalize_timestamp(Some(&json!(9_999_999_999_i64)));
        assert_eq!(millis(below), 9_999_999_999_000);

        let at = normalize_timestamp(Some(&json!(10_000_000_000_i64)));
        assert_eq!(millis(at), 10_000_000_000);
    }

    #[test]
    fn test_fractional_seconds() {
        let ts = normalize_timestamp(Some(&json!(1700000000.5)));
        assert_eq!(millis(ts), 1_700_000_000_500);
    }

    #[test]
    fn test_missing_and_null_use_now() {
        assert_eq!(normalize_timestamp_at(None, fixed_now()), Timestamp::Valid(fixed_now()));
        assert_eq!(
            normalize_timestamp_at(Some(&Value::Null), fixed_now()),
            Timestamp::Valid(fixed_now())
        );
    }

    #[test]
    fn test_rfc3339_string() {
        let ts = normalize_timestamp(Some(&json!("2025-11-21T07:11:39.534Z")));
        let expected = Utc.with_ymd_and_hms(2025, 11, 21, 7, 11, 39).unwrap().timestamp_millis()
            + 534;
        assert_eq!(millis(ts), expected);
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let ts = normalize_timestamp(Some(&json!("2024-01-15T12:30:00+02:00")));
        assert_eq!(ts, Timestamp::Valid(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()));
    }

    #[test]
    fn test_rfc2822_string() {
        let ts = normalize_timestamp(Some(&json!("Mon, 15 Jan 2024 10:30:00 +0000")));
        assert_eq!(ts, Timestamp::Valid(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()));
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        let ts = normalize_timestamp(Some(&json!("2024-01-15T10:30:00")));
        assert_eq!(ts, Timestamp::Valid(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()));
    }

    #[test]
    fn test_date_only_is_utc_midnight() {
        let ts = normalize_timestamp(Some(&json!("2024-01-15")));
        assert_eq!(ts, Timestamp::Valid(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_malformed_strings_are_invalid() {
        for raw in ["not a date", "", "   ", "2024-13-45", "yesterday"] {
            assert_eq!(normalize_timestamp(Some(&json!(raw))), Timestamp::Invalid, "{raw}");
        }
    }

    #[test]
    fn test_unsupported_types_are_invalid() {
        assert_eq!(normalize_timestamp(Some(&json!(true))), Timestamp::Invalid);
        assert_eq!(normalize_timestamp(Some(&json!({"ms": 1}))), Timestamp::Invalid);
        assert_eq!(normalize_timestamp(Some(&json!([1]))), Timestamp::Invalid);
    }

    #[test]
    fn test_out_of_range_number_is_invalid() {
        assert_eq!(normalize_timestamp(Some(&json!(1e300))), Timestamp::Invalid);
    }

    #[test]
    fn test_negative_seconds_before_epoch() {
        let ts = normalize_timestamp(Some(&json!(-86400)));
        assert_eq!(millis(ts), -86_400_000);
    }
}
