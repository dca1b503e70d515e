//! Labeled display rows for evaluation results.
//!
//! A thin, pure presentation layer: every row is derived from the value
//! alone, so front ends can render the list verbatim. Time-only instants
//! never show their sentinel date.

use chrono::NaiveDateTime;

use crate::bytes;
use crate::value::{self, RateResult, Value};

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Render a value as an ordered list of `(label, text)` rows.
pub fn format_value(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Instant(dt) => format_instant(dt),
        Value::Duration(secs) => format_duration(*secs),
        Value::Scalar(n) => vec![("Value".to_string(), n.to_string())],
        Value::Bytes(b) => vec![
            ("Amount".to_string(), bytes::format_bytes(*b)),
            ("Bytes".to_string(), format!("{b:.0}")),
        ],
        Value::Rate(rate) => format_rate_result(rate),
    }
}

fn format_instant(dt: &NaiveDateTime) -> Vec<(String, String)> {
    if value::is_time_only(dt) {
        return vec![
            ("Time".to_string(), dt.format("%H:%M:%S%.3f").to_string()),
            ("12-Hour".to_string(), dt.format("%I:%M:%S %p").to_string()),
        ];
    }
    vec![
        (
            "Standard".to_string(),
            dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        ),
        (
            "ISO 8601".to_string(),
            dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        ),
        (
            "12-Hour".to_string(),
            dt.format("%Y-%m-%d %I:%M:%S %p").to_string(),
        ),
        (
            "US Format".to_string(),
            dt.format("%m/%d/%Y %I:%M:%S %p").to_string(),
        ),
        ("Date Only".to_string(), dt.format("%Y-%m-%d").to_string()),
        (
            "Time Only".to_string(),
            dt.format("%H:%M:%S%.3f").to_string(),
        ),
        (
            "Weekday".to_string(),
            dt.format("%A, %B %d, %Y").to_string(),
        ),
        // The engine is timezone-free; the Unix timestamp reads the naive
        // instant as UTC.
        (
            "Unix Time".to_string(),
            dt.and_utc().timestamp().to_string(),
        ),
    ]
}

fn format_duration(total_seconds: f64) -> Vec<(String, String)> {
    vec![
        ("Duration".to_string(), format_compound(total_seconds)),
        ("Friendly".to_string(), format_friendly(total_seconds)),
        (
            "Total Seconds".to_string(),
            format!("{total_seconds:.3}"),
        ),
        (
            "Total Minutes".to_string(),
            format!("{:.3}", total_seconds / SECONDS_PER_MINUTE),
        ),
        (
            "Total Hours".to_string(),
            format!("{:.3}", total_seconds / SECONDS_PER_HOUR),
        ),
        (
            "Total Days".to_string(),
            format!("{:.3}", total_seconds / SECONDS_PER_DAY),
        ),
    ]
}

fn format_rate_result(rate: &RateResult) -> Vec<(String, String)> {
    let progress_pct = rate.transferred_bytes / rate.target_bytes * 100.0;
    let remaining_bytes = rate.target_bytes - rate.transferred_bytes;
    let remaining_seconds = rate.total_seconds - rate.elapsed_seconds;

    vec![
        ("Total Time".to_string(), format_friendly(rate.total_seconds)),
        (
            "Transfer Rate".to_string(),
            bytes::format_rate(rate.bytes_per_second),
        ),
        (
            "Elapsed".to_string(),
            format_friendly(rate.elapsed_seconds),
        ),
        (
            "Transferred".to_string(),
            bytes::format_bytes(rate.transferred_bytes),
        ),
        (
            "Target".to_string(),
            bytes::format_bytes(rate.target_bytes),
        ),
        (
            "Progress".to_string(),
            format!("{progress_pct:.1}% complete"),
        ),
        (
            "Remaining".to_string(),
            format!(
                "{} ({:.1}%)",
                bytes::format_bytes(remaining_bytes),
                100.0 - progress_pct
            ),
        ),
        (
            "Time Remaining".to_string(),
            format_friendly(remaining_seconds),
        ),
    ]
}

/// Signed compound form: `-1d 2h 3m 4.500s`.
pub fn format_compound(total_seconds: f64) -> String {
    let sign = if total_seconds < 0.0 { "-" } else { "" };
    let abs = total_seconds.abs();
    let days = (abs / SECONDS_PER_DAY).floor();
    let hours = ((abs % SECONDS_PER_DAY) / SECONDS_PER_HOUR).floor();
    let minutes = ((abs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE).floor();
    let seconds = abs % SECONDS_PER_MINUTE;
    format!("{sign}{days:.0}d {hours:.0}h {minutes:.0}m {seconds:.3}s")
}

/// Friendly English form: `2 hours and 30 minutes`.
pub fn format_friendly(total_seconds: f64) -> String {
    let abs = total_seconds.abs();
    let days = (abs / SECONDS_PER_DAY).floor() as u64;
    let hours = ((abs % SECONDS_PER_DAY) / SECONDS_PER_HOUR).floor() as u64;
    let minutes = ((abs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE).floor() as u64;
    let seconds = abs % SECONDS_PER_MINUTE;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} day{}", days, plural(days)));
    }
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, plural(hours)));
    }
    if minutes > 0 {
        parts.push(format!("{} minute{}", minutes, plural(minutes)));
    }
    if seconds > 0.0 || parts.is_empty() {
        if seconds.fract() == 0.0 {
            let whole = seconds as u64;
            parts.push(format!("{} second{}", whole, plural(whole)));
        } else {
            parts.push(format!("{seconds:.1} seconds"));
        }
    }

    match parts.len() {
        1 => parts.remove(0),
        2 => format!("{} and {}", parts[0], parts[1]),
        _ => {
            let last = parts.pop().unwrap_or_default();
            format!("{}, and {}", parts.join(", "), last)
        }
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows_labels(rows: &[(String, String)]) -> Vec<&str> {
        rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    fn row<'a>(rows: &'a [(String, String)], label: &str) -> &'a str {
        rows.iter()
            .find(|(l, _)| l == label)
            .map(|(_, text)| text.as_str())
            .unwrap_or_else(|| panic!("no row labeled '{label}'"))
    }

    #[test]
    fn test_full_instant_rows() {
        let dt = NaiveDate::from_ymd_opt(2025, 8, 19)
            .unwrap()
            .and_hms_opt(14, 30, 45)
            .unwrap();
        let rows = format_value(&Value::Instant(dt));
        assert_eq!(row(&rows, "Standard"), "2025-08-19 14:30:45.000");
        assert_eq!(row(&rows, "Date Only"), "2025-08-19");
        assert_eq!(row(&rows, "12-Hour"), "2025-08-19 02:30:45 PM");
        assert_eq!(row(&rows, "Weekday"), "Tuesday, August 19, 2025");
    }

    #[test]
    fn test_time_only_instant_hides_sentinel_date() {
        let dt = value::time_only(chrono::NaiveTime::from_hms_opt(6, 26, 0).unwrap());
        let rows = format_value(&Value::Instant(dt));
        assert_eq!(rows_labels(&rows), ["Time", "12-Hour"]);
        assert_eq!(row(&rows, "Time"), "06:26:00.000");
        assert!(!rows.iter().any(|(_, text)| text.contains("1900")));
    }

    #[test]
    fn test_duration_rows() {
        let rows = format_value(&Value::Duration(9_000.0));
        assert_eq!(row(&rows, "Duration"), "0d 2h 30m 0.000s");
        assert_eq!(row(&rows, "Friendly"), "2 hours and 30 minutes");
        assert_eq!(row(&rows, "Total Seconds"), "9000.000");
        assert_eq!(row(&rows, "Total Hours"), "2.500");
    }

    #[test]
    fn test_negative_duration_keeps_sign() {
        let rows = format_value(&Value::Duration(-3_600.0));
        assert_eq!(row(&rows, "Duration"), "-0d 1h 0m 0.000s");
        assert_eq!(row(&rows, "Total Seconds"), "-3600.000");
    }

    #[test]
    fn test_friendly_forms() {
        assert_eq!(format_friendly(0.0), "0 seconds");
        assert_eq!(format_friendly(1.0), "1 second");
        assert_eq!(format_friendly(90.0), "1 minute and 30 seconds");
        assert_eq!(
            format_friendly(90_061.0),
            "1 day, 1 hour, 1 minute, and 1 second"
        );
        assert_eq!(format_friendly(1.5), "1.5 seconds");
    }

    #[test]
    fn test_rate_rows_derive_progress() {
        let rate = RateResult {
            total_seconds: 60_000.0,
            bytes_per_second: 1_500_000_000.0 / 9_000.0,
            elapsed_seconds: 9_000.0,
            transferred_bytes: 1_500_000_000.0,
            target_bytes: 1e10,
        };
        let rows = format_value(&Value::Rate(rate));
        assert_eq!(row(&rows, "Transferred"), "1.50 GB");
        assert_eq!(row(&rows, "Target"), "10.0 GB");
        assert_eq!(row(&rows, "Progress"), "15.0% complete");
        assert_eq!(row(&rows, "Remaining"), "8.50 GB (85.0%)");
        assert_eq!(
            row(&rows, "Time Remaining"),
            "14 hours and 10 minutes"
        );
    }

    #[test]
    fn test_scalar_row() {
        let rows = format_value(&Value::Scalar(2.5));
        assert_eq!(rows, [("Value".to_string(), "2.5".to_string())]);
    }
}
