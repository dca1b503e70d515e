//! Calendar/clock grammar: dates, datetimes, and bare times of day.
//!
//! Accepted forms are tried in a fixed order, first match wins. A literal
//! with no date component is anchored at the time-only sentinel date (see
//! [`crate::value::time_only_date`]). If no fixed format matches, a hand
//! parser handles clock times with decimal seconds and reports out-of-range
//! fields by name instead of silently wrapping them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EngineError, Result};
use crate::value;

/// How a fixed format anchors its result.
#[derive(Clone, Copy)]
enum Anchor {
    /// Full date and time.
    DateTime,
    /// Date only; time defaults to midnight.
    DateOnly,
    /// Time only; date defaults to the sentinel marker.
    TimeOnly,
}

/// Fixed formats in match order: ISO and slash datetimes (24h, then 12h),
/// US datetimes, bare clock times, bare dates.
const FORMATS: &[(&str, Anchor)] = &[
    ("%Y-%m-%d %H:%M:%S%.f", Anchor::DateTime),
    ("%Y-%m-%d %H:%M:%S", Anchor::DateTime),
    ("%Y-%m-%d %H:%M", Anchor::DateTime),
    ("%Y-%m-%d %I:%M:%S %p", Anchor::DateTime),
    ("%Y-%m-%d %I:%M %p", Anchor::DateTime),
    ("%Y/%m/%d %H:%M:%S%.f", Anchor::DateTime),
    ("%Y/%m/%d %H:%M:%S", Anchor::DateTime),
    ("%Y/%m/%d %H:%M", Anchor::DateTime),
    ("%Y/%m/%d %I:%M:%S %p", Anchor::DateTime),
    ("%Y/%m/%d %I:%M %p", Anchor::DateTime),
    ("%m/%d/%Y %H:%M:%S", Anchor::DateTime),
    ("%m/%d/%Y %H:%M", Anchor::DateTime),
    ("%m/%d/%Y %I:%M %p", Anchor::DateTime),
    ("%H:%M:%S%.f", Anchor::TimeOnly),
    ("%H:%M:%S", Anchor::TimeOnly),
    ("%H:%M", Anchor::TimeOnly),
    ("%I:%M:%S %p", Anchor::TimeOnly),
    ("%I:%M %p", Anchor::TimeOnly),
    ("%Y-%m-%d", Anchor::DateOnly),
    ("%Y/%m/%d", Anchor::DateOnly),
    ("%m/%d/%Y", Anchor::DateOnly),
];

/// Parse an instant literal.
///
/// # Errors
///
/// Returns [`EngineError::Range`] when a clock field is out of bounds for
/// its mode, and [`EngineError::Syntax`] when nothing recognizes the text.
pub fn parse_instant(text: &str) -> Result<NaiveDateTime> {
    let normalized = normalize_meridiem(text.trim());

    for (format, anchor) in FORMATS {
        match anchor {
            Anchor::DateTime => {
                if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
                    return Ok(dt);
                }
            }
            Anchor::DateOnly => {
                if let Ok(date) = NaiveDate::parse_from_str(&normalized, format) {
                    return Ok(date.and_time(NaiveTime::MIN));
                }
            }
            Anchor::TimeOnly => {
                if let Ok(time) = NaiveTime::parse_from_str(&normalized, format) {
                    return Ok(value::time_only(time));
                }
            }
        }
    }

    parse_clock_fallback(&normalized, text.trim())
}

/// Expand shorthand meridiems: an `a` or `p` immediately before whitespace
/// or end-of-string becomes `am`/`pm` (`4:30p` → `4:30pm`).
fn normalize_meridiem(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 1);
    for (i, &ch) in chars.iter().enumerate() {
        out.push(ch);
        if matches!(ch, 'a' | 'A' | 'p' | 'P') && chars.get(i + 1).is_none_or(|c| c.is_whitespace())
        {
            out.push('m');
        }
    }
    out
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Hand parser for `H:MM[:SS[.frac]][am|pm]` clock times the fixed formats
/// rejected, with explicit bounds checks per field.
fn parse_clock_fallback(normalized: &str, original: &str) -> Result<NaiveDateTime> {
    let lowered = normalized.to_ascii_lowercase();
    let (body, meridiem) = if let Some(rest) = lowered.strip_suffix("pm") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else if let Some(rest) = lowered.strip_suffix("am") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else {
        (lowered.as_str(), None)
    };

    let syntax = || EngineError::Syntax(format!("cannot parse instant '{original}'"));

    let fields: Vec<&str> = body.split(':').collect();
    let (hour_text, minute_text, second_text) = match fields.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(syntax()),
    };

    if !is_digit_run(hour_text, 1, 2) || !is_digit_run(minute_text, 2, 2) {
        return Err(syntax());
    }
    let (second_whole, second_frac) = match second_text.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (second_text, None),
    };
    if !is_digit_run(second_whole, 1, 2) || second_frac.is_some_and(|f| !is_digit_run(f, 1, 9)) {
        return Err(syntax());
    }

    let hour: u32 = hour_text.parse().map_err(|_| syntax())?;
    let minute: u32 = minute_text.parse().map_err(|_| syntax())?;
    let second: f64 = second_text.parse().map_err(|_| syntax())?;

    if minute >= 60 {
        return Err(EngineError::Range(format!("minutes out of range: {minute}")));
    }
    if second >= 60.0 {
        return Err(EngineError::Range(format!("seconds out of range: {second}")));
    }

    let hour = match meridiem {
        Some(m) => {
            if !(1..=12).contains(&hour) {
                return Err(EngineError::Range(format!(
                    "hour out of range for 12-hour clock: {hour}"
                )));
            }
            match (hour, m) {
                (12, Meridiem::Am) => 0,
                (12, Meridiem::Pm) => 12,
                (h, Meridiem::Pm) => h + 12,
                (h, Meridiem::Am) => h,
            }
        }
        None => {
            if hour >= 24 {
                return Err(EngineError::Range(format!(
                    "hour out of range for 24-hour clock: {hour}"
                )));
            }
            hour
        }
    };

    let whole = second.floor();
    let micros = (((second - whole) * 1e6).round() as u32).min(999_999);
    let time = NaiveTime::from_hms_micro_opt(hour, minute, whole as u32, micros)
        .ok_or_else(syntax)?;
    Ok(value::time_only(time))
}

fn is_digit_run(text: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

// ── Operand classification ──────────────────────────────────────────────────

/// Whether this operand text is instant-shaped: it contains a clock pattern
/// (`H:MM`) or a date pattern (`YYYY-MM-DD`, `YYYY/MM/DD`, `M/D/YYYY`)
/// anywhere. Used by the evaluator to route operands between the instant
/// and duration grammars.
pub(crate) fn is_instant_like(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    (0..chars.len())
        .any(|i| clock_at(&chars, i) || iso_date_at(&chars, i) || us_date_at(&chars, i))
}

/// Length of a digit run of `min..=max` digits starting at `i`, if any.
fn digit_run(chars: &[char], i: usize, min: usize, max: usize) -> Option<usize> {
    let mut len = 0;
    while len < max && chars.get(i + len).is_some_and(|c| c.is_ascii_digit()) {
        len += 1;
    }
    (len >= min).then_some(len)
}

fn clock_at(chars: &[char], i: usize) -> bool {
    // \d{1,2}:\d{2}
    digit_run(chars, i, 1, 2)
        .filter(|&n| chars.get(i + n) == Some(&':'))
        .and_then(|n| digit_run(chars, i + n + 1, 2, 2))
        .is_some()
}

fn iso_date_at(chars: &[char], i: usize) -> bool {
    // \d{4}[-/]\d{2}[-/]\d{2}
    let sep = |c: Option<&char>| matches!(c, Some('-') | Some('/'));
    digit_run(chars, i, 4, 4).is_some()
        && sep(chars.get(i + 4))
        && digit_run(chars, i + 5, 2, 2).is_some()
        && sep(chars.get(i + 7))
        && digit_run(chars, i + 8, 2, 2).is_some()
}

fn us_date_at(chars: &[char], i: usize) -> bool {
    // \d{1,2}/\d{1,2}/\d{4}
    let Some(month) = digit_run(chars, i, 1, 2) else {
        return false;
    };
    if chars.get(i + month) != Some(&'/') {
        return false;
    }
    let Some(day) = digit_run(chars, i + month + 1, 1, 2) else {
        return false;
    };
    let rest = i + month + 1 + day;
    chars.get(rest) == Some(&'/') && digit_run(chars, rest + 1, 4, 4).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    // ── Fixed formats ───────────────────────────────────────────────────

    #[test]
    fn test_iso_datetime() {
        assert_eq!(
            parse_instant("2025-08-19 14:30:45").unwrap(),
            ymd_hms(2025, 8, 19, 14, 30, 45)
        );
    }

    #[test]
    fn test_iso_datetime_fractional_seconds() {
        let dt = parse_instant("2025-08-19 14:30:45.5").unwrap();
        assert_eq!(dt.time().nanosecond(), 500_000_000);
    }

    #[test]
    fn test_iso_datetime_minutes_only() {
        assert_eq!(
            parse_instant("2025-08-19 14:30").unwrap(),
            ymd_hms(2025, 8, 19, 14, 30, 0)
        );
    }

    #[test]
    fn test_slash_datetime() {
        assert_eq!(
            parse_instant("2025/08/19 16:51:00").unwrap(),
            ymd_hms(2025, 8, 19, 16, 51, 0)
        );
    }

    #[test]
    fn test_us_datetime_with_meridiem() {
        assert_eq!(
            parse_instant("08/19/2025 2:30 pm").unwrap(),
            ymd_hms(2025, 8, 19, 14, 30, 0)
        );
    }

    #[test]
    fn test_date_only_defaults_to_midnight() {
        assert_eq!(
            parse_instant("2025-12-25").unwrap(),
            ymd_hms(2025, 12, 25, 0, 0, 0)
        );
        assert_eq!(
            parse_instant("08/19/2025").unwrap(),
            ymd_hms(2025, 8, 19, 0, 0, 0)
        );
    }

    #[test]
    fn test_time_only_uses_sentinel_date() {
        let dt = parse_instant("14:30").unwrap();
        assert!(value::is_time_only(&dt));
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    // ── Meridiem handling ───────────────────────────────────────────────

    #[test]
    fn test_12am_is_hour_zero() {
        assert_eq!(parse_instant("12:00am").unwrap().time().hour(), 0);
    }

    #[test]
    fn test_12pm_stays_twelve() {
        assert_eq!(parse_instant("12:00pm").unwrap().time().hour(), 12);
    }

    #[test]
    fn test_pm_adds_twelve() {
        assert_eq!(parse_instant("2:30pm").unwrap().time().hour(), 14);
    }

    #[test]
    fn test_1am_stays_hour_one() {
        assert_eq!(parse_instant("1:00am").unwrap().time().hour(), 1);
    }

    #[test]
    fn test_shorthand_meridiem() {
        assert_eq!(parse_instant("4:30p").unwrap().time().hour(), 16);
        assert_eq!(parse_instant("9:15a").unwrap().time().hour(), 9);
    }

    // ── Fallback clock parser ───────────────────────────────────────────

    #[test]
    fn test_decimal_seconds_time_only() {
        let dt = parse_instant("2:56:30.25am").unwrap();
        assert!(value::is_time_only(&dt));
        assert_eq!(dt.time().hour(), 2);
        assert_eq!(dt.time().nanosecond(), 250_000_000);
    }

    #[test]
    fn test_minutes_out_of_range() {
        let err = parse_instant("14:75").unwrap_err();
        assert!(err.to_string().contains("minutes out of range"), "got: {err}");
    }

    #[test]
    fn test_seconds_out_of_range() {
        let err = parse_instant("14:30:75").unwrap_err();
        assert!(err.to_string().contains("seconds out of range"), "got: {err}");
    }

    #[test]
    fn test_hour_out_of_range_24h() {
        let err = parse_instant("25:00").unwrap_err();
        assert!(err.to_string().contains("24-hour"), "got: {err}");
    }

    #[test]
    fn test_hour_out_of_range_with_meridiem() {
        let err = parse_instant("13:00pm").unwrap_err();
        assert!(err.to_string().contains("12-hour"), "got: {err}");
    }

    #[test]
    fn test_unparseable_is_syntax_error() {
        let err = parse_instant("not a time").unwrap_err();
        assert!(err.to_string().contains("Syntax error"), "got: {err}");
    }

    // ── Operand classification ──────────────────────────────────────────

    #[test]
    fn test_instant_like_shapes() {
        assert!(is_instant_like("14:30"));
        assert!(is_instant_like("2:56am"));
        assert!(is_instant_like("2025-08-19"));
        assert!(is_instant_like("2025/08/19 14:30"));
        assert!(is_instant_like("8/19/2025"));
    }

    #[test]
    fn test_duration_shapes_are_not_instant_like() {
        assert!(!is_instant_like("1h15s"));
        assert!(!is_instant_like("2d30m45s"));
        assert!(!is_instant_like("3.5"));
    }
}
