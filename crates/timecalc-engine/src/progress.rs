//! Progress estimation: `progress(<duration>, <percent>%[, <mode>])`.
//!
//! Given an elapsed duration and how far along the work is, derives the
//! total duration, the remaining duration, or the completion instant. The
//! completion instant ("eta") is computed against the anchor passed in by
//! the caller — this module never reads the clock.

use chrono::NaiveDateTime;

use crate::duration;
use crate::error::{EngineError, Result};
use crate::value::{self, Value};

/// How the derived figure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Total duration the work will take.
    #[default]
    Total,
    /// Duration still to go.
    Remaining,
    /// Completion instant: anchor + remaining.
    Eta,
}

impl std::str::FromStr for ProgressMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Ok(ProgressMode::Total),
            "remaining" => Ok(ProgressMode::Remaining),
            "eta" => Ok(ProgressMode::Eta),
            other => Err(EngineError::Syntax(format!(
                "invalid progress mode '{other}' (expected total, remaining, or eta)"
            ))),
        }
    }
}

/// Whether the whole text is one `progress(...)` call.
pub fn is_progress_call(text: &str) -> bool {
    let trimmed = text.trim();
    let Some(rest) = strip_prefix_ignore_case(trimmed, "progress") else {
        return false;
    };
    let rest = rest.trim_start();
    let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) else {
        return false;
    };
    !inner.trim().is_empty() && !inner.contains(')')
}

/// Evaluate a `progress(...)` call against the given "now" anchor.
///
/// # Errors
///
/// Returns [`EngineError::Syntax`] for a malformed call or unknown mode,
/// [`EngineError::Range`] for a percentage outside (0, 100), and whatever
/// the duration grammar reports for the elapsed argument.
pub fn calculate(text: &str, now: NaiveDateTime) -> Result<Value> {
    let (elapsed_text, percent, mode) = parse_call(text)?;

    if !(percent > 0.0 && percent < 100.0) {
        return Err(EngineError::Range(format!(
            "percentage must be between 0 and 100, got {percent}"
        )));
    }

    let elapsed = duration::parse_duration(elapsed_text)?;
    let total = elapsed / (percent / 100.0);
    let remaining = total - elapsed;

    match mode {
        ProgressMode::Total => Ok(Value::Duration(total)),
        ProgressMode::Remaining => Ok(Value::Duration(remaining)),
        ProgressMode::Eta => value::shift(now, remaining).map(Value::Instant),
    }
}

/// Pull apart `progress(<duration>, <percent>%[, <mode>])`.
fn parse_call(text: &str) -> Result<(&str, f64, ProgressMode)> {
    let syntax = || EngineError::Syntax(format!("invalid progress syntax: '{}'", text.trim()));

    let trimmed = text.trim();
    let inner = strip_prefix_ignore_case(trimmed, "progress")
        .map(str::trim_start)
        .and_then(|r| r.strip_prefix('('))
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(syntax)?;

    let args: Vec<&str> = inner.split(',').map(str::trim).collect();
    let (elapsed_text, percent_text, mode_text) = match args.as_slice() {
        [elapsed, percent] => (*elapsed, *percent, None),
        [elapsed, percent, mode] => (*elapsed, *percent, Some(*mode)),
        _ => return Err(syntax()),
    };

    let percent: f64 = percent_text
        .strip_suffix('%')
        .ok_or_else(syntax)?
        .trim()
        .parse()
        .map_err(|_| syntax())?;
    let mode = mode_text.map_or(Ok(ProgressMode::default()), str::parse)?;

    Ok((elapsed_text, percent, mode))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn duration_of(value: Value) -> f64 {
        match value {
            Value::Duration(secs) => secs,
            other => panic!("expected duration, got {other:?}"),
        }
    }

    #[test]
    fn test_is_progress_call() {
        assert!(is_progress_call("progress(1h15s, 15%)"));
        assert!(is_progress_call("  PROGRESS ( 2h30m, 35%, remaining ) "));
        assert!(!is_progress_call("progress()"));
        assert!(!is_progress_call("progress(1h) + 2h"));
        assert!(!is_progress_call("1h + 2h"));
    }

    #[test]
    fn test_total_mode_is_default() {
        // 1h15s elapsed at 15% done: 3615 / 0.15 = 24100 seconds total.
        let total = duration_of(calculate("progress(1h15s, 15%)", anchor()).unwrap());
        assert!((total - 24_100.0).abs() < 1e-6);
    }

    #[test]
    fn test_remaining_mode() {
        let remaining =
            duration_of(calculate("progress(1h, 25%, remaining)", anchor()).unwrap());
        assert!((remaining - 10_800.0).abs() < 1e-6);
    }

    #[test]
    fn test_eta_mode_is_anchor_plus_remaining() {
        // 1h at 50% done: 1h remaining from the anchor.
        let value = calculate("progress(1h, 50%, eta)", anchor()).unwrap();
        match value {
            Value::Instant(dt) => assert_eq!(
                dt,
                NaiveDate::from_ymd_opt(2025, 6, 1)
                    .unwrap()
                    .and_hms_opt(13, 0, 0)
                    .unwrap()
            ),
            other => panic!("expected instant, got {other:?}"),
        }
    }

    #[test]
    fn test_mode_is_case_insensitive() {
        let remaining =
            duration_of(calculate("progress(1h, 25%, REMAINING)", anchor()).unwrap());
        assert!((remaining - 10_800.0).abs() < 1e-6);
    }

    #[test]
    fn test_percent_bounds() {
        assert!(calculate("progress(1h, 0%)", anchor()).is_err());
        assert!(calculate("progress(1h, 100%)", anchor()).is_err());
        assert!(calculate("progress(1h, 120%)", anchor()).is_err());
    }

    #[test]
    fn test_invalid_mode() {
        let err = calculate("progress(1h, 50%, soon)", anchor()).unwrap_err();
        assert!(err.to_string().contains("invalid progress mode"), "got: {err}");
    }

    #[test]
    fn test_missing_percent_sign() {
        let err = calculate("progress(1h, 50)", anchor()).unwrap_err();
        assert!(err.to_string().contains("invalid progress syntax"), "got: {err}");
    }
}
