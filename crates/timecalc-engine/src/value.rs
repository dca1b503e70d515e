//! The typed value model shared by every grammar and the evaluator.
//!
//! All values are immutable and live only for the span of a single
//! `evaluate` call. Durations are a flat seconds count (`f64`) rather than
//! a calendar-aware span: months and years are folded into fixed-length
//! approximations at parse time and never reinterpreted.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::error::{EngineError, Result};

/// The result of evaluating one expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// A point in time. A time-only literal is anchored at the sentinel
    /// date (see [`time_only_date`]) and means "duration since midnight"
    /// in arithmetic, not an absolute moment in history.
    Instant(NaiveDateTime),
    /// A signed span of time, in seconds.
    Duration(f64),
    /// A dimensionless multiplier.
    Scalar(f64),
    /// A byte count. Internal grammar output only — never produced as a
    /// whole-expression result.
    Bytes(f64),
    /// A derived transfer-rate bundle.
    Rate(RateResult),
}

impl Value {
    /// Human-readable kind name for type-error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Instant(_) => "instant",
            Value::Duration(_) => "duration",
            Value::Scalar(_) => "number",
            Value::Bytes(_) => "byte quantity",
            Value::Rate(_) => "rate result",
        }
    }
}

/// The output of a rate calculation (`elapsed @ transferred -> target`).
///
/// Carries the three inputs alongside the derived figures so a formatter can
/// show progress and remaining work without recomputing anything upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateResult {
    /// Time to move the full target at the measured rate, in seconds.
    pub total_seconds: f64,
    /// Measured transfer rate, in bytes per second.
    pub bytes_per_second: f64,
    /// Elapsed time the measurement covers, in seconds.
    pub elapsed_seconds: f64,
    /// Bytes moved so far.
    pub transferred_bytes: f64,
    /// Full transfer size, in bytes.
    pub target_bytes: f64,
}

// ── Time-only sentinel ──────────────────────────────────────────────────────

/// The reserved date marking an instant as "time-of-day only".
pub fn time_only_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("sentinel date is valid")
}

/// Anchor a bare time-of-day at the sentinel date.
pub fn time_only(time: NaiveTime) -> NaiveDateTime {
    time_only_date().and_time(time)
}

/// Whether this instant came from a time-only literal.
pub fn is_time_only(instant: &NaiveDateTime) -> bool {
    instant.date() == time_only_date()
}

/// Seconds since midnight for an instant's clock component, including the
/// fractional part.
pub fn seconds_since_midnight(instant: &NaiveDateTime) -> f64 {
    let time = instant.time();
    f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9
}

/// Shift an instant by a signed seconds count, at microsecond resolution.
///
/// # Errors
///
/// Returns [`EngineError::Range`] if the shift is not finite or the result
/// falls outside chrono's representable range.
pub fn shift(instant: NaiveDateTime, seconds: f64) -> Result<NaiveDateTime> {
    let micros = (seconds * 1e6).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(EngineError::Range(format!(
            "cannot shift an instant by {seconds} seconds"
        )));
    }
    instant
        .checked_add_signed(chrono::Duration::microseconds(micros as i64))
        .ok_or_else(|| EngineError::Range("instant arithmetic out of range".to_string()))
}

/// Total seconds in a chrono span, including the sub-second part.
pub fn span_seconds(span: chrono::Duration) -> f64 {
    span.num_seconds() as f64 + f64::from(span.subsec_nanos()) / 1e9
}
