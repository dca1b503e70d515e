//! Expression evaluation: pipeline orchestration and typed arithmetic.
//!
//! `evaluate` samples the wall clock exactly once and hands the anchor to
//! [`evaluate_at`], which is fully deterministic: raw text → sugar rewriting
//! → rate-pattern dispatch → tokenization → a pairwise left-to-right walk
//! over (operator, operand) pairs with no precedence climbing. Operands are
//! parsed lazily — each token goes through the number-or-instant-or-duration
//! heuristic only when the walk reaches it.

use chrono::{Local, NaiveDateTime};

use crate::duration;
use crate::error::{EngineError, Result};
use crate::instant;
use crate::progress;
use crate::rate;
use crate::rewrite;
use crate::tokenize;
use crate::value::{self, Value};

/// Evaluate an expression against the current wall clock.
///
/// The clock is read once; every `now` in the expression and any ETA
/// computation see the identical instant.
///
/// # Errors
///
/// See [`EngineError`] for the failure classification. Evaluation yields
/// exactly one value or exactly one error, never a partial result.
pub fn evaluate(expression: &str) -> Result<Value> {
    evaluate_at(expression, Local::now().naive_local())
}

/// Evaluate an expression against an explicit "now" anchor.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use timecalc_engine::{evaluate_at, Value};
///
/// let now = NaiveDate::from_ymd_opt(2025, 6, 1)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
/// let value = evaluate_at("3d + now", now).unwrap();
/// assert!(matches!(value, Value::Instant(dt) if dt.to_string().starts_with("2025-06-04")));
/// ```
pub fn evaluate_at(expression: &str, now: NaiveDateTime) -> Result<Value> {
    let cleaned = expression.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(EngineError::Syntax("empty expression".to_string()));
    }

    let substituted = rewrite::substitute_now(cleaned, now);

    // The rate pattern wins over every other reading of the expression.
    if let Some((elapsed, transferred, target)) = rewrite::split_rate_pattern(&substituted) {
        return rate::calculate(elapsed, transferred, target).map(Value::Rate);
    }

    let rewritten = rewrite::rewrite_progress_sugar(&substituted);
    if progress::is_progress_call(&rewritten) {
        return progress::calculate(&rewritten, now);
    }

    let tokens = tokenize::tokenize(&rewritten);
    if tokens.len() < 3 {
        if let [single] = tokens.as_slice() {
            if progress::is_progress_call(single) {
                return progress::calculate(single, now);
            }
        }
        return Err(EngineError::Syntax(
            "expression must contain at least one operator".to_string(),
        ));
    }

    evaluate_tokens(&tokens)
}

/// Walk the token sequence pairwise, left to right.
fn evaluate_tokens(tokens: &[String]) -> Result<Value> {
    // Odd length means strict operand/operator alternation can hold; an even
    // count is a dangling operator or a missing operand.
    if tokens.len() % 2 == 0 {
        return Err(EngineError::Syntax(
            "expression ends with an operator".to_string(),
        ));
    }

    // Seed: a leading bare number about to be multiplied stays a scalar;
    // anything else goes through the operand grammars.
    let mut result = if parse_number(&tokens[0]).is_some() && tokens[1] == "*" {
        Value::Scalar(parse_number(&tokens[0]).unwrap_or_default())
    } else {
        parse_operand(&tokens[0])?
    };

    for pair in tokens[1..].chunks(2) {
        let [operator, operand_text] = pair else {
            unreachable!("odd token count was validated above");
        };
        let operand = parse_operand(operand_text)?;
        result = match operator.as_str() {
            "+" => add(result, operand)?,
            "-" => subtract(result, operand)?,
            "*" => multiply(result, operand)?,
            other => {
                return Err(EngineError::Syntax(format!(
                    "expected an operator, found '{other}'"
                )))
            }
        };
    }
    Ok(result)
}

/// Number-or-instant-or-duration heuristic for a single operand token.
///
/// A token is a scalar if and only if the entire token parses as a bare
/// number; instant-shaped tokens go to the instant grammar so its range
/// errors surface, everything else is read as a duration.
fn parse_operand(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if let Some(number) = parse_number(trimmed) {
        return Ok(Value::Scalar(number));
    }
    if instant::is_instant_like(trimmed) {
        instant::parse_instant(trimmed).map(Value::Instant)
    } else {
        duration::parse_duration(trimmed).map(Value::Duration)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

// ── Typed arithmetic ────────────────────────────────────────────────────────

fn add(a: Value, b: Value) -> Result<Value> {
    match (a, b) {
        (Value::Instant(i), Value::Duration(d)) | (Value::Duration(d), Value::Instant(i)) => {
            value::shift(i, d).map(Value::Instant)
        }
        (Value::Duration(x), Value::Duration(y)) => Ok(Value::Duration(x + y)),
        (Value::Instant(x), Value::Instant(y)) => add_instants(x, y),
        (a, b) => Err(EngineError::Type(format!(
            "cannot add {} and {}",
            a.kind(),
            b.kind()
        ))),
    }
}

/// Instant + instant is only meaningful through the time-only sentinel: a
/// time-only side contributes its duration since midnight; with two full
/// datetimes the right side contributes its offset from the sentinel epoch.
fn add_instants(x: NaiveDateTime, y: NaiveDateTime) -> Result<Value> {
    if value::is_time_only(&y) {
        value::shift(x, value::seconds_since_midnight(&y)).map(Value::Instant)
    } else if value::is_time_only(&x) {
        value::shift(y, value::seconds_since_midnight(&x)).map(Value::Instant)
    } else {
        let epoch = value::time_only_date().and_time(chrono::NaiveTime::MIN);
        let offset = value::span_seconds(y.signed_duration_since(epoch));
        value::shift(x, offset).map(Value::Instant)
    }
}

fn subtract(a: Value, b: Value) -> Result<Value> {
    match (a, b) {
        (Value::Instant(x), Value::Instant(y)) => Ok(Value::Duration(value::span_seconds(
            x.signed_duration_since(y),
        ))),
        (Value::Instant(x), Value::Duration(d)) => value::shift(x, -d).map(Value::Instant),
        (Value::Duration(x), Value::Duration(y)) => Ok(Value::Duration(x - y)),
        (a, b) => Err(EngineError::Type(format!(
            "cannot subtract {} from {}",
            b.kind(),
            a.kind()
        ))),
    }
}

fn multiply(a: Value, b: Value) -> Result<Value> {
    match (a, b) {
        (Value::Scalar(k), Value::Duration(d)) | (Value::Duration(d), Value::Scalar(k)) => {
            Ok(Value::Duration(k * d))
        }
        (a, b) => Err(EngineError::Type(format!(
            "can only multiply a number and a duration, not {} and {}",
            a.kind(),
            b.kind()
        ))),
    }
}
