//! Compound duration grammar: `1h15s`, `2d30m45s`, `3.5h`, `2h 30m`.
//!
//! A duration literal is one or more `(magnitude, unit)` components, summed
//! into a flat seconds count. Months and years use fixed-length
//! approximations (30.44 and 365.25 days) so the result stays a single
//! scalar — calendar-aware month arithmetic is deliberately out of scope.

use crate::error::{EngineError, Result};

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_WEEK: f64 = 604_800.0;
const SECONDS_PER_MONTH: f64 = 30.44 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;

/// Seconds per unit suffix, or `None` for an unrecognized suffix.
///
/// The scanner hands over the full letter run of each component, so `mo`
/// arrives whole and can never be misread as `m` followed by stray text.
fn unit_seconds(unit: &str) -> Option<f64> {
    match unit {
        "y" => Some(SECONDS_PER_YEAR),
        "mo" => Some(SECONDS_PER_MONTH),
        "w" => Some(SECONDS_PER_WEEK),
        "d" => Some(SECONDS_PER_DAY),
        "h" => Some(SECONDS_PER_HOUR),
        "m" => Some(SECONDS_PER_MINUTE),
        "s" => Some(1.0),
        _ => None,
    }
}

/// Parse a compound duration literal into total seconds.
///
/// Case-insensitive. Components may be concatenated (`1h15s`) or separated
/// by whitespace (`2h 30m`); magnitudes may be integers or decimals.
///
/// # Errors
///
/// Returns [`EngineError::Unit`] for an unrecognized suffix or a magnitude
/// with no suffix, and [`EngineError::Syntax`] when no component can be
/// read at all.
pub fn parse_duration(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let lowered = trimmed.to_ascii_lowercase();

    // Fast path: a lone "<number>h" decimal-hours literal.
    if let Some(magnitude) = lowered
        .strip_suffix('h')
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit() || b == b'.'))
        .and_then(|rest| rest.parse::<f64>().ok())
    {
        return Ok(magnitude * SECONDS_PER_HOUR);
    }

    let chars: Vec<char> = lowered.chars().collect();
    let mut total = 0.0_f64;
    let mut found_any = false;
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        // Magnitude: digits with an optional decimal part.
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i < chars.len() && chars[i] == '.' {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
        if i == start {
            return Err(EngineError::Syntax(format!(
                "cannot parse duration '{trimmed}'"
            )));
        }
        let magnitude: f64 = chars[start..i]
            .iter()
            .collect::<String>()
            .parse()
            .map_err(|_| EngineError::Syntax(format!("invalid number in duration '{trimmed}'")))?;

        // Unit: the full run of letters that follows.
        let unit_start = i;
        while i < chars.len() && chars[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i == unit_start {
            return Err(EngineError::Unit(format!(
                "missing unit after '{magnitude}' in duration '{trimmed}'"
            )));
        }
        let unit: String = chars[unit_start..i].iter().collect();
        let factor = unit_seconds(&unit)
            .ok_or_else(|| EngineError::Unit(format!("unknown duration unit '{unit}'")))?;

        total += magnitude * factor;
        found_any = true;
    }

    if !found_any {
        return Err(EngineError::Syntax(format!(
            "cannot parse duration '{trimmed}'"
        )));
    }
    Ok(total)
}
