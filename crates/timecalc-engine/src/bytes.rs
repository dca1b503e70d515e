//! Byte-quantity grammar and human-unit formatting.
//!
//! Parses data-size literals in decimal (1000-based: B/KB/MB/GB/TB/PB) and
//! binary (1024-based: KiB/MiB/GiB/TiB/PiB) families, and renders byte
//! counts and rates back to human units. Formatting defaults to the decimal
//! family.

use crate::error::{EngineError, Result};

/// Which unit family a formatter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitFamily {
    /// 1000-based units: KB, MB, GB, ...
    #[default]
    Decimal,
    /// 1024-based units: KiB, MiB, GiB, ...
    Binary,
}

/// Decimal units, largest first, for threshold-based formatting.
const DECIMAL_UNITS: &[(&str, f64)] = &[
    ("PB", 1e15),
    ("TB", 1e12),
    ("GB", 1e9),
    ("MB", 1e6),
    ("KB", 1e3),
    ("B", 1.0),
];

/// Binary units, largest first.
const BINARY_UNITS: &[(&str, f64)] = &[
    ("PiB", 1_125_899_906_842_624.0),
    ("TiB", 1_099_511_627_776.0),
    ("GiB", 1_073_741_824.0),
    ("MiB", 1_048_576.0),
    ("KiB", 1_024.0),
    ("B", 1.0),
];

/// Bytes per unit suffix, both families, case-insensitive.
fn unit_factor(unit: &str) -> Option<f64> {
    match unit.to_ascii_uppercase().as_str() {
        "B" => Some(1.0),
        "KB" => Some(1e3),
        "MB" => Some(1e6),
        "GB" => Some(1e9),
        "TB" => Some(1e12),
        "PB" => Some(1e15),
        "KIB" => Some(1_024.0),
        "MIB" => Some(1_048_576.0),
        "GIB" => Some(1_073_741_824.0),
        "TIB" => Some(1_099_511_627_776.0),
        "PIB" => Some(1_125_899_906_842_624.0),
        _ => None,
    }
}

/// Parse a data-size literal like `1.5GB` or `500 MiB` into a byte count.
///
/// The grammar accepts no sign, so the result is always non-negative.
///
/// # Errors
///
/// Returns [`EngineError::Unit`] for an unrecognized unit suffix and
/// [`EngineError::Syntax`] when the magnitude or the suffix is missing.
pub fn parse_bytes(text: &str) -> Result<f64> {
    let trimmed = text.trim();

    let digits_end = trimmed
        .bytes()
        .position(|b| !b.is_ascii_digit() && b != b'.')
        .unwrap_or(trimmed.len());
    if digits_end == 0 {
        return Err(EngineError::Syntax(format!(
            "cannot parse byte quantity '{trimmed}'"
        )));
    }

    let magnitude: f64 = trimmed[..digits_end].parse().map_err(|_| {
        EngineError::Syntax(format!("invalid number in byte quantity '{trimmed}'"))
    })?;

    let unit = trimmed[digits_end..].trim();
    if unit.is_empty() {
        return Err(EngineError::Syntax(format!(
            "byte quantity '{trimmed}' has no unit"
        )));
    }

    let factor = unit_factor(unit)
        .ok_or_else(|| EngineError::Unit(format!("unknown data unit '{unit}'")))?;
    Ok(magnitude * factor)
}

/// Format a byte count with decimal units (`1_500_000_000` → `"1.50 GB"`).
pub fn format_bytes(bytes: f64) -> String {
    format_bytes_with(bytes, UnitFamily::Decimal)
}

/// Format a byte count in the chosen unit family. Precision steps down as
/// the magnitude grows: two decimals below 10, one below 100, none above.
pub fn format_bytes_with(bytes: f64, family: UnitFamily) -> String {
    if bytes == 0.0 {
        return "0 B".to_string();
    }

    let table = match family {
        UnitFamily::Decimal => DECIMAL_UNITS,
        UnitFamily::Binary => BINARY_UNITS,
    };
    for (unit, factor) in table {
        if bytes >= *factor {
            let scaled = bytes / factor;
            return if scaled >= 100.0 {
                format!("{scaled:.0} {unit}")
            } else if scaled >= 10.0 {
                format!("{scaled:.1} {unit}")
            } else {
                format!("{scaled:.2} {unit}")
            };
        }
    }
    format!("{bytes} B")
}

/// Format a transfer rate (`"1.50 GB/s"`).
pub fn format_rate(bytes_per_second: f64) -> String {
    if bytes_per_second == 0.0 {
        return "0 B/s".to_string();
    }
    format!("{}/s", format_bytes(bytes_per_second))
}
