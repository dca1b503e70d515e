//! Transfer-rate calculation: `<elapsed> @ <transferred> -> <target>`.
//!
//! From a measured elapsed time and the bytes moved in it, derives the rate
//! and the total time the full target needs. The three inputs ride along in
//! the result so a formatter can show progress and remaining work without
//! any engine state.

use crate::bytes;
use crate::duration;
use crate::error::{EngineError, Result};
use crate::value::RateResult;

/// Compute a [`RateResult`] from the three operand strings of the rate
/// pattern.
///
/// # Errors
///
/// Returns the grammars' errors for unparseable operands, and
/// [`EngineError::Range`] when the elapsed time or either byte quantity is
/// not strictly positive.
pub fn calculate(elapsed: &str, transferred: &str, target: &str) -> Result<RateResult> {
    let elapsed_seconds = duration::parse_duration(elapsed)?;
    let transferred_bytes = bytes::parse_bytes(transferred)?;
    let target_bytes = bytes::parse_bytes(target)?;

    if elapsed_seconds <= 0.0 {
        return Err(EngineError::Range(
            "elapsed time must be positive".to_string(),
        ));
    }
    if transferred_bytes <= 0.0 {
        return Err(EngineError::Range(
            "transferred amount must be positive".to_string(),
        ));
    }
    if target_bytes <= 0.0 {
        return Err(EngineError::Range(
            "target amount must be positive".to_string(),
        ));
    }

    let bytes_per_second = transferred_bytes / elapsed_seconds;
    let total_seconds = target_bytes / bytes_per_second;

    Ok(RateResult {
        total_seconds,
        bytes_per_second,
        elapsed_seconds,
        transferred_bytes,
        target_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_and_total_time() {
        // 1.5 GB in 2h30m (9000 s) → ~166667 B/s; 10 GB needs 60000 s.
        let result = calculate("2h30m", "1.5GB", "10GB").unwrap();
        assert!((result.bytes_per_second - 1_500_000_000.0 / 9_000.0).abs() < 1e-6);
        assert!((result.total_seconds - 60_000.0).abs() < 1e-6);
        assert_eq!(result.elapsed_seconds, 9_000.0);
        assert_eq!(result.transferred_bytes, 1_500_000_000.0);
        assert_eq!(result.target_bytes, 1e10);
    }

    #[test]
    fn test_binary_units() {
        let result = calculate("1h", "512MiB", "1GiB").unwrap();
        assert!((result.total_seconds - 7_200.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_elapsed_rejected() {
        let err = calculate("0s", "1GB", "2GB").unwrap_err();
        assert!(err.to_string().contains("elapsed time"), "got: {err}");
    }

    #[test]
    fn test_zero_byte_quantities_rejected() {
        assert!(calculate("1h", "0B", "2GB").is_err());
        assert!(calculate("1h", "1GB", "0B").is_err());
    }

    #[test]
    fn test_unparseable_operands_surface_grammar_errors() {
        assert!(calculate("soon", "1GB", "2GB").is_err());
        assert!(calculate("1h", "one gig", "2GB").is_err());
        assert!(calculate("1h", "1GB", "10XB").is_err());
    }
}
