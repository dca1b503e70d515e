//! Context-sensitive tokenizer.
//!
//! Splits a rewritten expression into alternating operand/operator tokens.
//! The work is deciding whether a `+`, `-`, or `*` character is an operator
//! or a literal character of the operand being accumulated: `-` is part of
//! `2025-08-19`, and plain concatenation keeps compound durations like
//! `1h15s` whole. An explicit scanner applies the rules below; nothing here
//! touches the clock or allocates beyond the token strings.

use crate::instant;
use crate::progress;

/// Split an expression into operand and operator tokens.
///
/// A whole-input `progress(...)` call is returned as a single opaque token;
/// parenthesized spans are never split. Minimum-token and alternation
/// validation happens in the evaluator, which also dispatches the lone
/// progress-call case.
pub fn tokenize(text: &str) -> Vec<String> {
    if progress::is_progress_call(text) {
        return vec![text.trim().to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0_i32;

    for (i, &ch) in chars.iter().enumerate() {
        match ch {
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                paren_depth -= 1;
                current.push(ch);
            }
            '+' | '-' | '*' if paren_depth == 0 => {
                let next_is_space = chars.get(i + 1).is_some_and(|c| c.is_whitespace());
                if is_operator(&current, ch, next_is_space) {
                    if !current.trim().is_empty() {
                        tokens.push(current.trim().to_string());
                    }
                    tokens.push(ch.to_string());
                    current.clear();
                } else {
                    current.push(ch);
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    tokens
}

/// Operator-vs-literal decision for a `+`, `-`, or `*` at the current
/// position, given the operand text accumulated so far.
fn is_operator(accumulated: &str, ch: char, next_is_space: bool) -> bool {
    // Nothing accumulated yet: a leading sign, not an operator.
    if accumulated.trim().is_empty() {
        return false;
    }

    // Keep dates whole: "2025-08-19" must not split after the year or the
    // year-month span.
    if ch == '-' && (ends_with_year(accumulated) || ends_with_year_month(accumulated)) {
        return false;
    }

    // Duration and instant literals never contain '*'.
    if ch == '*' {
        return true;
    }

    // A completed instant on the left means the sign starts a new operand.
    if instant::parse_instant(accumulated.trim()).is_ok() {
        return true;
    }

    // Whitespace on either side separates operands; bare concatenation is
    // literal (keeps "1h15s" together).
    accumulated.chars().any(char::is_whitespace) || next_is_space
}

/// Whether the text ends in a 4-digit run (`...2025`).
fn ends_with_year(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].iter().all(u8::is_ascii_digit)
}

/// Whether the text ends in a 4-digit-year-2-digit-month span (`...2025-08`).
fn ends_with_year_month(text: &str) -> bool {
    let bytes = text.as_bytes();
    let n = bytes.len();
    n >= 7
        && bytes[n - 7..n - 3].iter().all(u8::is_ascii_digit)
        && bytes[n - 3] == b'-'
        && bytes[n - 2..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_simple_addition() {
        assert_eq!(toks("1h + 30m"), ["1h", "+", "30m"]);
    }

    #[test]
    fn test_compound_duration_stays_whole() {
        assert_eq!(toks("1h15s + 2d30m45s"), ["1h15s", "+", "2d30m45s"]);
    }

    #[test]
    fn test_date_is_not_split_on_hyphens() {
        assert_eq!(
            toks("2025-12-25 - 2025-01-01 00:00:00"),
            ["2025-12-25", "-", "2025-01-01 00:00:00"]
        );
    }

    #[test]
    fn test_star_is_always_an_operator() {
        assert_eq!(toks("3*2h"), ["3", "*", "2h"]);
        assert_eq!(toks("3 * 2h 30m"), ["3", "*", "2h 30m"]);
    }

    #[test]
    fn test_completed_instant_lookbehind() {
        // No whitespace needed after a complete clock time.
        assert_eq!(toks("4:30pm+3s"), ["4:30pm", "+", "3s"]);
        assert_eq!(toks("2:56am + 3.5h"), ["2:56am", "+", "3.5h"]);
    }

    #[test]
    fn test_leading_sign_is_not_an_operator() {
        assert_eq!(toks("-1h"), ["-1h"]);
    }

    #[test]
    fn test_whitespace_separated_operands() {
        assert_eq!(toks("2h 30m - 1h"), ["2h 30m", "-", "1h"]);
    }

    #[test]
    fn test_datetime_with_time_minus() {
        assert_eq!(
            toks("2025-06-01 00:00:00 - 3d"),
            ["2025-06-01 00:00:00", "-", "3d"]
        );
    }

    #[test]
    fn test_progress_call_is_one_token() {
        assert_eq!(toks("progress(1h15s, 15%)"), ["progress(1h15s, 15%)"]);
    }

    #[test]
    fn test_progress_call_in_larger_expression_stays_whole() {
        assert_eq!(
            toks("progress(2h, 50%) + 1h"),
            ["progress(2h, 50%)", "+", "1h"]
        );
    }

    #[test]
    fn test_single_operand_yields_one_token() {
        assert_eq!(toks("90m"), ["90m"]);
    }

    #[test]
    fn test_dangling_operator_is_preserved_for_validation() {
        assert_eq!(toks("1h +"), ["1h", "+"]);
    }
}
