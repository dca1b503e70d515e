//! Sugar rewriter: the textual pass that runs before tokenization.
//!
//! Three jobs, in pipeline order:
//! 1. substitute every whole-word `now` with the caller-supplied anchor,
//!    rendered in canonical `YYYY-MM-DD HH:MM:SS` form, so every later
//!    stage sees a literal instant;
//! 2. detect the rate pattern `<elapsed> @ <amount> -> <total>`, which
//!    takes priority over everything else for the whole expression;
//! 3. rewrite the progress shorthands `X@Y%` and `Y% in X` into canonical
//!    `progress(X, Y%)` calls.
//!
//! The anchor is passed by value — this module never reads the clock, which
//! keeps one `evaluate` call internally consistent: every `now` in a single
//! expression denotes the identical instant.

use chrono::NaiveDateTime;

/// Replace each whole-word, case-insensitive `now` with the anchor.
pub fn substitute_now(text: &str, now: NaiveDateTime) -> String {
    let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let is_now = text
            .get(i..i + 3)
            .is_some_and(|word| word.eq_ignore_ascii_case("now"))
            && boundary_before(text, i)
            && boundary_after(text, i + 3);
        if is_now {
            out.push_str(&stamp);
            i += 3;
        } else {
            let ch = text[i..].chars().next().expect("index is a char boundary");
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

fn boundary_before(text: &str, i: usize) -> bool {
    text[..i].chars().next_back().is_none_or(|c| !c.is_alphanumeric())
}

fn boundary_after(text: &str, i: usize) -> bool {
    text[i..].chars().next().is_none_or(|c| !c.is_alphanumeric())
}

/// Detect `<elapsed> @ <amount> -> <total>` and split out the three operand
/// strings. Returns `None` when the pattern is absent; when present it wins
/// over every other interpretation of the expression.
pub fn split_rate_pattern(text: &str) -> Option<(&str, &str, &str)> {
    let at = text.find('@')?;
    let arrow = at + 1 + text[at + 1..].find("->")?;

    let elapsed = text[..at].trim();
    let transferred = text[at + 1..arrow].trim();
    let target = text[arrow + 2..].trim();
    (!elapsed.is_empty() && !transferred.is_empty() && !target.is_empty())
        .then_some((elapsed, transferred, target))
}

/// Rewrite both progress shorthands into canonical `progress(...)` calls.
pub fn rewrite_progress_sugar(text: &str) -> String {
    rewrite_percent_in(&rewrite_at_percent(text))
}

/// `<duration>@<percent>%` → `progress(<duration>, <percent>%)`.
fn rewrite_at_percent(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'@' {
            // Duration run on the left, percent on the right, optional
            // whitespace around the '@'.
            let mut dur_end = i;
            while dur_end > copied && bytes[dur_end - 1].is_ascii_whitespace() {
                dur_end -= 1;
            }
            let dur_start = run_start(bytes, dur_end, copied);

            let mut pct_start = i + 1;
            while pct_start < bytes.len() && bytes[pct_start].is_ascii_whitespace() {
                pct_start += 1;
            }
            let pct_end = number_end(bytes, pct_start);

            if dur_start < dur_end
                && is_duration_like(&text[dur_start..dur_end])
                && pct_end > pct_start
                && bytes.get(pct_end) == Some(&b'%')
            {
                out.push_str(&text[copied..dur_start]);
                out.push_str("progress(");
                out.push_str(&text[dur_start..dur_end]);
                out.push_str(", ");
                out.push_str(&text[pct_start..pct_end]);
                out.push_str("%)");
                copied = pct_end + 1;
                i = copied;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&text[copied..]);
    out
}

/// `<percent>% in <duration>` → `progress(<duration>, <percent>%)`.
fn rewrite_percent_in(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let pct_start = number_start(bytes, i, copied);

            // "% in " with at least one space on each side of "in".
            let mut j = i + 1;
            let ws_before = j < bytes.len() && bytes[j].is_ascii_whitespace();
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            let has_in = ws_before
                && text
                    .get(j..j + 2)
                    .is_some_and(|word| word.eq_ignore_ascii_case("in"))
                && bytes.get(j + 2).is_some_and(u8::is_ascii_whitespace);
            if pct_start < i && has_in {
                let mut dur_start = j + 2;
                while dur_start < bytes.len() && bytes[dur_start].is_ascii_whitespace() {
                    dur_start += 1;
                }
                let dur_end = run_end(bytes, dur_start);
                if dur_end > dur_start && is_duration_like(&text[dur_start..dur_end]) {
                    out.push_str(&text[copied..pct_start]);
                    out.push_str("progress(");
                    out.push_str(&text[dur_start..dur_end]);
                    out.push_str(", ");
                    out.push_str(&text[pct_start..i]);
                    out.push_str("%)");
                    copied = dur_end;
                    i = copied;
                    continue;
                }
            }
        }
        i += 1;
    }
    out.push_str(&text[copied..]);
    out
}

/// Start of the maximal `[0-9a-zA-Z.]` run ending at `end`, bounded below.
fn run_start(bytes: &[u8], end: usize, floor: usize) -> usize {
    let mut start = end;
    while start > floor && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'.') {
        start -= 1;
    }
    start
}

/// End of the maximal `[0-9a-zA-Z.]` run starting at `start`.
fn run_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'.') {
        end += 1;
    }
    end
}

/// End of a `[0-9.]` run starting at `start`.
fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    end
}

/// Start of a `[0-9.]` run ending at `end`, bounded below.
fn number_start(bytes: &[u8], end: usize, floor: usize) -> usize {
    let mut start = end;
    while start > floor && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.') {
        start -= 1;
    }
    start
}

/// Whether the text is a duration-like span: one or more `(number)(letters)`
/// groups with nothing in between (`1h15s`, `2d30m45s`, `3.5h`).
fn is_duration_like(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut groups = 0;

    while i < bytes.len() {
        let digits = number_end(bytes, i);
        if digits == i {
            return false;
        }
        i = digits;
        let mut letters = i;
        while letters < bytes.len() && bytes[letters].is_ascii_alphabetic() {
            letters += 1;
        }
        if letters == i {
            return false;
        }
        i = letters;
        groups += 1;
    }
    groups > 0
}
