//! # timecalc-engine
//!
//! Typed expression engine for time arithmetic.
//!
//! Evaluates free-form expressions over instants, durations, plain numbers,
//! and byte quantities: `2:56am + 3.5h`, `2025-12-25 - now`, `3 * 2h 30m`,
//! `progress(1h15s, 15%)`, `2h30m @ 1.5GB -> 10GB`. Evaluation is strictly
//! left to right with no precedence, and the whole engine is clock-free
//! below [`evaluate`]: the anchor instant that `now` resolves to is sampled
//! once per call and threaded explicitly, so results are deterministic and
//! testable.
//!
//! ## Modules
//!
//! - [`rewrite`] — textual sugar pass: `now` substitution, rate-pattern
//!   detection, progress shorthands
//! - [`tokenize`] — context-sensitive split into operand/operator tokens
//! - [`eval`] — left-to-right evaluation and the typed arithmetic table
//! - [`instant`] — calendar/clock literal grammar (time-only sentinel)
//! - [`duration`] — compound duration grammar (`1d2h30m`)
//! - [`bytes`] — byte-quantity grammar and human-unit formatting
//! - [`progress`] — `progress(elapsed, percent[, mode])` calculator
//! - [`rate`] — transfer-rate calculator behind the rate pattern
//! - [`format`] — labeled display rows for results
//! - [`value`] — the value model shared by every stage
//! - [`error`] — error types

pub mod bytes;
pub mod duration;
pub mod error;
pub mod eval;
pub mod format;
pub mod instant;
pub mod progress;
pub mod rate;
pub mod rewrite;
pub mod tokenize;
pub mod value;

pub use error::{EngineError, Result};
pub use eval::{evaluate, evaluate_at};
pub use format::format_value;
pub use value::{RateResult, Value};
