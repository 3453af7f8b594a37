//! Exact numeric parsing and the 16 significant digit representation used
//! for numeric gaps.
//!
//! The exam engine limits exported numbers to 16 significant digits, e.g.
//! `25.433019319138662` becomes `25.43301931913866`. Both scoring and
//! answer generation go through the same rounding, so generated values
//! never sit on a rounding ambiguity at an interval boundary.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of significant digits kept for numeric gap answers.
pub const SIGNIFICANT_DIGITS: u32 = 16;

/// Whether `text` parses as a number at all (including forms like `inf` or
/// `1e400` that have no exact decimal representation).
pub fn looks_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && (trimmed.parse::<f64>().is_ok() || parse_decimal(trimmed).is_some())
}

/// Parse `text` as an exact decimal. Plain and scientific notation are
/// accepted; anything that only parses as a binary float of a magnitude
/// outside the decimal range yields `None`.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if let Ok(value) = Decimal::from_str(unsigned) {
        return Some(value);
    }
    if let Ok(value) = Decimal::from_scientific(unsigned) {
        return Some(value);
    }
    // Forms such as "5." or ".5e1" that only the float grammar accepts.
    let float = trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Decimal::from_str(&float.to_string()).ok()
}

/// Round to [`SIGNIFICANT_DIGITS`] significant digits and drop trailing
/// zeros.
pub fn round_significant(value: Decimal) -> Decimal {
    value
        .round_sf_with_strategy(SIGNIFICANT_DIGITS, RoundingStrategy::MidpointNearestEven)
        .unwrap_or(value)
        .normalize()
}

/// The textual form of a numeric answer as the exam engine would export it.
pub fn format_numeric(value: Decimal) -> String {
    round_significant(value).to_string()
}
