//! Shared fixtures for unit tests.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::context::Context;
use crate::model::{Comparator, GapConfig, ScoringConfig};

pub fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

pub fn regression_context(seed: u64) -> Context {
    Context::regression(seed)
}

/// One text gap, size 10, `{"paris": 4, "Paris": 4}`.
pub fn paris_config(comparator: Comparator) -> ScoringConfig {
    ScoringConfig {
        identical_scoring: true,
        comparator,
        gaps: vec![GapConfig::Text {
            size: Some(10),
            options: [("paris", dec("4")), ("Paris", dec("4"))]
                .into_iter()
                .collect(),
        }],
    }
}

/// One numeric gap scoring 3 inside `[1.00, 2.00]`.
pub fn numeric_config() -> ScoringConfig {
    ScoringConfig {
        identical_scoring: true,
        comparator: Comparator::CaseSensitive,
        gaps: vec![numeric_gap("1.5", "1.00", "2.00", "3")],
    }
}

pub fn numeric_gap(value: &str, lower: &str, upper: &str, score: &str) -> GapConfig {
    GapConfig::Numeric {
        value: dec(value),
        lower: dec(lower),
        upper: dec(upper),
        score: dec(score),
    }
}

pub fn text_gap(size: Option<usize>, options: &[(&str, &str)]) -> GapConfig {
    GapConfig::Text {
        size,
        options: options.iter().map(|(a, s)| (*a, dec(s))).collect(),
    }
}

pub fn select_gap(options: &[(&str, &str)]) -> GapConfig {
    GapConfig::Select {
        options: options.iter().map(|(a, s)| (*a, dec(s))).collect(),
    }
}

/// Text, select and numeric gap side by side.
pub fn mixed_config() -> ScoringConfig {
    ScoringConfig {
        identical_scoring: false,
        comparator: Comparator::IgnoreCase,
        gaps: vec![
            text_gap(None, &[("berlin", "2"), ("Bonn", "0.5")]),
            select_gap(&[("red", "1"), ("green", "0"), ("blue", "0.25")]),
            numeric_gap("3.14", "3.1", "3.2", "2"),
        ],
    }
}
