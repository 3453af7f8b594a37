//! Coverage bookkeeping contract.
//!
//! Gaps declare the scenarios they intend to exercise once per question
//! (`add_case`) and report each scenario they actually hit
//! (`case_occurred`). Descriptors are compared by exact equality.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numeric::looks_numeric;

/// Where a case is checked: in the answer verification pass or in the
/// results export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageMode {
    Verify,
    Export,
}

impl CoverageMode {
    pub const ALL: [CoverageMode; 2] = [CoverageMode::Verify, CoverageMode::Export];
}

impl fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageMode::Verify => write!(f, "verify"),
            CoverageMode::Export => write!(f, "export"),
        }
    }
}

/// Receiver of coverage declarations and observations.
pub trait CoverageTracker {
    fn add_case(&mut self, question: &str, gap: usize, mode: CoverageMode, descriptor: Vec<String>);

    fn case_occurred(
        &mut self,
        question: &str,
        gap: usize,
        channel: CoverageMode,
        descriptor: Vec<String>,
    );
}

/// Text shape cases declared for a text gap with the given entry size.
pub fn text_cases(size: usize) -> Vec<Vec<String>> {
    vec![
        vec!["empty".to_string()],
        vec!["full".to_string(), size.to_string()],
        vec!["number".to_string()],
        vec!["padded".to_string()],
    ]
}

/// The text shape cases `value` hits for a gap with the given entry size.
pub fn text_cases_occurred(value: &str, size: usize) -> Vec<Vec<String>> {
    let mut cases = Vec::new();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        cases.push(vec!["empty".to_string()]);
    } else {
        if value.len() != trimmed.len() {
            cases.push(vec!["padded".to_string()]);
        }
        if looks_numeric(trimmed) {
            cases.push(vec!["number".to_string()]);
        }
    }
    if size > 0 && value.chars().count() == size {
        cases.push(vec!["full".to_string(), size.to_string()]);
    }
    cases
}

/// A declared coverage scenario.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoverageCase {
    pub question: String,
    pub gap: usize,
    pub mode: CoverageMode,
    pub descriptor: Vec<String>,
}

impl fmt::Display for CoverageCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} gap {} [{}] {}",
            self.question,
            self.gap + 1,
            self.mode,
            self.descriptor.join(" ")
        )
    }
}

/// [`CoverageTracker`] that remembers what was declared and which declared
/// cases occurred.
#[derive(Debug, Clone, Default)]
pub struct CoverageLedger {
    declared: BTreeSet<CoverageCase>,
    occurred: BTreeSet<CoverageCase>,
}

impl CoverageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    pub fn covered_count(&self) -> usize {
        self.declared
            .iter()
            .filter(|case| self.occurred.contains(*case))
            .count()
    }

    /// Declared cases never observed, in sorted order.
    pub fn uncovered(&self) -> Vec<&CoverageCase> {
        self.declared
            .iter()
            .filter(|case| !self.occurred.contains(*case))
            .collect()
    }
}

impl CoverageTracker for CoverageLedger {
    fn add_case(&mut self, question: &str, gap: usize, mode: CoverageMode, descriptor: Vec<String>) {
        self.declared.insert(CoverageCase {
            question: question.to_string(),
            gap,
            mode,
            descriptor,
        });
    }

    fn case_occurred(
        &mut self,
        question: &str,
        gap: usize,
        channel: CoverageMode,
        descriptor: Vec<String>,
    ) {
        let case = CoverageCase {
            question: question.to_string(),
            gap,
            mode: channel,
            descriptor,
        };
        if self.declared.contains(&case) {
            self.occurred.insert(case);
        }
    }
}
