//! Core data model types for clozecheck.
//!
//! A cloze item's scoring configuration is an immutable value: it is read
//! once from the external configuration source, gap models are derived from
//! it, and it is replaced as a whole when readjusted.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ClozeError;

/// Submitted answers keyed by gap index. Numeric gaps submit text too.
pub type AnswerSet = BTreeMap<usize, String>;

/// String equality used for text gap scoring and duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "cs", alias = "case_sensitive")]
    CaseSensitive,
    #[serde(rename = "ci", alias = "ignore_case")]
    IgnoreCase,
}

impl Comparator {
    pub const ALL: [Comparator; 2] = [Comparator::CaseSensitive, Comparator::IgnoreCase];

    /// The value used by the exam engine's rating selector.
    pub fn code(self) -> &'static str {
        match self {
            Comparator::CaseSensitive => "cs",
            Comparator::IgnoreCase => "ci",
        }
    }

    /// Normalize `text` so that equal normalized strings compare equal.
    pub fn normalize(self, text: &str) -> String {
        match self {
            Comparator::CaseSensitive => text.to_string(),
            Comparator::IgnoreCase => casefold(text),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::CaseSensitive => write!(f, "case_sensitive"),
            Comparator::IgnoreCase => write!(f, "ignore_case"),
        }
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cs" | "case_sensitive" => Ok(Comparator::CaseSensitive),
            "ci" | "ignore_case" => Ok(Comparator::IgnoreCase),
            other => Err(format!("unknown comparator: {other}")),
        }
    }
}

/// Full Unicode case folding for the characters where it differs from
/// lowercasing.
pub fn casefold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'ß' => folded.push_str("ss"),
            'ς' => folded.push('σ'),
            _ => folded.push(c),
        }
    }
    folded
}

/// The three kinds of cloze gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapKind {
    Text,
    Select,
    Numeric,
}

impl GapKind {
    /// Numeric code used by the exam engine's `clozetype_N` fields.
    pub fn code(self) -> u8 {
        match self {
            GapKind::Text => 0,
            GapKind::Select => 1,
            GapKind::Numeric => 2,
        }
    }

    pub fn from_code(code: &str) -> Result<Self, ClozeError> {
        match code.trim() {
            "0" => Ok(GapKind::Text),
            "1" => Ok(GapKind::Select),
            "2" => Ok(GapKind::Numeric),
            other => Err(ClozeError::UnsupportedGapKind(other.to_string())),
        }
    }
}

impl fmt::Display for GapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapKind::Text => write!(f, "text"),
            GapKind::Select => write!(f, "select"),
            GapKind::Numeric => write!(f, "numeric"),
        }
    }
}

/// Language used for export-facing gap names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    pub fn gap_label(self) -> &'static str {
        match self {
            Locale::En => "Gap",
            Locale::De => "Lücke",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            other => Err(format!("unknown locale: {other}")),
        }
    }
}

/// One answer option of a text or select gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredOption {
    pub answer: String,
    pub score: Decimal,
}

/// Answer options in configuration order, with map-like lookup.
///
/// Equality is that of the mapping: order does not matter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoredOptions(Vec<ScoredOption>);

impl PartialEq for ScoredOptions {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(answer, score)| other.get(answer) == Some(score))
    }
}

impl Eq for ScoredOptions {}

impl ScoredOptions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, answer: &str) -> Option<Decimal> {
        self.0.iter().find(|o| o.answer == answer).map(|o| o.score)
    }

    pub fn contains(&self, answer: &str) -> bool {
        self.0.iter().any(|o| o.answer == answer)
    }

    /// Set the score of `answer`, appending it if it is not yet present.
    pub fn insert(&mut self, answer: impl Into<String>, score: Decimal) {
        let answer = answer.into();
        match self.0.iter_mut().find(|o| o.answer == answer) {
            Some(existing) => existing.score = score,
            None => self.0.push(ScoredOption { answer, score }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|o| (o.answer.as_str(), o.score))
    }

    pub fn answers(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|o| o.answer.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest score among all options; zero when there are none.
    pub fn max_score(&self) -> Decimal {
        self.0
            .iter()
            .map(|o| o.score)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn any_positive(&self) -> bool {
        self.0.iter().any(|o| o.score > Decimal::ZERO)
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for ScoredOptions {
    fn from_iter<T: IntoIterator<Item = (S, Decimal)>>(iter: T) -> Self {
        let mut options = ScoredOptions::new();
        for (answer, score) in iter {
            options.insert(answer, score);
        }
        options
    }
}

/// Scoring configuration of a single gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GapConfig {
    Text {
        /// Maximum answer length; `None` means unlimited.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<usize>,
        options: ScoredOptions,
    },
    Select {
        options: ScoredOptions,
    },
    Numeric {
        /// Reference solution; not used for grading.
        value: Decimal,
        lower: Decimal,
        upper: Decimal,
        score: Decimal,
    },
}

impl GapConfig {
    pub fn kind(&self) -> GapKind {
        match self {
            GapConfig::Text { .. } => GapKind::Text,
            GapConfig::Select { .. } => GapKind::Select,
            GapConfig::Numeric { .. } => GapKind::Numeric,
        }
    }

    /// The options of a text or select gap.
    pub fn options(&self) -> Option<&ScoredOptions> {
        match self {
            GapConfig::Text { options, .. } | GapConfig::Select { options } => Some(options),
            GapConfig::Numeric { .. } => None,
        }
    }

    /// Whether this gap can award any points at all.
    pub fn is_live(&self) -> bool {
        match self {
            GapConfig::Text { options, .. } | GapConfig::Select { options } => {
                options.any_positive()
            }
            GapConfig::Numeric { score, .. } => *score > Decimal::ZERO,
        }
    }
}

/// Scoring configuration of a whole cloze item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// When off, identical answers across gaps are scored only once.
    #[serde(default)]
    pub identical_scoring: bool,
    pub comparator: Comparator,
    #[serde(default)]
    pub gaps: Vec<GapConfig>,
}

/// A cloze item as stored in an item file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClozeItem {
    pub id: String,
    pub title: String,
    pub scoring: ScoringConfig,
}
