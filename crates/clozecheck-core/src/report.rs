//! Session reports with JSON persistence and regression comparison.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerSet, Locale, ScoringConfig};
use crate::readjust::ReadjustmentDiff;

/// Everything one clozecheck session produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Seed of a regression session; `None` for random sessions.
    pub seed: Option<u64>,
    pub locale: Locale,
    pub items: Vec<ItemRun>,
    #[serde(default)]
    pub coverage: CoverageSummary,
}

/// Rounds played against one cloze item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRun {
    pub item_id: String,
    pub title: String,
    /// Configuration at the start of the run.
    pub initial_scoring: ScoringConfig,
    /// Configuration after the last readjustment.
    pub final_scoring: ScoringConfig,
    pub rounds: Vec<RoundRecord>,
}

/// One generated answer set and what followed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub answers: AnswerSet,
    pub valid: std::collections::BTreeMap<usize, bool>,
    pub expected_score: Decimal,
    pub maximum_score: Decimal,
    /// Generation attempts including the accepted one.
    pub attempts: usize,
    #[serde(default)]
    pub readjustment: Option<ReadjustmentDiff>,
}

/// Declared versus observed coverage cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub declared: usize,
    pub covered: usize,
    /// Human-readable descriptions of the cases never observed.
    #[serde(default)]
    pub uncovered: Vec<String>,
}

impl CoverageSummary {
    pub fn ratio(&self) -> f64 {
        if self.declared == 0 {
            1.0
        } else {
            self.covered as f64 / self.declared as f64
        }
    }
}

impl ItemRun {
    /// Sum of expected scores over all rounds.
    pub fn total_expected(&self) -> Decimal {
        self.rounds.iter().map(|r| r.expected_score).sum()
    }

    pub fn readjustment_count(&self) -> usize {
        self.rounds
            .iter()
            .filter(|r| r.readjustment.is_some())
            .count()
    }
}

impl SessionReport {
    pub fn new(seed: Option<u64>, locale: Locale) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            seed,
            locale,
            items: Vec::new(),
            coverage: CoverageSummary::default(),
        }
    }

    pub fn round_count(&self) -> usize {
        self.items.iter().map(|i| i.rounds.len()).sum()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Replay-compare this report against `baseline` round by round.
    ///
    /// Two sessions with the same seed and items must produce the same
    /// answers and the same expected scores.
    pub fn compare(&self, baseline: &SessionReport) -> ComparisonReport {
        let index = |report: &SessionReport| -> HashMap<(String, usize), RoundRecord> {
            report
                .items
                .iter()
                .flat_map(|item| {
                    item.rounds
                        .iter()
                        .map(|r| ((item.item_id.clone(), r.round), r.clone()))
                })
                .collect()
        };

        let baseline_rounds = index(baseline);
        let current_rounds = index(self);

        let mut mismatches = Vec::new();
        let mut matched = 0usize;
        let mut new_rounds = 0usize;

        for (key, current) in &current_rounds {
            let Some(base) = baseline_rounds.get(key) else {
                new_rounds += 1;
                continue;
            };
            let kind = if base.answers != current.answers {
                Some(MismatchKind::Answers)
            } else if base.expected_score != current.expected_score {
                Some(MismatchKind::Score)
            } else if base.readjustment != current.readjustment {
                Some(MismatchKind::Readjustment)
            } else {
                None
            };
            match kind {
                Some(kind) => mismatches.push(Mismatch {
                    item_id: key.0.clone(),
                    round: key.1,
                    kind,
                    baseline_score: base.expected_score,
                    current_score: current.expected_score,
                }),
                None => matched += 1,
            }
        }

        mismatches.sort_by(|a, b| (&a.item_id, a.round).cmp(&(&b.item_id, b.round)));

        let missing_rounds = baseline_rounds
            .keys()
            .filter(|k| !current_rounds.contains_key(*k))
            .count();

        ComparisonReport {
            mismatches,
            matched,
            new_rounds,
            missing_rounds,
        }
    }
}

/// Result of comparing two session reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub mismatches: Vec<Mismatch>,
    /// Rounds identical in both reports.
    pub matched: usize,
    /// Rounds only in the current report.
    pub new_rounds: usize,
    /// Rounds only in the baseline.
    pub missing_rounds: usize,
}

/// What differed in a replayed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    Answers,
    Score,
    Readjustment,
}

impl std::fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchKind::Answers => write!(f, "answers"),
            MismatchKind::Score => write!(f, "score"),
            MismatchKind::Readjustment => write!(f, "readjustment"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mismatch {
    pub item_id: String,
    pub round: usize,
    pub kind: MismatchKind,
    pub baseline_score: Decimal,
    pub current_score: Decimal,
}

impl ComparisonReport {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} mismatches, {} matched, {} new, {} missing\n\n",
            self.mismatches.len(),
            self.matched,
            self.new_rounds,
            self.missing_rounds
        ));

        if !self.mismatches.is_empty() {
            md.push_str("### Mismatches\n\n");
            md.push_str("| Item | Round | Kind | Baseline | Current |\n");
            md.push_str("|------|-------|------|----------|---------|\n");
            for m in &self.mismatches {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    m.item_id, m.round, m.kind, m.baseline_score, m.current_score
                ));
            }
        }

        md
    }

    pub fn has_mismatches(&self) -> bool {
        !self.mismatches.is_empty()
    }
}
