//! Random readjustment of a question's scoring configuration for regression
//! runs.
//!
//! Readjusted configurations stay live: numeric gaps never score zero and
//! every text or select gap keeps at least one option worth points.

use rand::seq::IndexedRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::Context;
use crate::error::ClozeError;
use crate::gap::Gap;
use crate::model::{AnswerSet, Comparator, GapConfig, GapKind, ScoredOptions, ScoringConfig};
use crate::question::ClozeQuestion;
use crate::retry::RetryBudget;
use crate::text::mutate_text;

/// Upper bound for the number of options added to one gap.
const MAX_NEW_OPTIONS: usize = 10;

/// Zero one time in ten, otherwise a multiple of a quarter up to 3.
pub fn coarse_score<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    if rng.random_range(1..=10) == 5 {
        Decimal::ZERO
    } else {
        quarters(rng.random_range(1..=12))
    }
}

fn quarters(k: i64) -> Decimal {
    Decimal::from(k) / Decimal::from(4)
}

/// The outcome of one readjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readjustment {
    pub old: ScoringConfig,
    pub new: ScoringConfig,
    pub diff: ReadjustmentDiff,
}

/// Before/after comparison of two configurations of the same question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadjustmentDiff {
    pub identical_scoring: DiffRow,
    pub comparator: DiffRow,
    pub gaps: Vec<GapDiff>,
}

/// Rows of one gap, labelled `gap N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapDiff {
    pub label: String,
    pub rows: Vec<DiffRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    pub key: String,
    pub old: String,
    pub new: String,
}

impl DiffRow {
    fn new(key: impl Into<String>, old: impl ToString, new: impl ToString) -> Self {
        Self {
            key: key.into(),
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// Placeholder for an option missing on one side of a diff.
pub const MISSING: &str = "n/a";
/// Placeholder for a text gap without a size limit.
pub const NO_LIMIT: &str = "no limit";

fn size_label(size: Option<usize>) -> String {
    size.map_or_else(|| NO_LIMIT.to_string(), |s| s.to_string())
}

impl ReadjustmentDiff {
    /// Compare `old` and `new`, gap by gap. Gaps only present on one side
    /// are ignored.
    pub fn between(old: &ScoringConfig, new: &ScoringConfig) -> Self {
        let gaps = old
            .gaps
            .iter()
            .zip(&new.gaps)
            .enumerate()
            .map(|(i, (before, after))| GapDiff {
                label: format!("gap {}", i + 1),
                rows: gap_rows(before, after),
            })
            .collect();
        Self {
            identical_scoring: DiffRow::new(
                "identical_scoring",
                old.identical_scoring,
                new.identical_scoring,
            ),
            comparator: DiffRow::new("comparator", old.comparator, new.comparator),
            gaps,
        }
    }

    /// Number of rows whose value changed.
    pub fn changed_count(&self) -> usize {
        [&self.identical_scoring, &self.comparator]
            .into_iter()
            .chain(self.gaps.iter().flat_map(|g| g.rows.iter()))
            .filter(|row| row.changed())
            .count()
    }
}

fn gap_rows(before: &GapConfig, after: &GapConfig) -> Vec<DiffRow> {
    match (before, after) {
        (
            GapConfig::Numeric {
                value: v0,
                lower: l0,
                upper: u0,
                score: s0,
            },
            GapConfig::Numeric {
                value: v1,
                lower: l1,
                upper: u1,
                score: s1,
            },
        ) => vec![
            DiffRow::new("value", v0, v1),
            DiffRow::new("lower", l0, l1),
            DiffRow::new("upper", u0, u1),
            DiffRow::new("score", s0, s1),
        ],
        _ => {
            let mut rows = vec![DiffRow::new(
                "size",
                size_label(text_size(before)),
                size_label(text_size(after)),
            )];
            let empty = ScoredOptions::new();
            let old_options = before.options().unwrap_or(&empty);
            let new_options = after.options().unwrap_or(&empty);
            let added = new_options.answers().filter(|a| !old_options.contains(a));
            for key in old_options.answers().chain(added) {
                let show = |o: &ScoredOptions| o.get(key).map_or(MISSING.to_string(), |s| s.to_string());
                rows.push(DiffRow::new(key, show(old_options), show(new_options)));
            }
            rows
        }
    }
}

fn text_size(config: &GapConfig) -> Option<usize> {
    match config {
        GapConfig::Text { size, .. } => *size,
        _ => None,
    }
}

/// Readjust `question` in place, using the answers just submitted as a
/// source of new options. Retries until every gap is live.
pub fn readjust(
    question: &mut ClozeQuestion,
    submitted: &AnswerSet,
    ctx: &mut Context,
) -> Result<Readjustment, ClozeError> {
    readjust_with_budget(question, submitted, ctx, RetryBudget::unbounded())
}

/// Like [`readjust`], but each rejection-sampling loop gives up after
/// `max_attempts`.
pub fn readjust_bounded(
    question: &mut ClozeQuestion,
    submitted: &AnswerSet,
    ctx: &mut Context,
    max_attempts: usize,
) -> Result<Readjustment, ClozeError> {
    readjust_with_budget(question, submitted, ctx, RetryBudget::at_most(max_attempts))
}

fn readjust_with_budget(
    question: &mut ClozeQuestion,
    submitted: &AnswerSet,
    ctx: &mut Context,
    budget: RetryBudget,
) -> Result<Readjustment, ClozeError> {
    let new = readjust_scoring(question, submitted, ctx, budget)?;
    let old = question.replace_scoring(new.clone());
    let diff = ReadjustmentDiff::between(&old, &new);
    info!(
        question = question.id(),
        changed = diff.changed_count(),
        "readjusted scoring"
    );
    Ok(Readjustment { old, new, diff })
}

/// Draw a readjusted configuration for `question` without installing it.
pub fn readjust_scoring(
    question: &ClozeQuestion,
    submitted: &AnswerSet,
    ctx: &mut Context,
    budget: RetryBudget,
) -> Result<ScoringConfig, ClozeError> {
    let scoring = question.scoring();

    let identical_scoring = if ctx.rng.random_range(0..4) == 0 {
        !scoring.identical_scoring
    } else {
        scoring.identical_scoring
    };

    let comparator = if ctx.rng.random_range(0..4) == 0 {
        let others: Vec<Comparator> = Comparator::ALL
            .into_iter()
            .filter(|c| *c != scoring.comparator)
            .collect();
        others.choose(&mut ctx.rng).copied().unwrap_or(scoring.comparator)
    } else {
        scoring.comparator
    };

    let mut gaps = Vec::with_capacity(scoring.gaps.len());
    for (index, config) in scoring.gaps.iter().enumerate() {
        let Some(gap) = question.gap(index) else {
            continue;
        };
        let submitted = submitted.get(&index).map(String::as_str);
        gaps.push(readjust_gap(config, gap, submitted, ctx, budget.renewed())?);
    }

    Ok(ScoringConfig {
        identical_scoring,
        comparator,
        gaps,
    })
}

fn readjust_gap(
    config: &GapConfig,
    gap: &Gap,
    submitted: Option<&str>,
    ctx: &mut Context,
    mut budget: RetryBudget,
) -> Result<GapConfig, ClozeError> {
    match config {
        GapConfig::Numeric {
            value,
            lower,
            upper,
            ..
        } => {
            let score = loop {
                budget.spend("numeric score readjustment")?;
                let score = coarse_score(&mut ctx.rng);
                if score > Decimal::ZERO {
                    break score;
                }
            };
            Ok(GapConfig::Numeric {
                value: *value,
                lower: *lower,
                upper: *upper,
                score,
            })
        }
        GapConfig::Text { size, options } => Ok(GapConfig::Text {
            size: *size,
            options: readjust_options(gap, options, submitted, ctx, budget)?,
        }),
        GapConfig::Select { options } => Ok(GapConfig::Select {
            options: readjust_options(gap, options, submitted, ctx, budget)?,
        }),
    }
}

fn readjust_options(
    gap: &Gap,
    options: &ScoredOptions,
    submitted: Option<&str>,
    ctx: &mut Context,
    mut budget: RetryBudget,
) -> Result<ScoredOptions, ClozeError> {
    let scored = gap.scored_options();
    let mut unscored: Vec<String> = submitted
        .filter(|answer| !scored.contains(answer))
        .map(str::to_string)
        .into_iter()
        .collect();

    let mut extended = options.clone();
    let most = unscored.len().max(2).min(MAX_NEW_OPTIONS);
    let least = usize::from(extended.is_empty());
    let additions = ctx.rng.random_range(least..=most);

    for _ in 0..additions {
        loop {
            budget.spend("option candidate")?;
            let from_pool = gap.kind() == GapKind::Text
                && !unscored.is_empty()
                && ctx.rng.random_range(1..=10) > 1;
            let candidate = if from_pool {
                let i = ctx.rng.random_range(0..unscored.len());
                unscored.swap_remove(i)
            } else {
                let (choice, _) = gap.get_random_choice(ctx);
                if gap.kind() == GapKind::Select {
                    mutate_text(&choice, None, ctx)
                } else {
                    choice
                }
            };
            let candidate = candidate.trim().replace('\t', "");
            if !candidate.is_empty() && !extended.answers().any(|a| a.trim() == candidate) {
                let score = quarters(ctx.rng.random_range(1..=8));
                debug!(gap = gap.index(), option = %candidate, "adding option");
                extended.insert(candidate, score);
                break;
            }
        }
    }

    let mut budget = budget.renewed();
    loop {
        budget.spend("option rescoring")?;
        let rescored: ScoredOptions = extended
            .answers()
            .map(|answer| (answer, coarse_score(&mut ctx.rng)))
            .collect();
        if rescored.any_positive() {
            return Ok(rescored);
        }
    }
}
