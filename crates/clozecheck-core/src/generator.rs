//! Random answer sets for a whole cloze question.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rand::seq::{IndexedRandom, SliceRandom};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compute::compute_score_by_indices;
use crate::context::Context;
use crate::error::ClozeError;
use crate::model::{AnswerSet, GapKind};
use crate::question::ClozeQuestion;
use crate::retry::RetryBudget;
use crate::text::is_empty_answer;

/// One accepted answer set with its reference score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub answers: AnswerSet,
    /// Whether each answer is acceptable input for its gap.
    pub valid: BTreeMap<usize, bool>,
    pub expected_score: Decimal,
    /// Attempts needed, including the accepted one.
    pub attempts: usize,
}

/// Generate an answer set, retrying until one is acceptable.
pub fn generate_answer(question: &ClozeQuestion, ctx: &mut Context) -> GeneratedAnswer {
    match generate_with_budget(question, ctx, RetryBudget::unbounded()) {
        Ok(answer) => answer,
        Err(_) => unreachable!("an unbounded budget never runs out"),
    }
}

/// Like [`generate_answer`], giving up after `max_attempts` rejected sets.
pub fn generate_answer_bounded(
    question: &ClozeQuestion,
    ctx: &mut Context,
    max_attempts: usize,
) -> Result<GeneratedAnswer, ClozeError> {
    generate_with_budget(question, ctx, RetryBudget::at_most(max_attempts))
}

fn generate_with_budget(
    question: &ClozeQuestion,
    ctx: &mut Context,
    mut budget: RetryBudget,
) -> Result<GeneratedAnswer, ClozeError> {
    loop {
        budget.spend("answer generation")?;

        let mut answers = AnswerSet::new();
        let mut valid = BTreeMap::new();
        let mut previous: HashMap<GapKind, BTreeSet<String>> = HashMap::new();
        let mut all_empty = true;

        let mut order: Vec<usize> = (0..question.gaps().len()).collect();
        order.shuffle(&mut ctx.rng);

        for index in order {
            let Some(gap) = question.gap(index) else {
                continue;
            };
            let pool = previous.entry(gap.kind()).or_default();

            let mut choice = None;
            if !pool.is_empty() && ctx.chance(ctx.settings.cloze_previous_answer_p) {
                let candidates: Vec<&String> = pool.iter().collect();
                choice = candidates
                    .choose(&mut ctx.rng)
                    .map(|s| s.to_string())
                    .filter(|s| gap.is_valid_answer(s));
            }
            let choice = match choice {
                Some(reused) => reused,
                None => gap.get_random_choice(ctx).0,
            };

            all_empty = all_empty && is_empty_answer(&choice, &ctx.workarounds);
            valid.insert(index, gap.is_valid_answer(&choice));
            previous.entry(gap.kind()).or_default().insert(choice.clone());
            answers.insert(index, choice);
        }

        if all_empty && !answers.is_empty() && ctx.workarounds.disallow_empty_answers {
            debug!(
                question = question.id(),
                attempt = budget.used(),
                "rejected all-empty answer set"
            );
            continue;
        }

        let expected_score = compute_score_by_indices(question, &answers, &ctx.workarounds);
        return Ok(GeneratedAnswer {
            answers,
            valid,
            expected_score,
            attempts: budget.used(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, Workarounds};
    use crate::context::SessionMode;
    use crate::model::{Comparator, Locale, ScoringConfig};
    use crate::test_utils::*;

    fn context(seed: u64, workarounds: Workarounds) -> Context {
        Context::new(
            SessionMode::Regression { seed },
            Settings::default(),
            workarounds,
            Locale::En,
        )
    }

    #[test]
    fn every_gap_gets_an_answer() {
        let question = ClozeQuestion::new("q", "", mixed_config());
        let mut ctx = regression_context(1);
        for _ in 0..50 {
            let generated = generate_answer_bounded(&question, &mut ctx, 100).unwrap();
            assert_eq!(generated.answers.len(), 3);
            assert_eq!(generated.valid.len(), 3);
            assert_eq!(
                generated.expected_score,
                compute_score_by_indices(&question, &generated.answers, &ctx.workarounds)
            );
            assert!(generated.valid[&1], "select answers are always valid");
        }
    }

    fn assert_never_all_empty(mut ctx: Context, rounds: usize) {
        let config = ScoringConfig {
            identical_scoring: false,
            comparator: Comparator::CaseSensitive,
            gaps: vec![text_gap(Some(1), &[("a", "1")]), text_gap(Some(1), &[("b", "1")])],
        };
        let question = ClozeQuestion::new("q", "", config);
        for _ in 0..rounds {
            let generated = generate_answer_bounded(&question, &mut ctx, 1_000).unwrap();
            assert!(
                generated
                    .answers
                    .values()
                    .any(|a| !is_empty_answer(a, &ctx.workarounds)),
                "{:?}",
                generated.answers
            );
        }
    }

    fn no_empty_sets() -> Workarounds {
        Workarounds {
            disallow_empty_answers: true,
            ..Workarounds::default()
        }
    }

    #[test]
    fn never_all_empty_when_disallowed() {
        for seed in [0, 1, 42, 1_000] {
            assert_never_all_empty(context(seed, no_empty_sets()), 100);
        }
    }

    #[test]
    fn never_all_empty_when_disallowed_random() {
        let ctx = Context::new(SessionMode::Random, Settings::default(), no_empty_sets(), Locale::En);
        assert_never_all_empty(ctx, 300);
    }

    #[test]
    fn seeded_sessions_reproduce_answers() {
        let question = ClozeQuestion::new("q", "", mixed_config());
        let mut a = context(77, Workarounds::default());
        let mut b = context(77, Workarounds::default());
        for _ in 0..20 {
            assert_eq!(generate_answer(&question, &mut a), generate_answer(&question, &mut b));
        }
    }

    #[test]
    fn empty_question_yields_empty_set() {
        let config = ScoringConfig {
            identical_scoring: true,
            comparator: Comparator::IgnoreCase,
            gaps: Vec::new(),
        };
        let question = ClozeQuestion::new("q", "", config);
        let mut ctx = context(
            3,
            Workarounds {
                disallow_empty_answers: true,
                ..Workarounds::default()
            },
        );
        let generated = generate_answer_bounded(&question, &mut ctx, 1).unwrap();
        assert!(generated.answers.is_empty());
        assert!(generated.expected_score.is_zero());
        assert_eq!(generated.attempts, 1);
    }

    #[test]
    fn bounded_generation_reports_exhaustion() {
        let config = ScoringConfig {
            identical_scoring: true,
            comparator: Comparator::CaseSensitive,
            gaps: vec![select_gap(&[(" ", "1")])],
        };
        let question = ClozeQuestion::new("q", "", config);
        let mut ctx = context(
            4,
            Workarounds {
                disallow_empty_answers: true,
                ..Workarounds::default()
            },
        );
        assert!(matches!(
            generate_answer_bounded(&question, &mut ctx, 25),
            Err(ClozeError::RetryLimit { attempts: 25, .. })
        ));
    }

    #[test]
    fn previous_answers_are_reused_across_gaps() {
        let config = ScoringConfig {
            identical_scoring: false,
            comparator: Comparator::CaseSensitive,
            gaps: (0..4).map(|_| text_gap(None, &[("same", "1")])).collect(),
        };
        let question = ClozeQuestion::new("q", "", config);
        let mut settings = Settings::default();
        settings.cloze_previous_answer_p = 1.0;
        let mut ctx = Context::new(
            SessionMode::Regression { seed: 6 },
            settings,
            Workarounds::default(),
            Locale::En,
        );
        let generated = generate_answer(&question, &mut ctx);
        let distinct: BTreeSet<&String> = generated.answers.values().collect();
        assert_eq!(distinct.len(), 1, "{:?}", generated.answers);
    }
}
