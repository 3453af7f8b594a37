//! Reference score computation for a submitted answer set.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::Workarounds;
use crate::error::ClozeError;
use crate::model::{AnswerSet, Comparator, Locale};
use crate::question::ClozeQuestion;

/// The score the exam engine should award for `answers`.
///
/// Without identical scoring, answers are visited in ascending gap order and
/// only the first occurrence of a normalized answer counts; every answer
/// enters the set of given answers, even one that scored nothing.
pub fn compute_score_by_indices(
    question: &ClozeQuestion,
    answers: &AnswerSet,
    workarounds: &Workarounds,
) -> Decimal {
    let scoring = question.scoring();
    let mut score = Decimal::ZERO;

    if scoring.identical_scoring {
        for (index, text) in answers {
            match question.gap(*index) {
                Some(gap) => score += gap.get_score(text),
                None => debug!(index, "answer for unknown gap ignored"),
            }
        }
        return score;
    }

    let comparator = if workarounds.identical_scoring_ignores_comparator {
        Comparator::CaseSensitive
    } else {
        scoring.comparator
    };

    let mut given = HashSet::new();
    for (index, text) in answers {
        let Some(gap) = question.gap(*index) else {
            debug!(index, "answer for unknown gap ignored");
            continue;
        };
        if !given.insert(comparator.normalize(text)) {
            debug!(index, answer = %text, "duplicate answer scores nothing");
            continue;
        }
        score += gap.get_score(text);
    }
    score
}

/// Like [`compute_score_by_indices`] for answers keyed by export name.
pub fn compute_score(
    question: &ClozeQuestion,
    answers: &BTreeMap<String, String>,
    locale: Locale,
    workarounds: &Workarounds,
) -> Result<Decimal, ClozeError> {
    let names = question.export_names(locale);
    let mut indexed = AnswerSet::new();
    for (name, value) in answers {
        let index = names
            .get(name)
            .ok_or_else(|| ClozeError::interaction(format!("unknown gap name: '{name}'")))?;
        indexed.insert(*index, value.clone());
    }
    Ok(compute_score_by_indices(question, &indexed, workarounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::Gap;
    use crate::model::ScoringConfig;
    use crate::test_utils::*;

    fn answers(pairs: &[(usize, &str)]) -> AnswerSet {
        pairs.iter().map(|(i, s)| (*i, s.to_string())).collect()
    }

    fn three_gaps(identical_scoring: bool, comparator: Comparator) -> ClozeQuestion {
        let config = ScoringConfig {
            identical_scoring,
            comparator,
            gaps: vec![
                text_gap(None, &[("x", "1")]),
                text_gap(None, &[("x", "2")]),
                text_gap(None, &[("y", "0.5")]),
            ],
        };
        ClozeQuestion::new("q", "three", config)
    }

    #[test]
    fn identical_scoring_sums_every_gap() {
        let question = three_gaps(true, Comparator::CaseSensitive);
        let score = compute_score_by_indices(
            &question,
            &answers(&[(0, "x"), (1, "x"), (2, "y")]),
            &Workarounds::default(),
        );
        assert_eq!(score, dec("3.5"));
    }

    #[test]
    fn duplicates_count_once_by_index_order() {
        let question = three_gaps(false, Comparator::CaseSensitive);
        let score = compute_score_by_indices(
            &question,
            &answers(&[(1, "x"), (0, "x"), (2, "y")]),
            &Workarounds::default(),
        );
        assert_eq!(score, dec("1.5"));
    }

    #[test]
    fn zero_scored_answers_still_block_duplicates() {
        let config = ScoringConfig {
            identical_scoring: false,
            comparator: Comparator::CaseSensitive,
            gaps: vec![text_gap(None, &[("a", "1")]), text_gap(None, &[("z", "1")])],
        };
        let question = ClozeQuestion::new("q", "", config);
        let score =
            compute_score_by_indices(&question, &answers(&[(0, "z"), (1, "z")]), &Workarounds::default());
        assert!(score.is_zero());
    }

    #[test]
    fn ignore_case_dedup_and_workaround() {
        let question = three_gaps(false, Comparator::IgnoreCase);
        let given = answers(&[(0, "x"), (1, "X")]);
        assert_eq!(
            compute_score_by_indices(&question, &given, &Workarounds::default()),
            dec("1")
        );
        let raw = Workarounds {
            identical_scoring_ignores_comparator: true,
            ..Workarounds::default()
        };
        assert_eq!(compute_score_by_indices(&question, &given, &raw), dec("3"));
    }

    #[test]
    fn unknown_indices_are_ignored() {
        let question = three_gaps(true, Comparator::CaseSensitive);
        let score =
            compute_score_by_indices(&question, &answers(&[(0, "x"), (9, "x")]), &Workarounds::default());
        assert_eq!(score, dec("1"));
    }

    #[test]
    fn matches_independent_gap_scores_with_identical_scoring() {
        let question = ClozeQuestion::new("q", "", {
            let mut config = mixed_config();
            config.identical_scoring = true;
            config
        });
        let given = answers(&[(0, "BERLIN"), (1, "blue"), (2, "3.15")]);
        let expected: Decimal = question
            .gaps()
            .iter()
            .map(|gap: &Gap| gap.get_score(&given[&gap.index()]))
            .sum();
        assert_eq!(
            compute_score_by_indices(&question, &given, &Workarounds::default()),
            expected
        );
        assert_eq!(expected, dec("4.25"));
    }

    #[test]
    fn by_export_name() {
        let question = three_gaps(false, Comparator::CaseSensitive);
        let named: BTreeMap<String, String> = [
            ("Gap 1".to_string(), "x".to_string()),
            ("Gap 3".to_string(), "y".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            compute_score(&question, &named, Locale::En, &Workarounds::default()).unwrap(),
            dec("1.5")
        );
        assert!(compute_score(&question, &named, Locale::De, &Workarounds::default()).is_err());
    }
}
