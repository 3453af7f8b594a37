//! Runtime gap models.
//!
//! A [`Gap`] is derived from a `(ScoringConfig, index)` pair and never
//! modified afterwards; a new configuration means new gaps.

use rand::seq::IndexedRandom;
use rand::Rng;
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::context::Context;
use crate::coverage::{self, CoverageMode, CoverageTracker};
use crate::model::{casefold, Comparator, GapConfig, GapKind, Locale, ScoredOptions, ScoringConfig};
use crate::numeric::{format_numeric, looks_numeric, parse_decimal, round_significant};
use crate::text::{max_entry_size, mutate_text};

/// Length of the non-numeric text entered to probe numeric gaps.
const INVALID_NUMERIC_TEXT_LENGTH: usize = 20;

/// Free text gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGap {
    index: usize,
    comparator: Comparator,
    size: Option<usize>,
    options: ScoredOptions,
}

impl TextGap {
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// Number of characters generators write into this gap.
    pub fn entry_size(&self, settings: &Settings) -> usize {
        max_entry_size(self.size, settings)
    }

    pub fn is_valid_answer(&self, value: &str) -> bool {
        match self.size {
            Some(size) => value.chars().count() <= size,
            None => true,
        }
    }

    pub fn get_score(&self, text: &str) -> Decimal {
        match self.comparator {
            Comparator::CaseSensitive => self.options.get(text).unwrap_or(Decimal::ZERO),
            Comparator::IgnoreCase => {
                let folded = casefold(text);
                self.options
                    .iter()
                    .filter(|(option, _)| casefold(option) == folded)
                    .map(|(_, score)| score)
                    .fold(Decimal::ZERO, Decimal::max)
            }
        }
    }

    pub fn get_random_choice(&self, ctx: &mut Context) -> (String, Decimal) {
        let pick_scored = ctx.chance(ctx.settings.cloze_text_enter_scored_p) && !ctx.prefer_text();
        if pick_scored {
            let picked = self
                .options
                .answers()
                .collect::<Vec<_>>()
                .choose(&mut ctx.rng)
                .map(|s| s.to_string());
            if let Some(option) = picked {
                let text = mutate_text(&option, self.size, ctx);
                let score = self.get_score(&text);
                return (text, score);
            }
        }

        let text = if ctx.chance(ctx.settings.cloze_text_enter_random_number_p) {
            let digits = ctx.rng.random_range(0..=2usize);
            format!("{:.digits$}", ctx.rng.random::<f64>() * 1000.0)
        } else {
            let size = self.entry_size(&ctx.settings);
            ctx.produce_text(size)
        };
        let score = self.get_score(&text);
        (text, score)
    }
}

/// Gap with a closed list of choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectGap {
    index: usize,
    options: ScoredOptions,
}

impl SelectGap {
    pub fn is_valid_answer(&self, value: &str) -> bool {
        self.options.contains(value)
    }

    pub fn get_score(&self, text: &str) -> Decimal {
        self.options.get(text).unwrap_or(Decimal::ZERO)
    }

    /// A uniformly chosen option; select controls accept nothing else.
    pub fn get_random_choice(&self, ctx: &mut Context) -> (String, Decimal) {
        let options: Vec<(&str, Decimal)> = self.options.iter().collect();
        match options.choose(&mut ctx.rng) {
            Some((answer, score)) => (answer.to_string(), *score),
            None => (String::new(), Decimal::ZERO),
        }
    }
}

/// Gap scored by an inclusive numeric interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericGap {
    index: usize,
    value: Decimal,
    lower: Decimal,
    upper: Decimal,
    score: Decimal,
}

impl NumericGap {
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn lower(&self) -> Decimal {
        self.lower
    }

    pub fn upper(&self) -> Decimal {
        self.upper
    }

    /// Empty and number-like text is valid; everything else is not.
    pub fn is_valid_answer(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || looks_numeric(trimmed)
    }

    pub fn get_score(&self, text: &str) -> Decimal {
        match parse_decimal(text).map(round_significant) {
            Some(n) if self.lower <= n && n <= self.upper => self.score,
            _ => Decimal::ZERO,
        }
    }

    pub fn get_random_choice(&self, ctx: &mut Context) -> (String, Decimal) {
        if !ctx.workarounds.disallow_invalid_answers && ctx.chance(ctx.settings.invalid_answer_p) {
            let text = ctx.produce_non_numeric_text(INVALID_NUMERIC_TEXT_LENGTH);
            let score = self.get_score(&text);
            return (text, score);
        }

        let n = match ctx.rng.random_range(0..4u8) {
            0 => self.lower,
            1 => self.upper,
            2 => self.random_inside(ctx),
            _ => self.random_outside(ctx),
        };
        let text = format_numeric(n);
        let score = self.get_score(&text);
        (text, score)
    }

    fn width(&self) -> Decimal {
        self.upper
            .checked_sub(self.lower)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }

    fn random_inside(&self, ctx: &mut Context) -> Decimal {
        let u = unit_decimal(ctx);
        self.width()
            .checked_mul(u)
            .and_then(|d| self.lower.checked_add(d))
            .unwrap_or(self.lower)
    }

    /// A value beyond either bound by an offset that still shows after
    /// rounding to 16 significant digits.
    fn random_outside(&self, ctx: &mut Context) -> Decimal {
        let magnitude = self.lower.abs().max(self.upper.abs()).max(Decimal::ONE);
        let min_off = magnitude
            .checked_mul(Decimal::new(1, 14))
            .unwrap_or(Decimal::ONE);
        let max_off = self
            .width()
            .max(min_off)
            .checked_mul(Decimal::new(100_000_000_000_000, 0))
            .unwrap_or(min_off);
        let u = unit_decimal(ctx);
        let off = (max_off - min_off)
            .checked_mul(u)
            .and_then(|d| min_off.checked_add(d))
            .unwrap_or(min_off);

        if ctx.rng.random_bool(0.5) {
            self.lower.checked_sub(off).unwrap_or(Decimal::MIN)
        } else {
            self.upper.checked_add(off).unwrap_or(Decimal::MAX)
        }
    }
}

/// Uniform value in `[0, 1)` with 12 decimal places.
fn unit_decimal(ctx: &mut Context) -> Decimal {
    Decimal::new(ctx.rng.random_range(0..1_000_000_000_000i64), 12)
}

/// A gap of a cloze question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gap {
    Text(TextGap),
    Select(SelectGap),
    Numeric(NumericGap),
}

impl Gap {
    /// Build the gap at `index` of `scoring`.
    pub fn new(scoring: &ScoringConfig, index: usize, config: &GapConfig) -> Self {
        match config {
            GapConfig::Text { size, options } => Gap::Text(TextGap {
                index,
                comparator: scoring.comparator,
                size: *size,
                options: options.clone(),
            }),
            GapConfig::Select { options } => Gap::Select(SelectGap {
                index,
                options: options.clone(),
            }),
            GapConfig::Numeric {
                value,
                lower,
                upper,
                score,
            } => Gap::Numeric(NumericGap {
                index,
                value: *value,
                lower: *lower,
                upper: *upper,
                score: *score,
            }),
        }
    }

    /// All gaps of `scoring`, addressed by position.
    pub fn build_all(scoring: &ScoringConfig) -> Vec<Gap> {
        scoring
            .gaps
            .iter()
            .enumerate()
            .map(|(index, config)| Gap::new(scoring, index, config))
            .collect()
    }

    pub fn index(&self) -> usize {
        match self {
            Gap::Text(g) => g.index,
            Gap::Select(g) => g.index,
            Gap::Numeric(g) => g.index,
        }
    }

    pub fn kind(&self) -> GapKind {
        match self {
            Gap::Text(_) => GapKind::Text,
            Gap::Select(_) => GapKind::Select,
            Gap::Numeric(_) => GapKind::Numeric,
        }
    }

    pub fn maximum_score(&self) -> Decimal {
        match self {
            Gap::Text(g) => g.options.max_score(),
            Gap::Select(g) => g.options.max_score(),
            Gap::Numeric(g) => g.score,
        }
    }

    pub fn is_valid_answer(&self, value: &str) -> bool {
        match self {
            Gap::Text(g) => g.is_valid_answer(value),
            Gap::Select(g) => g.is_valid_answer(value),
            Gap::Numeric(g) => g.is_valid_answer(value),
        }
    }

    pub fn get_score(&self, text: &str) -> Decimal {
        match self {
            Gap::Text(g) => g.get_score(text),
            Gap::Select(g) => g.get_score(text),
            Gap::Numeric(g) => g.get_score(text),
        }
    }

    pub fn get_random_choice(&self, ctx: &mut Context) -> (String, Decimal) {
        match self {
            Gap::Text(g) => g.get_random_choice(ctx),
            Gap::Select(g) => g.get_random_choice(ctx),
            Gap::Numeric(g) => g.get_random_choice(ctx),
        }
    }

    /// Options and their scores; a numeric gap reports its reference value.
    pub fn scored_options(&self) -> ScoredOptions {
        match self {
            Gap::Text(g) => g.options.clone(),
            Gap::Select(g) => g.options.clone(),
            Gap::Numeric(g) => [(g.value.to_string(), g.score)].into_iter().collect(),
        }
    }

    /// The gap's column name in result exports, e.g. `Gap 1` or `Lücke 1`.
    pub fn export_name(&self, locale: Locale) -> String {
        format!("{} {}", locale.gap_label(), self.index() + 1)
    }

    /// Declare the cases this gap should exercise.
    pub fn initialize_coverage(
        &self,
        question: &str,
        tracker: &mut dyn CoverageTracker,
        settings: &Settings,
    ) {
        let index = self.index();
        for mode in CoverageMode::ALL {
            match self {
                Gap::Text(g) => {
                    for case in coverage::text_cases(g.entry_size(settings)) {
                        tracker.add_case(question, index, mode, case);
                    }
                    for solution in g.options.answers() {
                        tracker.add_case(
                            question,
                            index,
                            mode,
                            vec!["solution".to_string(), solution.to_string()],
                        );
                    }
                }
                Gap::Select(g) => {
                    for option in g.options.answers() {
                        tracker.add_case(question, index, mode, vec![option.to_string()]);
                    }
                }
                Gap::Numeric(g) => {
                    for n in [g.value, g.lower, g.upper] {
                        tracker.add_case(question, index, mode, vec![n.to_string()]);
                    }
                }
            }
        }
    }

    /// Report the cases `value` hits on `channel`.
    pub fn add_coverage(
        &self,
        question: &str,
        channel: CoverageMode,
        tracker: &mut dyn CoverageTracker,
        value: &str,
        settings: &Settings,
    ) {
        let index = self.index();
        match self {
            Gap::Text(g) => {
                for case in coverage::text_cases_occurred(value, g.entry_size(settings)) {
                    tracker.case_occurred(question, index, channel, case);
                }
                if g.options.contains(value) {
                    tracker.case_occurred(
                        question,
                        index,
                        channel,
                        vec!["solution".to_string(), value.to_string()],
                    );
                }
            }
            Gap::Select(_) => {
                tracker.case_occurred(question, index, channel, vec![value.to_string()]);
            }
            Gap::Numeric(g) => {
                let known = [g.value, g.lower, g.upper].map(|n| n.to_string());
                if known.iter().any(|k| k == value) {
                    tracker.case_occurred(question, index, channel, vec![value.to_string()]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workarounds;
    use crate::context::SessionMode;
    use crate::coverage::CoverageLedger;
    use crate::test_utils::*;

    fn only_gap(config: &ScoringConfig) -> Gap {
        Gap::build_all(config).remove(0)
    }

    #[test]
    fn paris_ignore_case_and_case_sensitive() {
        let gap = only_gap(&paris_config(Comparator::IgnoreCase));
        assert_eq!(gap.get_score("PARIS"), dec("4"));
        assert_eq!(gap.get_score("paris"), dec("4"));

        let gap = only_gap(&paris_config(Comparator::CaseSensitive));
        assert_eq!(gap.get_score("PARIS"), dec("0"));
        assert_eq!(gap.get_score("Paris"), dec("4"));
    }

    #[test]
    fn ignore_case_takes_max_over_folded_duplicates() {
        let mut config = paris_config(Comparator::IgnoreCase);
        config.gaps[0] = text_gap(None, &[("Rome", "1"), ("ROME", "2.5"), ("rome", "0.5")]);
        let gap = only_gap(&config);
        assert_eq!(gap.get_score("rOmE"), dec("2.5"));
        assert_eq!(gap.maximum_score(), dec("2.5"));
    }

    #[test]
    fn configured_options_score_their_value() {
        let config = mixed_config();
        for (gap, gap_config) in Gap::build_all(&config).iter().zip(&config.gaps) {
            if let Some(options) = gap_config.options() {
                for (answer, score) in options.iter() {
                    assert_eq!(gap.get_score(answer), score, "{answer}");
                }
            }
        }
    }

    #[test]
    fn text_validity_follows_size() {
        let gap = only_gap(&paris_config(Comparator::IgnoreCase));
        assert!(gap.is_valid_answer("0123456789"));
        assert!(!gap.is_valid_answer("0123456789a"));
        assert!(gap.is_valid_answer("äöüäöüäöüä"));

        let mut config = paris_config(Comparator::IgnoreCase);
        config.gaps[0] = text_gap(None, &[("x", "1")]);
        assert!(only_gap(&config).is_valid_answer(&"y".repeat(500)));
    }

    #[test]
    fn numeric_bounds_and_rounding() {
        let gap = only_gap(&numeric_config());
        assert_eq!(gap.get_score("1.00"), dec("3"));
        assert_eq!(gap.get_score("2"), dec("3"));
        assert_eq!(gap.get_score(" 1.5 "), dec("3"));
        assert_eq!(gap.get_score("2.0000000000000001"), dec("3"));
        assert_eq!(gap.get_score("0.99999999999999999"), dec("3"));
        assert_eq!(gap.get_score("1.9999999"), dec("3"));
        assert_eq!(gap.get_score("2.000000000000001"), dec("0"));
        assert_eq!(gap.get_score("0.999999999999999"), dec("0"));
        assert_eq!(gap.get_score("abc"), dec("0"));
        assert_eq!(gap.get_score("inf"), dec("0"));
        assert_eq!(gap.get_score(""), dec("0"));
    }

    #[test]
    fn numeric_validity() {
        let gap = only_gap(&numeric_config());
        assert!(gap.is_valid_answer(""));
        assert!(gap.is_valid_answer("  "));
        assert!(gap.is_valid_answer("1e5"));
        assert!(gap.is_valid_answer("-inf"));
        assert!(!gap.is_valid_answer("abc"));
    }

    #[test]
    fn select_random_choice_is_always_an_option() {
        let config = mixed_config();
        let gap = Gap::build_all(&config).remove(1);
        let mut ctx = regression_context(17);
        for _ in 0..100 {
            let (answer, score) = gap.get_random_choice(&mut ctx);
            assert!(gap.is_valid_answer(&answer));
            assert_eq!(gap.get_score(&answer), score);
        }
    }

    #[test]
    fn numeric_random_choices_hit_inside_and_outside() {
        let gap = only_gap(&numeric_config());
        let mut ctx = Context::new(
            SessionMode::Regression { seed: 5 },
            Settings::default(),
            Workarounds {
                disallow_invalid_answers: true,
                ..Workarounds::default()
            },
            Locale::En,
        );
        let (mut inside, mut outside) = (0, 0);
        for _ in 0..400 {
            let (text, score) = gap.get_random_choice(&mut ctx);
            assert!(gap.is_valid_answer(&text), "{text:?}");
            assert_eq!(gap.get_score(&text), score);
            if score.is_zero() {
                outside += 1;
            } else {
                inside += 1;
            }
        }
        assert!(inside > 200, "inside {inside}");
        assert!(outside > 50, "outside {outside}");
    }

    #[test]
    fn numeric_outside_values_survive_rounding_for_narrow_intervals() {
        let config = ScoringConfig {
            identical_scoring: true,
            comparator: Comparator::CaseSensitive,
            gaps: vec![numeric_gap("7", "7", "7", "1")],
        };
        let Gap::Numeric(gap) = only_gap(&config) else {
            panic!("expected a numeric gap");
        };
        let mut ctx = regression_context(9);
        for _ in 0..200 {
            let n = gap.random_outside(&mut ctx);
            assert_eq!(gap.get_score(&format_numeric(n)), dec("0"), "{n}");
        }
    }

    #[test]
    fn numeric_invalid_answers_unless_disallowed() {
        let gap = only_gap(&numeric_config());
        let mut settings = Settings::default();
        settings.invalid_answer_p = 1.0;
        let mut ctx = Context::new(
            SessionMode::Regression { seed: 2 },
            settings,
            Workarounds::default(),
            Locale::En,
        );
        let (text, score) = gap.get_random_choice(&mut ctx);
        assert!(!gap.is_valid_answer(&text));
        assert_eq!(text.chars().count(), 20);
        assert!(score.is_zero());
    }

    #[test]
    fn text_random_choice_respects_entry_size() {
        let gap = only_gap(&paris_config(Comparator::IgnoreCase));
        let mut ctx = regression_context(12);
        for _ in 0..200 {
            let (text, score) = gap.get_random_choice(&mut ctx);
            assert_eq!(gap.get_score(&text), score);
            assert!(text.chars().count() <= 10, "{text:?}");
        }
    }

    #[test]
    fn export_names_follow_locale() {
        let gaps = Gap::build_all(&mixed_config());
        assert_eq!(gaps[0].export_name(Locale::En), "Gap 1");
        assert_eq!(gaps[2].export_name(Locale::De), "Lücke 3");
        for (i, gap) in gaps.iter().enumerate() {
            assert_eq!(gap.index(), i);
        }
        assert_eq!(gaps[2].scored_options().get("3.14"), Some(dec("2")));
    }

    #[test]
    fn coverage_declarations_and_hits() {
        let gaps = Gap::build_all(&mixed_config());
        let settings = Settings::default();
        let mut ledger = CoverageLedger::new();
        for gap in &gaps {
            gap.initialize_coverage("q", &mut ledger, &settings);
        }
        // text: 4 shapes + 2 solutions, select: 3, numeric: 3; per mode
        assert_eq!(ledger.declared_count(), 2 * (6 + 3 + 3));

        gaps[0].add_coverage("q", CoverageMode::Verify, &mut ledger, "berlin", &settings);
        gaps[1].add_coverage("q", CoverageMode::Export, &mut ledger, "blue", &settings);
        gaps[2].add_coverage("q", CoverageMode::Verify, &mut ledger, "3.2", &settings);
        gaps[2].add_coverage("q", CoverageMode::Verify, &mut ledger, "3.15", &settings);
        assert_eq!(ledger.covered_count(), 3);
    }
}
