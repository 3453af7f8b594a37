//! Session orchestrator.
//!
//! Plays a number of rounds against each cloze item: generate an answer
//! set, record its coverage and reference score, and in readjusting
//! sessions mutate the item's scoring, write it through the sink and hand
//! the diff to the reporter.

use tracing::{info, warn};

use crate::context::{Context, SessionMode};
use crate::coverage::{CoverageLedger, CoverageMode, CoverageTracker};
use crate::error::ClozeError;
use crate::generator::{generate_answer, generate_answer_bounded, GeneratedAnswer};
use crate::model::{AnswerSet, ClozeItem};
use crate::question::ClozeQuestion;
use crate::readjust::{readjust, readjust_bounded, Readjustment};
use crate::report::{CoverageSummary, ItemRun, RoundRecord, SessionReport};
use crate::rng::SessionRng;
use crate::traits::{DiffReporter, ScoringSink};

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Answer sets generated per item.
    pub rounds: usize,
    /// Readjust the scoring after every round.
    pub readjust: bool,
    /// Cap for every rejection-sampling loop; `None` retries forever.
    pub max_attempts: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            readjust: false,
            max_attempts: None,
        }
    }
}

/// Runs rounds against cloze items with one shared context.
pub struct ClozeSession {
    ctx: Context,
    config: SessionConfig,
    coverage: CoverageLedger,
}

impl ClozeSession {
    pub fn new(ctx: Context, config: SessionConfig) -> Self {
        Self {
            ctx,
            config,
            coverage: CoverageLedger::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn coverage(&self) -> &CoverageLedger {
        &self.coverage
    }

    /// Generate one answer set for `question`.
    pub fn generate(&mut self, question: &ClozeQuestion) -> Result<GeneratedAnswer, ClozeError> {
        match self.config.max_attempts {
            Some(limit) => generate_answer_bounded(question, &mut self.ctx, limit),
            None => Ok(generate_answer(question, &mut self.ctx)),
        }
    }

    /// Readjust `question`, write the new configuration through `sink` and
    /// report the diff.
    pub fn readjust(
        &mut self,
        question: &mut ClozeQuestion,
        submitted: &AnswerSet,
        sink: &mut dyn ScoringSink,
        reporter: &mut dyn DiffReporter,
    ) -> Result<Readjustment, ClozeError> {
        let readjustment = match self.config.max_attempts {
            Some(limit) => readjust_bounded(question, submitted, &mut self.ctx, limit)?,
            None => readjust(question, submitted, &mut self.ctx)?,
        };
        sink.write_scoring(&readjustment.new)?;
        reporter.report(question.id(), &readjustment.diff);
        Ok(readjustment)
    }

    /// Play all rounds against one item.
    pub fn run_item(
        &mut self,
        question: &mut ClozeQuestion,
        sink: &mut dyn ScoringSink,
        reporter: &mut dyn DiffReporter,
    ) -> Result<ItemRun, ClozeError> {
        if self.config.readjust && !matches!(self.ctx.mode, SessionMode::Regression { .. }) {
            warn!(
                question = question.id(),
                "readjusting in a random session; results will not be reproducible"
            );
        }

        question.initialize_coverage(&mut self.coverage, &self.ctx.settings);
        let initial_scoring = question.scoring().clone();
        let mut rounds = Vec::with_capacity(self.config.rounds);

        for round in 0..self.config.rounds {
            let generated = self.generate(question)?;
            self.record_coverage(question, &generated.answers);

            let maximum_score = question.maximum_score();
            let readjustment = if self.config.readjust {
                let result = self.readjust(question, &generated.answers, sink, reporter)?;
                Some(result.diff)
            } else {
                None
            };

            rounds.push(RoundRecord {
                round,
                answers: generated.answers,
                valid: generated.valid,
                expected_score: generated.expected_score,
                maximum_score,
                attempts: generated.attempts,
                readjustment,
            });
        }

        info!(
            question = question.id(),
            rounds = rounds.len(),
            "item finished"
        );

        Ok(ItemRun {
            item_id: question.id().to_string(),
            title: question.title().to_string(),
            initial_scoring,
            final_scoring: question.scoring().clone(),
            rounds,
        })
    }

    /// Play every item and collect a session report. An item that fails is
    /// logged and left out of the report.
    ///
    /// In regression sessions each item draws from its own stream of the
    /// session seed, keyed by its position, so the rounds of one item do
    /// not depend on how many rounds the items before it played.
    pub fn run(
        &mut self,
        items: &[ClozeItem],
        sink: &mut dyn ScoringSink,
        reporter: &mut dyn DiffReporter,
    ) -> SessionReport {
        let seed = match self.ctx.mode {
            SessionMode::Regression { seed } => Some(seed),
            SessionMode::Random => None,
        };
        let mut report = SessionReport::new(seed, self.ctx.locale);

        for (position, item) in items.iter().enumerate() {
            if let Some(seed) = seed {
                self.ctx.rng = SessionRng::seeded_stream(seed, position as u64);
            }
            let mut question = ClozeQuestion::from_item(item);
            match self.run_item(&mut question, sink, reporter) {
                Ok(run) => report.items.push(run),
                Err(e) => warn!(item = %item.id, error = %e, "item aborted"),
            }
        }

        report.coverage = self.coverage_summary();
        report
    }

    pub fn coverage_summary(&self) -> CoverageSummary {
        CoverageSummary {
            declared: self.coverage.declared_count(),
            covered: self.coverage.covered_count(),
            uncovered: self
                .coverage
                .uncovered()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    fn record_coverage(&mut self, question: &ClozeQuestion, answers: &AnswerSet) {
        let tracker: &mut dyn CoverageTracker = &mut self.coverage;
        for (index, value) in answers {
            if let Some(gap) = question.gap(*index) {
                gap.add_coverage(
                    question.id(),
                    CoverageMode::Verify,
                    tracker,
                    value,
                    &self.ctx.settings,
                );
            }
        }
    }
}
