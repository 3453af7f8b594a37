//! Collaborator contracts.
//!
//! The configuration source and sink are implemented by the
//! `clozecheck-forms` crate, diff reporters by `clozecheck-report`.

use crate::error::ClozeError;
use crate::model::ScoringConfig;
use crate::readjust::ReadjustmentDiff;

// ---------------------------------------------------------------------------
// Configuration source / sink
// ---------------------------------------------------------------------------

/// Reads the scoring configuration of the item under test.
pub trait ScoringSource {
    /// Read the full configuration. Structural inconsistencies are
    /// [`ClozeError::Interaction`] failures.
    fn read_scoring(&mut self) -> Result<ScoringConfig, ClozeError>;
}

/// Writes a scoring configuration back to the item under test.
pub trait ScoringSink {
    /// Make the external state match `scoring` exactly. Writing the same
    /// configuration twice must leave the same state.
    fn write_scoring(&mut self, scoring: &ScoringConfig) -> Result<(), ClozeError>;
}

/// Sink that accepts and forgets every configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl ScoringSink for DiscardSink {
    fn write_scoring(&mut self, _: &ScoringConfig) -> Result<(), ClozeError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

/// Receives the before/after diff of each readjustment.
pub trait DiffReporter {
    fn report(&mut self, question: &str, diff: &ReadjustmentDiff);
}

/// No-op diff reporter.
pub struct NoopReporter;

impl DiffReporter for NoopReporter {
    fn report(&mut self, _: &str, _: &ReadjustmentDiff) {}
}

/// Keeps every reported diff in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub diffs: Vec<(String, ReadjustmentDiff)>,
}

impl DiffReporter for CollectingReporter {
    fn report(&mut self, question: &str, diff: &ReadjustmentDiff) {
        self.diffs.push((question.to_string(), diff.clone()));
    }
}
