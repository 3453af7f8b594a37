//! Error types for cloze processing.
//!
//! Only two kinds of failure abort the processing of an item: an external
//! configuration that is structurally inconsistent, and a gap kind we do not
//! model. Scoring anomalies never surface here; they score zero.

use thiserror::Error;

/// Errors that abort processing of the current cloze item.
#[derive(Debug, Error)]
pub enum ClozeError {
    /// The external configuration is inconsistent or a write did not stick.
    #[error("interaction failed: {0}")]
    Interaction(String),

    /// A gap declares a kind that is not modelled.
    #[error("unsupported cloze gap type: {0}")]
    UnsupportedGapKind(String),

    /// A bounded rejection-sampling loop gave up.
    #[error("{what} did not succeed within {attempts} attempts")]
    RetryLimit { what: &'static str, attempts: usize },
}

impl ClozeError {
    /// Shorthand for an [`ClozeError::Interaction`] failure.
    pub fn interaction(message: impl Into<String>) -> Self {
        ClozeError::Interaction(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_limit_message() {
        let err = ClozeError::RetryLimit {
            what: "answer generation",
            attempts: 10,
        };
        assert_eq!(
            err.to_string(),
            "answer generation did not succeed within 10 attempts"
        );
    }

    #[test]
    fn interaction_message() {
        let err = ClozeError::interaction("duplicate option 'a'");
        assert_eq!(err.to_string(), "interaction failed: duplicate option 'a'");
    }
}
