//! Cloze gap models, answer generation and exact scoring.
//!
//! This crate defines the scoring data model, the per-gap models derived
//! from it, the randomized answer generator, the reference score
//! computation and the readjustment engine used in regression runs.

pub mod compute;
pub mod config;
pub mod context;
pub mod coverage;
pub mod error;
pub mod gap;
pub mod generator;
pub mod model;
pub mod numeric;
pub mod parser;
pub mod question;
pub mod readjust;
pub mod report;
pub mod retry;
pub mod rng;
pub mod session;
pub mod text;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ClozeError;
pub use model::{AnswerSet, ClozeItem, Comparator, GapConfig, GapKind, Locale, ScoringConfig};
pub use question::ClozeQuestion;
