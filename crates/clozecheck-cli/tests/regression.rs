//! Regression detection integration tests.
//!
//! Tests the report comparison workflow end-to-end, including JSON
//! serialization, report loading, and replay mismatch detection.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use clozecheck_core::context::Context;
use clozecheck_core::parser;
use clozecheck_core::report::{MismatchKind, SessionReport};
use clozecheck_core::session::{ClozeSession, SessionConfig};
use clozecheck_core::traits::{DiscardSink, NoopReporter};

fn run_session(seed: u64, rounds: usize, readjust: bool) -> SessionReport {
    let items = parser::load_items(Path::new("../../items")).unwrap();
    let mut session = ClozeSession::new(
        Context::regression(seed),
        SessionConfig {
            rounds,
            readjust,
            max_attempts: Some(10_000),
        },
    );
    session.run(&items, &mut DiscardSink, &mut NoopReporter)
}

#[test]
fn identical_seeds_replay_identically() {
    let baseline = run_session(42, 6, true);
    let current = run_session(42, 6, true);

    let report = current.compare(&baseline);

    assert!(!report.has_mismatches());
    assert_eq!(report.matched, 12);
    assert_eq!(report.new_rounds, 0);
    assert_eq!(report.missing_rounds, 0);
}

#[test]
fn detect_score_mismatch() {
    let baseline = run_session(5, 3, false);
    let mut current = baseline.clone();
    let round = &mut current.items[0].rounds[1];
    round.expected_score += Decimal::from_str("0.25").unwrap();

    let report = current.compare(&baseline);

    assert!(report.has_mismatches());
    assert_eq!(report.mismatches.len(), 1);
    let mismatch = &report.mismatches[0];
    assert_eq!(mismatch.item_id, "capitals");
    assert_eq!(mismatch.round, 1);
    assert_eq!(mismatch.kind, MismatchKind::Score);
    assert_eq!(
        mismatch.current_score - mismatch.baseline_score,
        Decimal::from_str("0.25").unwrap()
    );
}

#[test]
fn detect_answer_mismatch_before_score() {
    let baseline = run_session(5, 2, false);
    let mut current = baseline.clone();
    let round = &mut current.items[1].rounds[0];
    round.answers.insert(0, "not what was sent".into());
    round.expected_score = Decimal::ZERO;

    let report = current.compare(&baseline);

    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].kind, MismatchKind::Answers);
}

#[test]
fn detect_new_and_missing_rounds() {
    let baseline = run_session(9, 4, false);
    let current = run_session(9, 5, false);

    let report = current.compare(&baseline);
    assert_eq!(report.new_rounds, 2);
    assert_eq!(report.missing_rounds, 0);
    assert_eq!(report.matched, 8);

    let report = baseline.compare(&current);
    assert_eq!(report.new_rounds, 0);
    assert_eq!(report.missing_rounds, 2);
}

#[test]
fn json_roundtrip_preserves_data() {
    let report = run_session(13, 3, true);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    report.save_json(&path).unwrap();
    let loaded = SessionReport::load_json(&path).unwrap();

    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.seed, Some(13));
    assert_eq!(loaded.items.len(), 2);
    assert_eq!(loaded.items[0].item_id, "capitals");
    assert_eq!(loaded.items[0].final_scoring, report.items[0].final_scoring);
    assert_eq!(loaded.coverage.declared, report.coverage.declared);
    assert!(!loaded.compare(&report).has_mismatches());
}

#[test]
fn markdown_report_format() {
    let baseline = run_session(21, 2, false);
    let mut current = baseline.clone();
    current.items[1].rounds[0].expected_score = Decimal::from(100);

    let md = current.compare(&baseline).to_markdown();

    assert!(md.contains("Mismatches"));
    assert!(md.contains("| constants | 0 | score |"));
    assert!(md.contains("1 mismatches"));
}
