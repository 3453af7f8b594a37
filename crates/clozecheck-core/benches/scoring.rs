use std::str::FromStr;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use clozecheck_core::compute::compute_score_by_indices;
use clozecheck_core::config::Workarounds;
use clozecheck_core::context::Context;
use clozecheck_core::generator::generate_answer;
use clozecheck_core::model::{AnswerSet, Comparator, GapConfig, ScoredOptions, ScoringConfig};
use clozecheck_core::ClozeQuestion;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn options(n: usize) -> ScoredOptions {
    (0..n)
        .map(|i| (format!("Answer {i}"), Decimal::from(i as i64 % 4)))
        .collect()
}

fn make_question(gaps: usize, identical_scoring: bool) -> ClozeQuestion {
    let gaps = (0..gaps)
        .map(|i| match i % 3 {
            0 => GapConfig::Text {
                size: Some(20),
                options: options(8),
            },
            1 => GapConfig::Select { options: options(5) },
            _ => GapConfig::Numeric {
                value: dec("1.5"),
                lower: dec("1.00"),
                upper: dec("2.00"),
                score: dec("3"),
            },
        })
        .collect();
    ClozeQuestion::new(
        "bench",
        "Benchmark",
        ScoringConfig {
            identical_scoring,
            comparator: Comparator::IgnoreCase,
            gaps,
        },
    )
}

fn make_answers(gaps: usize) -> AnswerSet {
    (0..gaps)
        .map(|i| match i % 3 {
            2 => (i, "1.9999999999999999".to_string()),
            _ => (i, format!("ANSWER {}", i % 5)),
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_score");
    let workarounds = Workarounds::default();

    for (name, gaps) in [("3_gaps", 3), ("30_gaps", 30)] {
        let answers = make_answers(gaps);

        let question = make_question(gaps, true);
        group.bench_function(format!("{name}/identical"), |b| {
            b.iter(|| compute_score_by_indices(black_box(&question), black_box(&answers), &workarounds))
        });

        let question = make_question(gaps, false);
        group.bench_function(format!("{name}/dedup"), |b| {
            b.iter(|| compute_score_by_indices(black_box(&question), black_box(&answers), &workarounds))
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_answer");
    let question = make_question(9, false);

    group.bench_function("9_gaps", |b| {
        let mut ctx = Context::regression(7);
        b.iter(|| generate_answer(black_box(&question), &mut ctx))
    });

    group.finish();
}

criterion_group!(benches, bench_compute, bench_generate);
criterion_main!(benches);
