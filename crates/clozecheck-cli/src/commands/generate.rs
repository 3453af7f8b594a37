//! The `clozecheck generate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use clozecheck_core::config::load_config_from;
use clozecheck_core::parser;
use clozecheck_core::report::SessionReport;
use clozecheck_core::session::{ClozeSession, SessionConfig};
use clozecheck_core::traits::{DiscardSink, NoopReporter};
use clozecheck_report::html::write_html_report;

pub fn execute(
    item_path: PathBuf,
    count: usize,
    seed: Option<u64>,
    output: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(count >= 1, "count must be at least 1");

    let mut config = load_config_from(config_path.as_deref())?;
    if seed.is_some() {
        config.seed = seed;
    }

    let items = parser::load_items(&item_path)?;
    anyhow::ensure!(!items.is_empty(), "no items found in {}", item_path.display());

    let mode = match config.seed {
        Some(seed) => format!("seed {seed}"),
        None => "random".to_string(),
    };
    eprintln!(
        "clozecheck v{}: generating {} answer sets for {} items ({mode})",
        env!("CARGO_PKG_VERSION"),
        count,
        items.len()
    );

    let mut session = ClozeSession::new(
        config.context(),
        SessionConfig {
            rounds: count,
            ..SessionConfig::default()
        },
    );
    let report = session.run(&items, &mut DiscardSink, &mut NoopReporter);

    print_summary(&report);

    // Save outputs
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    let mut table = Table::new();
    table.set_header(vec!["Item", "Rounds", "Expected total", "Maximum", "Attempts"]);

    for item in &report.items {
        let maximum = item
            .rounds
            .first()
            .map(|r| r.maximum_score.to_string())
            .unwrap_or_default();
        let attempts: usize = item.rounds.iter().map(|r| r.attempts).sum();
        table.add_row(vec![
            Cell::new(&item.item_id),
            Cell::new(item.rounds.len()),
            Cell::new(item.total_expected()),
            Cell::new(maximum),
            Cell::new(attempts),
        ]);
    }

    println!("{table}");
    println!(
        "Coverage: {}/{} cases ({:.1}%)",
        report.coverage.covered,
        report.coverage.declared,
        report.coverage.ratio() * 100.0
    );
}
