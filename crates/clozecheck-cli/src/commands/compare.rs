//! The `clozecheck compare` command.

use std::path::PathBuf;

use anyhow::Result;

use clozecheck_core::report::SessionReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_mismatch: bool,
    format: String,
) -> Result<()> {
    let baseline = SessionReport::load_json(&baseline_path)?;
    let current = SessionReport::load_json(&current_path)?;

    if baseline.seed.is_none() || baseline.seed != current.seed {
        eprintln!("Warning: reports were not produced with the same seed; rounds are not expected to match.");
    }

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} mismatches, {} matched, {} new, {} missing",
                report.mismatches.len(),
                report.matched,
                report.new_rounds,
                report.missing_rounds
            );

            if !report.mismatches.is_empty() {
                println!("\nMismatches:");
                for m in &report.mismatches {
                    println!(
                        "  {} round {}: {} differs (score {} -> {})",
                        m.item_id, m.round, m.kind, m.baseline_score, m.current_score
                    );
                }
            }
        }
    }

    if fail_on_mismatch && report.has_mismatches() {
        std::process::exit(1);
    }

    Ok(())
}
