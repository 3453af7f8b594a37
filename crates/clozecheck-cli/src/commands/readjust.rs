//! The `clozecheck readjust` command.
//!
//! Loads the item into an in-memory editor form, then plays readjusting
//! rounds against it: every new scoring goes through the form and every
//! diff is printed as a table.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use tracing::warn;

use clozecheck_core::config::load_config_from;
use clozecheck_core::parser::{self, validate_item};
use clozecheck_core::session::{ClozeSession, SessionConfig};
use clozecheck_core::traits::ScoringSource;
use clozecheck_core::ClozeQuestion;
use clozecheck_forms::{FormBinding, MemoryForm};
use clozecheck_report::TableReporter;

pub fn execute(
    item_path: PathBuf,
    rounds: usize,
    seed: Option<u64>,
    write: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(rounds >= 1, "rounds must be at least 1");

    let mut config = load_config_from(config_path.as_deref())?;
    if seed.is_some() {
        config.seed = seed;
    }

    let item = parser::parse_item(&item_path)?;
    for warning in validate_item(&item) {
        warn!(item = %item.id, "{warning}");
    }

    let mut form = FormBinding::new(MemoryForm::from_scoring(&item.scoring));
    let mut question = ClozeQuestion::new(&item.id, &item.title, form.read_scoring()?);
    let initial_maximum = question.maximum_score();

    let mut session = ClozeSession::new(
        config.context(),
        SessionConfig {
            rounds,
            readjust: true,
            max_attempts: None,
        },
    );
    let mut reporter = TableReporter::new(std::io::stderr());
    let run = session.run_item(&mut question, &mut form, &mut reporter)?;

    anyhow::ensure!(
        form.read_scoring()? == run.final_scoring,
        "the form does not show the readjusted scoring"
    );

    let mut table = Table::new();
    table.set_header(vec!["Round", "Answers", "Expected", "Maximum", "Changed"]);
    for round in &run.rounds {
        let answers = round
            .answers
            .iter()
            .map(|(gap, value)| format!("{}={value:?}", gap + 1))
            .collect::<Vec<_>>()
            .join(" ");
        let changed = round
            .readjustment
            .as_ref()
            .map_or(0, |diff| diff.changed_count());
        table.add_row(vec![
            Cell::new(round.round),
            Cell::new(answers),
            Cell::new(round.expected_score),
            Cell::new(round.maximum_score),
            Cell::new(changed),
        ]);
    }
    println!("{table}");
    println!(
        "Readjusted {} over {} rounds ({} writes), maximum score {} -> {}",
        item.id,
        run.rounds.len(),
        form.writes(),
        initial_maximum,
        question.maximum_score()
    );

    if let Some(path) = write {
        parser::write_item(&question.to_item(), &path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
