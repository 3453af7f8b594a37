//! The `clozecheck score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use clozecheck_core::compute::compute_score_by_indices;
use clozecheck_core::config::load_config_from;
use clozecheck_core::{parser, AnswerSet, ClozeQuestion};

pub fn execute(item_path: PathBuf, answers: Vec<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let item = parser::parse_item(&item_path)?;
    let question = ClozeQuestion::from_item(&item);
    let names = question.export_names(config.locale);

    let mut submitted = AnswerSet::new();
    for answer in &answers {
        let (key, value) = answer
            .split_once('=')
            .with_context(|| format!("answer '{answer}' is not of the form GAP=VALUE"))?;
        let index = match key.trim().parse::<usize>() {
            Ok(number) => {
                anyhow::ensure!(number >= 1, "gap numbers start at 1, got {number}");
                number - 1
            }
            Err(_) => *names
                .get(key.trim())
                .with_context(|| format!("no gap named '{}'", key.trim()))?,
        };
        anyhow::ensure!(
            question.gap(index).is_some(),
            "item {} has no gap {}",
            item.id,
            index + 1
        );
        anyhow::ensure!(
            submitted.insert(index, value.to_string()).is_none(),
            "gap {} answered twice",
            index + 1
        );
    }

    let score = compute_score_by_indices(&question, &submitted, &config.workarounds);

    println!("Item: {} ({})", item.id, item.title);

    let mut table = Table::new();
    table.set_header(vec!["Gap", "Kind", "Answer", "Valid", "Gap score"]);
    for (index, value) in &submitted {
        if let Some(gap) = question.gap(*index) {
            table.add_row(vec![
                Cell::new(gap.export_name(config.locale)),
                Cell::new(gap.kind()),
                Cell::new(format!("{value:?}")),
                Cell::new(if gap.is_valid_answer(value) { "yes" } else { "no" }),
                Cell::new(gap.get_score(value)),
            ]);
        }
    }
    println!("{table}");
    println!("Score: {} / {}", score, question.maximum_score());

    Ok(())
}
