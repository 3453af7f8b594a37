//! The `clozecheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use clozecheck_core::parser;

pub fn execute(item_path: PathBuf) -> Result<()> {
    let items = if item_path.is_dir() {
        parser::load_item_directory(&item_path)?
    } else {
        vec![parser::parse_item(&item_path)?]
    };

    let mut total_warnings = 0;

    for item in &items {
        println!("Item: {} ({} gaps)", item.id, item.scoring.gaps.len());

        let warnings = parser::validate_item(item);
        for w in &warnings {
            println!("  WARNING: {w}");
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All items valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
