//! The `clozecheck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create clozecheck.toml
    if std::path::Path::new("clozecheck.toml").exists() {
        println!("clozecheck.toml already exists, skipping.");
    } else {
        std::fs::write("clozecheck.toml", SAMPLE_CONFIG)?;
        println!("Created clozecheck.toml");
    }

    // Create example item
    std::fs::create_dir_all("items")?;
    let example_path = std::path::Path::new("items/example.toml");
    if example_path.exists() {
        println!("items/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ITEM)?;
        println!("Created items/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: clozecheck validate --item items/example.toml");
    println!("  2. Run: clozecheck score --item items/example.toml --answer 1=Paris --answer 3=1.5");
    println!("  3. Run: clozecheck generate --item items --seed 42");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# clozecheck configuration

# Fixed seed for reproducible regression sessions. Remove for random mode.
seed = 42
locale = "en"

[settings]
cloze_text_enter_scored_p = 0.5
cloze_text_enter_random_number_p = 0.1
cloze_previous_answer_p = 0.25
invalid_answer_p = 0.1
max_cloze_text_length = 16

[workarounds]
disallow_invalid_answers = false
disallow_empty_answers = true
identical_scoring_ignores_comparator = false
disallow_dollar_in_cloze = false
disallow_clamps_in_cloze = false
sloppy_whitespace = false
"#;

const EXAMPLE_ITEM: &str = r#"[item]
id = "example"
title = "Capitals and constants"
identical_scoring = false
comparator = "ci"
fixed_text_length = 12

[[gaps]]
kind = "text"
options = [
    { answer = "Paris", score = "2" },
    { answer = "Lutetia", score = "0.5" },
]

[[gaps]]
kind = "select"
options = [
    { answer = "Seine", score = "1" },
    { answer = "Rhine", score = "0" },
]

[[gaps]]
kind = "numeric"
value = "1.5"
lower = "1.4"
upper = "1.6"
score = "1"
"#;
