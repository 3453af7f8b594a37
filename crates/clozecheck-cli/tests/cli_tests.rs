//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clozecheck() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("clozecheck").unwrap()
}

#[test]
fn validate_valid_item() {
    clozecheck()
        .arg("validate")
        .arg("--item")
        .arg("../../items/capitals.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("capitals (3 gaps)"))
        .stdout(predicate::str::contains("All items valid"));
}

#[test]
fn validate_directory() {
    clozecheck()
        .arg("validate")
        .arg("--item")
        .arg("../../items")
        .assert()
        .success()
        .stdout(predicate::str::contains("capitals"))
        .stdout(predicate::str::contains("constants"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.toml");
    std::fs::write(
        &path,
        r#"
[item]
id = "odd"

[[gaps]]
kind = "numeric"
value = "3"
lower = "2"
upper = "1"
score = "1"
"#,
    )
    .unwrap();

    clozecheck()
        .arg("validate")
        .arg("--item")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: gap 1: lower bound 2 exceeds upper bound 1"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    clozecheck()
        .arg("validate")
        .arg("--item")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_full_marks() {
    clozecheck()
        .arg("score")
        .arg("--item")
        .arg("../../items/capitals.toml")
        .arg("--answer")
        .arg("1=Paris")
        .arg("--answer")
        .arg("2=BERLIN")
        .arg("--answer")
        .arg("3=Seine")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 7 / 7"));
}

#[test]
fn score_by_export_name() {
    clozecheck()
        .arg("score")
        .arg("--item")
        .arg("../../items/constants.toml")
        .arg("--answer")
        .arg("Gap 1=1.9999999")
        .arg("--answer")
        .arg("Gap 3=G")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3 / 5.5"));
}

#[test]
fn score_rounds_to_sixteen_digits() {
    clozecheck()
        .arg("score")
        .arg("--item")
        .arg("../../items/constants.toml")
        .arg("--answer")
        .arg("1=2.0000000000000001")
        .arg("--answer")
        .arg("2=9.81")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 4.5 / 5.5"));
}

#[test]
fn score_rejects_unknown_gap() {
    clozecheck()
        .arg("score")
        .arg("--item")
        .arg("../../items/capitals.toml")
        .arg("--answer")
        .arg("9=Paris")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no gap 9"));

    clozecheck()
        .arg("score")
        .arg("--item")
        .arg("../../items/capitals.toml")
        .arg("--answer")
        .arg("Paris")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GAP=VALUE"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    clozecheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created clozecheck.toml"))
        .stdout(predicate::str::contains("Created items/example.toml"));

    assert!(dir.path().join("clozecheck.toml").exists());
    assert!(dir.path().join("items/example.toml").exists());

    // The example item is valid and scores as advertised
    clozecheck()
        .current_dir(dir.path())
        .arg("score")
        .arg("--item")
        .arg("items/example.toml")
        .arg("--answer")
        .arg("1=Paris")
        .arg("--answer")
        .arg("3=1.5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3 / 4"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    clozecheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    clozecheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn compare_nonexistent_report() {
    clozecheck()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn help_output() {
    clozecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloze question scoring oracle"));
}

#[test]
fn version_output() {
    clozecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clozecheck"));
}
