//! Harness configuration: sampling settings, workaround toggles and the
//! session seed.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::context::{Context, SessionMode};
use crate::model::Locale;

/// Named probabilities and sizes used by the answer generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Chance that a text gap enters (a mutation of) a configured option.
    pub cloze_text_enter_scored_p: f64,
    /// Chance that a random text answer is a number.
    pub cloze_text_enter_random_number_p: f64,
    /// Chance that a gap reuses an answer given to a gap of the same kind.
    pub cloze_previous_answer_p: f64,
    /// Chance that a numeric gap receives non-numeric text.
    pub invalid_answer_p: f64,
    /// Entry size used for text gaps without an explicit size limit.
    pub max_cloze_text_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cloze_text_enter_scored_p: 0.5,
            cloze_text_enter_random_number_p: 0.1,
            cloze_previous_answer_p: 0.25,
            invalid_answer_p: 0.1,
            max_cloze_text_length: 16,
        }
    }
}

/// Toggles adapting the generators and the scorer to quirks of the system
/// under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workarounds {
    /// Never enter non-numeric text into numeric gaps.
    pub disallow_invalid_answers: bool,
    /// Never submit an answer set where every gap is empty.
    pub disallow_empty_answers: bool,
    /// Detect duplicate answers by raw text even under `ignore_case`.
    pub identical_scoring_ignores_comparator: bool,
    pub disallow_dollar_in_cloze: bool,
    /// Keep `<` and `>` out of generated cloze text.
    pub disallow_clamps_in_cloze: bool,
    /// The system under test collapses inner whitespace runs.
    pub sloppy_whitespace: bool,
}

/// Top-level clozecheck configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Seed for a reproducible regression session; random mode when absent.
    pub seed: Option<u64>,
    pub locale: Locale,
    pub settings: Settings,
    pub workarounds: Workarounds,
}

impl HarnessConfig {
    pub fn session_mode(&self) -> SessionMode {
        match self.seed {
            Some(seed) => SessionMode::Regression { seed },
            None => SessionMode::Random,
        }
    }

    /// Build a fresh session context from this configuration.
    pub fn context(&self) -> Context {
        Context::new(
            self.session_mode(),
            self.settings.clone(),
            self.workarounds.clone(),
            self.locale,
        )
    }
}

/// Load config from an explicit path, or search the default locations:
/// `clozecheck.toml` in the current directory, then
/// `~/.config/clozecheck/config.toml`.
///
/// `CLOZECHECK_SEED` overrides the configured seed.
pub fn load_config_from(path: Option<&Path>) -> Result<HarnessConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("clozecheck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => HarnessConfig::default(),
    };

    if let Ok(seed) = std::env::var("CLOZECHECK_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("CLOZECHECK_SEED is not a number: '{seed}'"))?;
        config.seed = Some(seed);
    }

    validate_settings(&config.settings)?;
    Ok(config)
}

/// Parse a TOML configuration string.
pub fn parse_config_str(content: &str) -> Result<HarnessConfig> {
    let config: HarnessConfig = toml::from_str(content)?;
    Ok(config)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    let probabilities = [
        ("cloze_text_enter_scored_p", settings.cloze_text_enter_scored_p),
        (
            "cloze_text_enter_random_number_p",
            settings.cloze_text_enter_random_number_p,
        ),
        ("cloze_previous_answer_p", settings.cloze_previous_answer_p),
        ("invalid_answer_p", settings.invalid_answer_p),
    ];
    for (name, p) in probabilities {
        anyhow::ensure!(
            (0.0..=1.0).contains(&p),
            "{name} must be between 0.0 and 1.0, got {p}"
        );
    }
    anyhow::ensure!(
        settings.max_cloze_text_length >= 1,
        "max_cloze_text_length must be at least 1"
    );
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("clozecheck"))
}
