//! TOML item file parser.
//!
//! Loads cloze items from TOML files and directories, writes them back, and
//! validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{ClozeItem, Comparator, GapConfig, ScoringConfig};

/// Intermediate TOML structure for item files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlItemFile {
    item: TomlItemHeader,
    #[serde(default)]
    gaps: Vec<GapConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlItemHeader {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    identical_scoring: bool,
    #[serde(default = "default_comparator")]
    comparator: Comparator,
    /// Size for text gaps that do not declare their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_text_length: Option<usize>,
}

fn default_comparator() -> Comparator {
    Comparator::CaseSensitive
}

/// Parse a single TOML item file.
pub fn parse_item(path: &Path) -> Result<ClozeItem> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item file: {}", path.display()))?;

    parse_item_str(&content, path)
}

/// Parse a TOML string into a `ClozeItem` (useful for testing).
pub fn parse_item_str(content: &str, source_path: &Path) -> Result<ClozeItem> {
    let parsed: TomlItemFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let fixed = parsed.item.fixed_text_length;
    let gaps = parsed
        .gaps
        .into_iter()
        .map(|gap| match gap {
            GapConfig::Text { size: None, options } => GapConfig::Text {
                size: fixed,
                options,
            },
            other => other,
        })
        .collect();

    Ok(ClozeItem {
        id: parsed.item.id,
        title: parsed.item.title,
        scoring: ScoringConfig {
            identical_scoring: parsed.item.identical_scoring,
            comparator: parsed.item.comparator,
            gaps,
        },
    })
}

/// Serialize an item to the TOML item format.
pub fn item_to_toml(item: &ClozeItem) -> Result<String> {
    let file = TomlItemFile {
        item: TomlItemHeader {
            id: item.id.clone(),
            title: item.title.clone(),
            identical_scoring: item.scoring.identical_scoring,
            comparator: item.scoring.comparator,
            fixed_text_length: None,
        },
        gaps: item.scoring.gaps.clone(),
    };
    toml::to_string_pretty(&file).context("failed to serialize item")
}

/// Write an item file, creating parent directories as needed.
pub fn write_item(item: &ClozeItem, path: &Path) -> Result<()> {
    let content = item_to_toml(item)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write item to {}", path.display()))?;
    Ok(())
}

/// Recursively load all `.toml` item files from a directory.
pub fn load_item_directory(dir: &Path) -> Result<Vec<ClozeItem>> {
    let mut items = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            items.extend(load_item_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_item(&path) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(items)
}

/// Load a single item file, or every item below a directory.
pub fn load_items(path: &Path) -> Result<Vec<ClozeItem>> {
    if path.is_dir() {
        load_item_directory(path)
    } else {
        Ok(vec![parse_item(path)?])
    }
}

/// A warning from item validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The gap index (if applicable).
    pub gap: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.gap {
            Some(gap) => write!(f, "gap {}: {}", gap + 1, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Validate an item for configurations the exam engine would reject or that
/// can never award points.
pub fn validate_item(item: &ClozeItem) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |gap: Option<usize>, message: String| {
        warnings.push(ValidationWarning { gap, message });
    };

    if item.scoring.gaps.is_empty() {
        warn(None, "item has no gaps".into());
    }

    for (index, gap) in item.scoring.gaps.iter().enumerate() {
        let at = Some(index);
        match gap {
            GapConfig::Numeric {
                value,
                lower,
                upper,
                score,
            } => {
                if lower > upper {
                    warn(at, format!("lower bound {lower} exceeds upper bound {upper}"));
                } else if value < lower || value > upper {
                    warn(at, format!("value {value} lies outside [{lower}, {upper}]"));
                }
                if *score <= Decimal::ZERO {
                    warn(at, format!("numeric score {score} awards nothing"));
                }
            }
            GapConfig::Text { options, .. } | GapConfig::Select { options } => {
                // Check for empty option lists
                if options.is_empty() {
                    warn(at, "gap has no options".into());
                    continue;
                }

                // Check for options that are all worthless
                if !options.any_positive() {
                    warn(at, "all options score zero".into());
                }

                // Check for negative scores
                for (answer, score) in options.iter() {
                    if score < Decimal::ZERO {
                        warn(at, format!("option '{answer}' has negative score {score}"));
                    }
                }

                // Check for duplicate names after trimming
                let mut seen = HashSet::new();
                for answer in options.answers() {
                    if answer.trim().is_empty() {
                        warn(at, "empty option name".into());
                    } else if !seen.insert(answer.trim()) {
                        warn(at, format!("duplicate option name '{}'", answer.trim()));
                    }
                }

                // Check for options that do not fit into the gap
                if let GapConfig::Text {
                    size: Some(size), ..
                } = gap
                {
                    for answer in options.answers() {
                        if answer.chars().count() > *size {
                            warn(at, format!("option '{answer}' is longer than gap size {size}"));
                        }
                    }
                }
            }
        }
    }

    warnings
}
