//! Reading a scoring configuration out of the editor form.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use clozecheck_core::model::{Comparator, GapConfig, GapKind, ScoredOptions};
use clozecheck_core::numeric::parse_decimal;
use clozecheck_core::{ClozeError, ScoringConfig};

use crate::driver::FormDriver;
use crate::fields;

/// Read the full scoring configuration shown by the editor.
///
/// Gaps are read in order until no `clozetype_N` field is found. Text and
/// numeric gaps without a size of their own take the form-wide
/// `fixedTextLength`.
pub fn read_scoring(driver: &dyn FormDriver) -> Result<ScoringConfig, ClozeError> {
    let fixed_text_length = parse_size(
        fields::FIXED_TEXT_LENGTH,
        &driver.value(fields::FIXED_TEXT_LENGTH)?,
    )?;

    let mut gaps = Vec::new();
    while driver.exists(&fields::cloze_type(gaps.len())) {
        let index = gaps.len();
        let code = driver.value(&fields::cloze_type(index))?;
        let kind = GapKind::from_code(&code)?;

        let size = if kind == GapKind::Select {
            None
        } else {
            let name = fields::gap_size(index);
            parse_size(&name, &driver.value(&name)?)?.or(fixed_text_length)
        };

        let gap = match kind {
            GapKind::Text | GapKind::Select => {
                let options = read_options(driver, index)?;
                if options.is_empty() {
                    return Err(ClozeError::interaction(format!(
                        "did not find gap options ({index})"
                    )));
                }
                if kind == GapKind::Text {
                    GapConfig::Text { size, options }
                } else {
                    GapConfig::Select { options }
                }
            }
            GapKind::Numeric => GapConfig::Numeric {
                value: read_decimal(driver, &fields::numeric_value(index))?,
                lower: read_decimal(driver, &fields::numeric_lower(index))?,
                upper: read_decimal(driver, &fields::numeric_upper(index))?,
                score: read_decimal(driver, &fields::numeric_points(index))?,
            },
        };
        debug!(gap = index, %kind, "read gap");
        gaps.push(gap);
    }

    let identical_scoring = driver.is_checked(fields::IDENTICAL_SCORING)?;
    let comparator = driver
        .selected_option(fields::TEXTGAP_RATING)?
        .parse::<Comparator>()
        .map_err(|e| ClozeError::interaction(format!("{}: {e}", fields::TEXTGAP_RATING)))?;

    Ok(ScoringConfig {
        identical_scoring,
        comparator,
        gaps,
    })
}

fn read_options(driver: &dyn FormDriver, gap: usize) -> Result<ScoredOptions, ClozeError> {
    let mut options = ScoredOptions::new();
    let mut seen = HashSet::new();

    while driver.exists(&fields::option_answer(gap, options.len())) {
        let row = options.len();
        let answer = driver.value(&fields::option_answer(gap, row))?;
        let points = read_decimal(driver, &fields::option_points(gap, row))?;

        if !seen.insert(answer.trim().to_string()) {
            return Err(ClozeError::interaction(format!(
                "the gap has multiple identical options named '{answer}'"
            )));
        }
        options.insert(answer, points);
    }

    Ok(options)
}

fn read_decimal(driver: &dyn FormDriver, name: &str) -> Result<Decimal, ClozeError> {
    let text = driver.value(name)?;
    parse_decimal(&text)
        .ok_or_else(|| ClozeError::interaction(format!("{name}: '{text}' is not a number")))
}

fn parse_size(name: &str, text: &str) -> Result<Option<usize>, ClozeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| ClozeError::interaction(format!("{name}: '{text}' is not a gap size")))
}
