//! Writing a scoring configuration into the editor form.

use tracing::debug;

use clozecheck_core::model::{GapConfig, ScoredOptions};
use clozecheck_core::{ClozeError, ScoringConfig};

use crate::driver::{FormDriver, FormError};
use crate::fields;

/// Retries per gap after a transient [`FormError::NoSuchElement`].
pub const MAX_GAP_RETRIES: usize = 5;

/// Make the editor show `scoring`.
///
/// Gap kinds, sizes and numeric bounds are taken as they are; only flags,
/// option lists and points are written. Writing the same configuration
/// twice leaves the form unchanged the second time.
pub fn write_scoring(
    driver: &mut dyn FormDriver,
    scoring: &ScoringConfig,
) -> Result<(), ClozeError> {
    if driver.is_checked(fields::IDENTICAL_SCORING)? != scoring.identical_scoring {
        driver.click(fields::IDENTICAL_SCORING)?;
    }
    driver.select_option(fields::TEXTGAP_RATING, scoring.comparator.code())?;

    for (index, gap) in scoring.gaps.iter().enumerate() {
        let mut tries = 0;
        loop {
            let result = match gap {
                GapConfig::Text { options, .. } | GapConfig::Select { options } => {
                    update_gap_options(driver, index, options)
                }
                GapConfig::Numeric { score, .. } => {
                    driver.set_value(&fields::numeric_points(index), &score.to_string())
                }
            };
            match result {
                Ok(()) => break,
                Err(FormError::NoSuchElement(name)) if tries < MAX_GAP_RETRIES => {
                    tries += 1;
                    debug!(gap = index, tries, element = %name, "element missing, retrying gap");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn read_rows(driver: &dyn FormDriver, gap: usize) -> Result<Vec<String>, FormError> {
    let mut names = Vec::new();
    while driver.exists(&fields::option_answer(gap, names.len())) {
        names.push(driver.value(&fields::option_answer(gap, names.len()))?);
    }
    Ok(names)
}

/// One attempt at making a gap show `options`.
///
/// Starts from the rows currently on the form, so an attempt cut short by
/// a missing element is completed by the next one: blank rows left behind
/// by an earlier add are filled before new rows are created, and repeated
/// names are removed along with stale ones.
fn update_gap_options(
    driver: &mut dyn FormDriver,
    gap: usize,
    options: &ScoredOptions,
) -> Result<(), FormError> {
    let mut names = read_rows(driver, gap)?;

    // Add options, reusing blank rows first, then new rows at the end.
    for answer in options.answers() {
        if names.iter().any(|n| n == answer) {
            continue;
        }
        let row = match names.iter().position(|n| n.is_empty()) {
            Some(row) => row,
            None => {
                driver.click(&fields::add_button(gap, names.len().saturating_sub(1)))?;
                names.push(String::new());
                names.len() - 1
            }
        };
        let name = fields::option_answer(gap, row);
        driver.set_value(&name, answer)?;
        if driver.value(&name)? != answer {
            return Err(FormError::rejected(name, "failed to set gap option name"));
        }
        names[row] = answer.to_string();
    }

    // Remove options.
    let mut row = 0;
    while row < names.len() {
        let answer = &names[row];
        if answer.trim().is_empty() {
            return Err(FormError::rejected(
                fields::option_answer(gap, row),
                "illegal empty option name",
            ));
        }
        let repeated = names[..row].contains(answer);
        if options.contains(answer) && !repeated {
            row += 1;
        } else {
            driver.click(&fields::remove_button(gap, row))?;
            names.remove(row);
        }
    }

    // Set all points.
    for (row, answer) in names.iter().enumerate() {
        let score = options.get(answer).ok_or_else(|| {
            FormError::rejected(
                fields::option_answer(gap, row),
                format!("option '{answer}' vanished"),
            )
        })?;
        driver.set_value(&fields::option_points(gap, row), &score.to_string())?;
    }

    Ok(())
}
