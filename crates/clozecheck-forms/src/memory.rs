//! In-memory cloze editor, for testing and for file-backed CLI runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use clozecheck_core::model::{Comparator, GapConfig, ScoredOptions};
use clozecheck_core::ScoringConfig;

use crate::driver::{FormDriver, FormError};
use crate::fields::{self, OptionButton};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectBox {
    choices: Vec<String>,
    selected: String,
}

/// An editor form held in memory.
///
/// Behaves like the exam engine's cloze editor: option rows are addressed
/// by position, `add_gap_N_K` inserts an empty row after row `K` and
/// `remove_gap_N_K` deletes row `K`, shifting the rows behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryForm {
    values: BTreeMap<String, String>,
    checkboxes: BTreeMap<String, bool>,
    selects: BTreeMap<String, SelectBox>,
    clicks: usize,
}

impl Default for MemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryForm {
    /// An editor without gaps.
    pub fn new() -> Self {
        let mut form = Self {
            values: BTreeMap::new(),
            checkboxes: BTreeMap::new(),
            selects: BTreeMap::new(),
            clicks: 0,
        };
        form.values
            .insert(fields::FIXED_TEXT_LENGTH.to_string(), String::new());
        form.checkboxes
            .insert(fields::IDENTICAL_SCORING.to_string(), false);
        form.selects.insert(
            fields::TEXTGAP_RATING.to_string(),
            SelectBox {
                choices: [Comparator::CaseSensitive, Comparator::IgnoreCase]
                    .iter()
                    .map(|c| c.code().to_string())
                    .collect(),
                selected: Comparator::CaseSensitive.code().to_string(),
            },
        );
        form
    }

    /// An editor showing `scoring`.
    pub fn from_scoring(scoring: &ScoringConfig) -> Self {
        let mut form = Self::new();
        form.checkboxes.insert(
            fields::IDENTICAL_SCORING.to_string(),
            scoring.identical_scoring,
        );
        if let Some(select) = form.selects.get_mut(fields::TEXTGAP_RATING) {
            select.selected = scoring.comparator.code().to_string();
        }

        for (index, gap) in scoring.gaps.iter().enumerate() {
            form.insert_value(fields::cloze_type(index), gap.kind().code().to_string());
            match gap {
                GapConfig::Text { size, options } => {
                    form.insert_value(
                        fields::gap_size(index),
                        size.map(|s| s.to_string()).unwrap_or_default(),
                    );
                    form.set_rows(index, option_rows(options));
                }
                GapConfig::Select { options } => {
                    form.set_rows(index, option_rows(options));
                }
                GapConfig::Numeric {
                    value,
                    lower,
                    upper,
                    score,
                } => {
                    form.insert_value(fields::gap_size(index), String::new());
                    form.insert_value(fields::numeric_value(index), value.to_string());
                    form.insert_value(fields::numeric_lower(index), lower.to_string());
                    form.insert_value(fields::numeric_upper(index), upper.to_string());
                    form.insert_value(fields::numeric_points(index), score.to_string());
                }
            }
        }
        form
    }

    /// Set the form-wide text gap size.
    pub fn with_fixed_text_length(mut self, length: Option<usize>) -> Self {
        self.insert_value(
            fields::FIXED_TEXT_LENGTH,
            length.map(|l| l.to_string()).unwrap_or_default(),
        );
        self
    }

    /// Create or overwrite a text input.
    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Drop a text input. Returns whether it existed.
    pub fn remove_value(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    /// The (answer, points) rows of a gap, in form order.
    pub fn option_rows(&self, gap: usize) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        while let Some(answer) = self.values.get(&fields::option_answer(gap, rows.len())) {
            let points = self
                .values
                .get(&fields::option_points(gap, rows.len()))
                .cloned()
                .unwrap_or_default();
            rows.push((answer.clone(), points));
        }
        rows
    }

    /// Number of clicks received so far.
    pub fn click_count(&self) -> usize {
        self.clicks
    }

    fn set_rows(&mut self, gap: usize, rows: Vec<(String, String)>) {
        let old = self.option_rows(gap).len();
        for k in 0..old {
            self.values.remove(&fields::option_answer(gap, k));
            self.values.remove(&fields::option_points(gap, k));
        }
        for (k, (answer, points)) in rows.into_iter().enumerate() {
            self.values.insert(fields::option_answer(gap, k), answer);
            self.values.insert(fields::option_points(gap, k), points);
        }
    }

    fn press(&mut self, button: OptionButton, name: &str) -> Result<(), FormError> {
        let missing = || FormError::NoSuchElement(name.to_string());
        match button {
            OptionButton::Add { gap, option } => {
                let mut rows = self.option_rows(gap);
                if option < rows.len() {
                    rows.insert(option + 1, (String::new(), "0".to_string()));
                } else if rows.is_empty()
                    && option == 0
                    && self.values.contains_key(&fields::cloze_type(gap))
                {
                    rows.push((String::new(), "0".to_string()));
                } else {
                    return Err(missing());
                }
                self.set_rows(gap, rows);
            }
            OptionButton::Remove { gap, option } => {
                let mut rows = self.option_rows(gap);
                if option >= rows.len() {
                    return Err(missing());
                }
                rows.remove(option);
                self.set_rows(gap, rows);
            }
        }
        Ok(())
    }
}

fn option_rows(options: &ScoredOptions) -> Vec<(String, String)> {
    options
        .iter()
        .map(|(answer, score)| (answer.to_string(), score.to_string()))
        .collect()
}

impl FormDriver for MemoryForm {
    fn exists(&self, name: &str) -> bool {
        if self.values.contains_key(name)
            || self.checkboxes.contains_key(name)
            || self.selects.contains_key(name)
        {
            return true;
        }
        match OptionButton::parse(name) {
            Some(OptionButton::Add { gap, option } | OptionButton::Remove { gap, option }) => {
                self.values.contains_key(&fields::option_answer(gap, option))
            }
            None => false,
        }
    }

    fn value(&self, name: &str) -> Result<String, FormError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::NoSuchElement(name.to_string()))
    }

    fn set_value(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(FormError::NoSuchElement(name.to_string())),
        }
    }

    fn is_checked(&self, name: &str) -> Result<bool, FormError> {
        self.checkboxes
            .get(name)
            .copied()
            .ok_or_else(|| FormError::NoSuchElement(name.to_string()))
    }

    fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), FormError> {
        match self.checkboxes.get_mut(name) {
            Some(slot) => {
                *slot = checked;
                Ok(())
            }
            None => Err(FormError::NoSuchElement(name.to_string())),
        }
    }

    fn click(&mut self, name: &str) -> Result<(), FormError> {
        if let Some(checked) = self.checkboxes.get_mut(name) {
            *checked = !*checked;
        } else {
            let button = OptionButton::parse(name)
                .ok_or_else(|| FormError::NoSuchElement(name.to_string()))?;
            self.press(button, name)?;
        }
        self.clicks += 1;
        Ok(())
    }

    fn selected_option(&self, name: &str) -> Result<String, FormError> {
        self.selects
            .get(name)
            .map(|s| s.selected.clone())
            .ok_or_else(|| FormError::NoSuchElement(name.to_string()))
    }

    fn select_option(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let select = self
            .selects
            .get_mut(name)
            .ok_or_else(|| FormError::NoSuchElement(name.to_string()))?;
        if !select.choices.iter().any(|c| c == value) {
            return Err(FormError::rejected(name, format!("unknown option '{value}'")));
        }
        select.selected = value.to_string();
        Ok(())
    }
}

/// Wraps a driver and makes the first `failures` accesses to gap fields
/// fail with [`FormError::NoSuchElement`], like an editor that is still
/// re-rendering.
pub struct FlakyForm<D> {
    inner: D,
    /// Failures still to inject.
    remaining: AtomicUsize,
    /// Failures injected so far.
    injected: AtomicUsize,
}

impl<D: FormDriver> FlakyForm<D> {
    pub fn new(inner: D, failures: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(failures),
            injected: AtomicUsize::new(0),
        }
    }

    /// Get the number of failures injected so far.
    pub fn failures_injected(&self) -> usize {
        self.injected.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    fn trip(&self, name: &str) -> Result<(), FormError> {
        if !name.starts_with("gap_") {
            return Ok(());
        }
        let tripped = self
            .remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            self.injected.fetch_add(1, Ordering::Relaxed);
            return Err(FormError::NoSuchElement(name.to_string()));
        }
        Ok(())
    }
}

impl<D: FormDriver> FormDriver for FlakyForm<D> {
    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }

    fn value(&self, name: &str) -> Result<String, FormError> {
        self.trip(name)?;
        self.inner.value(name)
    }

    fn set_value(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.trip(name)?;
        self.inner.set_value(name, value)
    }

    fn is_checked(&self, name: &str) -> Result<bool, FormError> {
        self.inner.is_checked(name)
    }

    fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), FormError> {
        self.inner.set_checked(name, checked)
    }

    fn click(&mut self, name: &str) -> Result<(), FormError> {
        self.inner.click(name)
    }

    fn selected_option(&self, name: &str) -> Result<String, FormError> {
        self.inner.selected_option(name)
    }

    fn select_option(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.inner.select_option(name, value)
    }
}
