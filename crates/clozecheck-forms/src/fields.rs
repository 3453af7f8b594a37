//! Field names of the cloze editor form.
//!
//! Gap and option indices are zero-based, as in the editor's markup.

pub const FIXED_TEXT_LENGTH: &str = "fixedTextLength";
pub const IDENTICAL_SCORING: &str = "identical_scoring";
pub const TEXTGAP_RATING: &str = "textgap_rating";

pub fn cloze_type(gap: usize) -> String {
    format!("clozetype_{gap}")
}

pub fn gap_size(gap: usize) -> String {
    format!("gap_{gap}_gapsize")
}

pub fn option_answer(gap: usize, option: usize) -> String {
    format!("gap_{gap}[answer][{option}]")
}

pub fn option_points(gap: usize, option: usize) -> String {
    format!("gap_{gap}[points][{option}]")
}

pub fn numeric_value(gap: usize) -> String {
    format!("gap_{gap}_numeric")
}

pub fn numeric_lower(gap: usize) -> String {
    format!("gap_{gap}_numeric_lower")
}

pub fn numeric_upper(gap: usize) -> String {
    format!("gap_{gap}_numeric_upper")
}

pub fn numeric_points(gap: usize) -> String {
    format!("gap_{gap}_numeric_points")
}

/// Inserts an empty option row after row `option`.
pub fn add_button(gap: usize, option: usize) -> String {
    format!("add_gap_{gap}_{option}")
}

/// Removes option row `option`.
pub fn remove_button(gap: usize, option: usize) -> String {
    format!("remove_gap_{gap}_{option}")
}

/// An option row button, parsed back from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionButton {
    Add { gap: usize, option: usize },
    Remove { gap: usize, option: usize },
}

impl OptionButton {
    pub fn parse(name: &str) -> Option<Self> {
        let (add, rest) = if let Some(rest) = name.strip_prefix("add_gap_") {
            (true, rest)
        } else {
            (false, name.strip_prefix("remove_gap_")?)
        };
        let (gap, option) = rest.split_once('_')?;
        let gap = gap.parse().ok()?;
        let option = option.parse().ok()?;
        Some(if add {
            OptionButton::Add { gap, option }
        } else {
            OptionButton::Remove { gap, option }
        })
    }
}
