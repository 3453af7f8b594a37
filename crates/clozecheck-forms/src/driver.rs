//! Form driver contract and its error type.

use thiserror::Error;

use clozecheck_core::ClozeError;

/// Errors raised by a form driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No element with the given name exists (yet). Often transient while
    /// the editor re-renders after a button click.
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// The element exists but refused the operation.
    #[error("element '{name}' rejected the operation: {reason}")]
    Rejected { name: String, reason: String },
}

impl FormError {
    pub fn rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::Rejected {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<FormError> for ClozeError {
    fn from(err: FormError) -> Self {
        ClozeError::Interaction(err.to_string())
    }
}

/// Access to the named fields of a cloze editor form.
///
/// Names follow the editor's markup, see [`crate::fields`].
pub trait FormDriver {
    /// Whether an element with this name is on the page.
    ///
    /// A lookup, not an access: it never fails, so a missing row can be
    /// told apart from a field that failed to respond.
    fn exists(&self, name: &str) -> bool;

    /// Current value of a text input.
    fn value(&self, name: &str) -> Result<String, FormError>;

    /// Replace the value of a text input.
    fn set_value(&mut self, name: &str, value: &str) -> Result<(), FormError>;

    fn is_checked(&self, name: &str) -> Result<bool, FormError>;

    fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), FormError>;

    /// Click a button or checkbox.
    fn click(&mut self, name: &str) -> Result<(), FormError>;

    /// Value of the selected option of a select box.
    fn selected_option(&self, name: &str) -> Result<String, FormError>;

    fn select_option(&mut self, name: &str, value: &str) -> Result<(), FormError>;
}
