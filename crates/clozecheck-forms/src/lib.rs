//! Cloze editor form bindings.
//!
//! Reads a scoring configuration out of the exam engine's cloze editor form
//! and writes readjusted configurations back into it. The form itself sits
//! behind the `FormDriver` trait; `MemoryForm` is an in-memory editor used
//! by tests and by the CLI.

pub mod binding;
pub mod driver;
pub mod fields;
pub mod memory;
pub mod sink;
pub mod source;

pub use binding::FormBinding;
pub use driver::{FormDriver, FormError};
pub use memory::{FlakyForm, MemoryForm};
pub use sink::write_scoring;
pub use source::read_scoring;
