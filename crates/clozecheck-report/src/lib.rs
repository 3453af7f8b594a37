//! Human-readable output for clozecheck sessions.
//!
//! Renders readjustment diffs as terminal tables and session reports as
//! self-contained HTML pages.

pub mod diff;
pub mod html;

pub use diff::{render_diff_table, TableReporter};
pub use html::{generate_html, write_html_report};
