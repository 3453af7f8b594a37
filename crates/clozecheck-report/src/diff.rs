//! Terminal tables for readjustment diffs.

use std::io::Write;

use comfy_table::{Cell, Table};

use clozecheck_core::readjust::{DiffRow, ReadjustmentDiff};
use clozecheck_core::traits::DiffReporter;

/// Marker placed in front of changed rows.
const CHANGED: &str = "*";

fn add_row(table: &mut Table, indent: &str, row: &DiffRow) {
    let marker = if row.changed() { CHANGED } else { "" };
    table.add_row(vec![
        Cell::new(marker),
        Cell::new(format!("{indent}{}", row.key)),
        Cell::new(&row.old),
        Cell::new(&row.new),
    ]);
}

/// Render the diff of one readjustment as a table, titled with the
/// question id.
pub fn render_diff_table(question: &str, diff: &ReadjustmentDiff) -> String {
    let mut table = Table::new();
    table.set_header(vec!["", "Setting", "Old", "New"]);

    add_row(&mut table, "", &diff.identical_scoring);
    add_row(&mut table, "", &diff.comparator);
    for gap in &diff.gaps {
        table.add_row(vec![Cell::new(""), Cell::new(&gap.label), Cell::new(""), Cell::new("")]);
        for row in &gap.rows {
            add_row(&mut table, "  ", row);
        }
    }

    format!(
        "readjusted {question} ({} changed)\n{table}",
        diff.changed_count()
    )
}

/// Reporter that writes every diff as a table to `out` as it arrives.
///
/// Write errors are ignored.
#[derive(Debug)]
pub struct TableReporter<W> {
    out: W,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiffReporter for TableReporter<W> {
    fn report(&mut self, question: &str, diff: &ReadjustmentDiff) {
        let table = render_diff_table(question, diff);
        let _ = writeln!(self.out, "\n{table}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use clozecheck_core::model::{Comparator, GapConfig, ScoringConfig};
    use rust_decimal::Decimal;

    fn config(score: &str, comparator: Comparator) -> ScoringConfig {
        ScoringConfig {
            identical_scoring: true,
            comparator,
            gaps: vec![GapConfig::Select {
                options: [("red", Decimal::from_str(score).unwrap())]
                    .into_iter()
                    .collect(),
            }],
        }
    }

    #[test]
    fn table_lists_every_row_and_marks_changes() {
        let diff = ReadjustmentDiff::between(
            &config("1", Comparator::CaseSensitive),
            &config("0.5", Comparator::IgnoreCase),
        );
        let table = render_diff_table("q1", &diff);

        assert!(table.starts_with("readjusted q1 (2 changed)"));
        assert!(table.contains("identical_scoring"));
        assert!(table.contains("gap 1"));
        assert!(table.contains("0.5"));
        assert_eq!(table.matches(&format!(" {CHANGED} ")).count(), 2);
    }

    #[test]
    fn reporter_writes_tables_in_order() {
        let diff = ReadjustmentDiff::between(
            &config("1", Comparator::CaseSensitive),
            &config("1", Comparator::CaseSensitive),
        );
        let mut reporter = TableReporter::new(Vec::new());
        reporter.report("q1", &diff);
        reporter.report("q2", &diff);

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let first = out.find("readjusted q1 (0 changed)").unwrap();
        let second = out.find("readjusted q2 (0 changed)").unwrap();
        assert!(first < second);
        assert_eq!(out.matches("readjusted").count(), 2);
    }
}
