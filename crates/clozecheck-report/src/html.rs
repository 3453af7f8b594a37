//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use clozecheck_core::report::{ItemRun, SessionReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn seed_label(report: &SessionReport) -> String {
    report
        .seed
        .map_or_else(|| "random".to_string(), |seed| format!("seed {seed}"))
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>clozecheck report ({})</title>\n",
        seed_label(report)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>clozecheck report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} items | {} rounds | {}</p>\n",
        seed_label(report),
        report.items.len(),
        report.round_count(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Item</th><th>Title</th><th>Rounds</th><th>Full marks</th><th>Readjustments</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for item in &report.items {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&item.item_id),
            html_escape(&item.title),
            item.rounds.len(),
            full_marks(item),
            item.readjustment_count(),
        ));
    }
    html.push_str("</tbody></table>\n");

    let coverage = &report.coverage;
    html.push_str(&format!(
        "<p>Coverage: {} of {} cases ({:.1}%)</p>\n",
        coverage.covered,
        coverage.declared,
        coverage.ratio() * 100.0
    ));
    if !coverage.uncovered.is_empty() {
        html.push_str("<details>\n<summary>Uncovered cases</summary>\n<ul>\n");
        for case in &coverage.uncovered {
            html.push_str(&format!("<li>{}</li>\n", html_escape(case)));
        }
        html.push_str("</ul>\n</details>\n");
    }
    html.push_str("</section>\n");

    // Per-round results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Rounds</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Item</th><th onclick=\"sortTable(1)\">Round</th><th onclick=\"sortTable(2)\">Answers</th><th onclick=\"sortTable(3)\">Score</th><th onclick=\"sortTable(4)\">Attempts</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for item in &report.items {
        for round in &item.rounds {
            let class = if round.expected_score == round.maximum_score {
                "pass"
            } else if round.expected_score.is_zero() {
                "fail"
            } else {
                "partial"
            };
            let answers = round
                .answers
                .iter()
                .map(|(gap, value)| format!("{}: {}", gap + 1, html_escape(value)))
                .collect::<Vec<_>>()
                .join("<br>");

            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{} / {}</td><td>{}</td></tr>\n",
                class,
                html_escape(&item.item_id),
                round.round,
                answers,
                round.expected_score,
                round.maximum_score,
                round.attempts
            ));
        }
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Rounds that scored the maximum.
fn full_marks(item: &ItemRun) -> usize {
    item.rounds
        .iter()
        .filter(|r| r.expected_score == r.maximum_score)
        .count()
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --partial: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --partial: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.partial { background: var(--partial); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
