//! Rendering check results

use crate::check::CheckReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use planguard_analyzer::{ClassificationResult, Rule};

/// Renders a verdict table followed by failure details
pub fn render_table(report: &CheckReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rule", "Verdict", "Detail"]);

    for entry in &report.results {
        let (verdict, detail) = match &entry.result {
            ClassificationResult::Pass => (Cell::new("pass").fg(Color::Green), String::new()),
            ClassificationResult::Fail(kind) => {
                (Cell::new("FAIL").fg(Color::Red), kind.to_string())
            }
        };
        table.add_row(vec![Cell::new(entry.rule.name()), verdict, Cell::new(detail)]);
    }

    let mut output = format!("backend: {}\n{table}\n", report.backend);
    if !report.all_passed() {
        output.push_str(&format!(
            "{} of {} rules failed\n",
            report.failure_count(),
            report.results.len()
        ));
        if let Some(query) = &report.query {
            output.push_str(&format!("Query: {query}\n"));
        }
        output.push_str(&format!("EXPLAIN output: {}\n", report.plan.trim_end()));
    }
    output
}

/// Renders the report as pretty-printed JSON
pub fn render_json(report: &CheckReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Renders the rule catalogue for `planguard rules`
pub fn render_rules(threshold: u64) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Rule", "Passes when the plan should"]);
    for rule in Rule::all(threshold) {
        table.add_row(vec![rule.name().to_string(), rule.description()]);
    }
    table.to_string()
}
