//! Reading saved plans from disk or stdin

use planguard_analyzer::{EvaluationError, RawRowMap};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Reads plan text from `source`, where `-` means stdin
pub fn read_plan_text(source: &str) -> Result<String, EvaluationError> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    std::fs::read_to_string(source).map_err(|e| {
        EvaluationError::PlanUnavailable(format!("cannot read plan file {source}: {e}"))
    })
}

/// Reads structured EXPLAIN rows from a JSON file
pub fn read_rows(path: &Path) -> Result<Vec<RawRowMap>, EvaluationError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        EvaluationError::PlanUnavailable(format!(
            "cannot read rows file {}: {e}",
            path.display()
        ))
    })?;
    parse_rows(&source)
}

/// Parses a JSON array of row objects. Elements that aren't objects are
/// dropped; a document that isn't an array is malformed.
pub fn parse_rows(source: &str) -> Result<Vec<RawRowMap>, EvaluationError> {
    let value: Value = serde_json::from_str(source)?;
    let Value::Array(items) = value else {
        return Err(EvaluationError::MalformedPlan(
            "rows must be a JSON array of objects".into(),
        ));
    };

    let total = items.len();
    let rows: Vec<RawRowMap> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();

    if rows.len() < total {
        tracing::warn!(dropped = total - rows.len(), "ignoring non-object EXPLAIN rows");
    }
    Ok(rows)
}
