//! Plan Normalizer
//!
//! Converts backend EXPLAIN output into an [`ExecutionPlan`]. Structured rows
//! are mapped column by column; anything that doesn't have the expected shape
//! is treated as absent rather than rejected.
//!
//! # Examples
//!
//! ```
//! use planguard_analyzer::explain::{normalize, BackendKind};
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"type": "ALL", "key": "NULL", "rows": 500, "Extra": "Using where"})
//!         .as_object()
//!         .cloned()
//!         .unwrap(),
//! ];
//! let plan = normalize(BackendKind::MySqlLike, "EXPLAIN output", Some(&rows));
//! assert_eq!(plan.rows[0].key, None);
//! assert_eq!(plan.rows[0].estimated_rows, Some(500));
//! assert_eq!(plan.raw_text, "explain output");
//! ```

use crate::explain::plan::{BackendKind, ExecutionPlan, NULL_SENTINEL, PlanRow, RawRowMap};
use serde_json::Value;

const COLUMN_TYPE: &str = "type";
const COLUMN_KEY: &str = "key";
const COLUMN_POSSIBLE_KEYS: &str = "possible_keys";
const COLUMN_ROWS: &str = "rows";
const COLUMN_EXTRA: &str = "Extra";

const PLAN_COLUMNS: [&str; 5] = [
    COLUMN_TYPE,
    COLUMN_KEY,
    COLUMN_POSSIBLE_KEYS,
    COLUMN_ROWS,
    COLUMN_EXTRA,
];

/// Builds the canonical plan for one query evaluation
///
/// Row maps carrying none of the plan columns are dropped. Rows with only some
/// of them keep what they have; the missing fields read as absent.
pub fn normalize(
    backend: BackendKind,
    raw_text: &str,
    structured_rows: Option<&[RawRowMap]>,
) -> ExecutionPlan {
    let raw_rows = structured_rows.unwrap_or_default();
    let rows: Vec<PlanRow> = raw_rows
        .iter()
        .filter(|row| is_plan_row(row))
        .map(plan_row_from_map)
        .collect();

    if rows.len() < raw_rows.len() {
        tracing::debug!(
            dropped = raw_rows.len() - rows.len(),
            "dropped row maps without any plan columns"
        );
    }

    tracing::debug!(
        backend = %backend,
        structured_rows = rows.len(),
        text_len = raw_text.len(),
        "normalized execution plan"
    );

    ExecutionPlan::from_text(backend, raw_text).with_rows(rows)
}

/// Maps one raw row into a [`PlanRow`]
pub fn plan_row_from_map(row: &RawRowMap) -> PlanRow {
    PlanRow {
        access_type: string_column(row, COLUMN_TYPE),
        key: non_sentinel(string_column(row, COLUMN_KEY)),
        possible_keys: non_sentinel(string_column(row, COLUMN_POSSIBLE_KEYS)),
        estimated_rows: row.get(COLUMN_ROWS).and_then(row_count),
        extra: row.get(COLUMN_EXTRA).map(extra_flags).unwrap_or_default(),
    }
}

fn is_plan_row(row: &RawRowMap) -> bool {
    PLAN_COLUMNS.iter().any(|column| row.contains_key(*column))
}

fn string_column(row: &RawRowMap, column: &str) -> Option<String> {
    row.get(column)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

fn non_sentinel(value: Option<String>) -> Option<String> {
    value.filter(|v| v != NULL_SENTINEL)
}

/// MySQL drivers hand back `rows` either as a number or as a decimal string
fn row_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn extra_flags(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if s != NULL_SENTINEL => s
            .split(';')
            .map(str::trim)
            .filter(|flag| !flag.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|flag| !flag.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
