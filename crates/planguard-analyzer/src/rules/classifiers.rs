//! Rule Classifiers
//!
//! Six independent checks over an [`ExecutionPlan`]. Each is a pure function:
//! structured rows are read when the plan has them, and the text heuristics in
//! [`super::symptoms`] are used only when it doesn't.
//!
//! Row-count, index-usage and unused-candidate stop at the first offending
//! row. Expensive-operations collects across every row.
//!
//! # Examples
//!
//! ```
//! use planguard_analyzer::explain::{BackendKind, ExecutionPlan, PlanRow};
//! use planguard_analyzer::rules::classify_row_count;
//! use planguard_analyzer::verdict::{ClassificationResult, ErrorKind};
//!
//! let plan = ExecutionPlan::from_text(BackendKind::MySqlLike, "")
//!     .with_rows(vec![PlanRow::new().with_access_type("ALL").with_rows(500)]);
//!
//! assert_eq!(
//!     classify_row_count(&plan, 10),
//!     ClassificationResult::Fail(ErrorKind::TooManyRows { observed: 500, threshold: 10 })
//! );
//! ```

use crate::explain::{BackendKind, ExecutionPlan, PlanRow};
use crate::rules::symptoms::{matches_access_symptom, matches_scan_symptom};
use crate::verdict::{ClassificationResult, ErrorKind};

/// Access type for a full table scan
pub const ACCESS_TYPE_ALL: &str = "ALL";
/// Access type for a full index scan
pub const ACCESS_TYPE_INDEX: &str = "index";
/// `Extra` flag for an out-of-index sort
pub const USING_FILESORT: &str = "Using filesort";
/// `Extra` flag for an intermediate temporary table
pub const USING_TEMPORARY: &str = "Using temporary";
/// Label reported when sort/temp operations are only visible in plan text
pub const TEXT_EXPENSIVE_LABEL: &str = "Sort or temporary operations";

const MYSQL_TYPE_ALL_TERMS: [&str; 2] = ["type=all", "type: all"];
const MYSQL_UNSTRUCTURED_SCAN_TERMS: [&str; 3] =
    ["full table scan", "filesort", "temporary table"];
const TEXT_EXPENSIVE_TERMS: [&str; 2] = ["sort", "temp"];

/// Fails with [`ErrorKind::FullScan`] when the plan reads a whole table
pub fn classify_full_scan(plan: &ExecutionPlan) -> ClassificationResult {
    let failed = match plan.backend {
        BackendKind::MySqlLike => {
            plan.text_contains_any(&MYSQL_TYPE_ALL_TERMS)
                || if plan.has_structured_rows() {
                    any_row(plan, is_full_table_row)
                } else {
                    plan.text_contains_any(&MYSQL_UNSTRUCTURED_SCAN_TERMS)
                }
        }
        BackendKind::PostgresLike | BackendKind::SqliteLike | BackendKind::Generic => {
            if plan.has_structured_rows() {
                any_row(plan, is_full_table_row)
            } else {
                matches_scan_symptom(&plan.raw_text, plan.backend)
            }
        }
    };

    record("full_scan", plan, ClassificationResult::fail_if(failed, || ErrorKind::FullScan))
}

/// Same check as [`classify_full_scan`]
pub fn classify_table_scan(plan: &ExecutionPlan) -> ClassificationResult {
    classify_full_scan(plan)
}

/// Fails with [`ErrorKind::BadAccessType`] on `ALL` or full `index` access
pub fn classify_access_type(plan: &ExecutionPlan) -> ClassificationResult {
    let failed = if plan.has_structured_rows() {
        any_row(plan, |row| {
            row.has_access_type(ACCESS_TYPE_ALL) || row.has_access_type(ACCESS_TYPE_INDEX)
        })
    } else {
        match plan.backend {
            BackendKind::MySqlLike => false,
            BackendKind::PostgresLike | BackendKind::SqliteLike | BackendKind::Generic => {
                matches_access_symptom(&plan.raw_text)
            }
        }
    };

    record(
        "access_type",
        plan,
        ClassificationResult::fail_if(failed, || ErrorKind::BadAccessType),
    )
}

/// Fails with [`ErrorKind::TooManyRows`] on the first row estimated above
/// `threshold`. Plans without rows pass.
pub fn classify_row_count(plan: &ExecutionPlan, threshold: u64) -> ClassificationResult {
    let violation = plan
        .rows
        .iter()
        .find_map(|row| row.estimated_rows.filter(|&rows| rows > threshold))
        .map(|observed| ErrorKind::TooManyRows {
            observed,
            threshold,
        });

    record("row_count", plan, violation.into())
}

/// Fails with [`ErrorKind::ExpensiveOperation`] listing every filesort and
/// temporary table, in row order
pub fn classify_expensive_operations(plan: &ExecutionPlan) -> ClassificationResult {
    let operations: Vec<String> = if plan.has_structured_rows() {
        plan.rows.iter().flat_map(expensive_flags).map(String::from).collect()
    } else {
        match plan.backend {
            BackendKind::MySqlLike => Vec::new(),
            BackendKind::PostgresLike | BackendKind::SqliteLike | BackendKind::Generic => {
                if plan.text_contains_any(&TEXT_EXPENSIVE_TERMS) {
                    vec![TEXT_EXPENSIVE_LABEL.to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    };

    let violation =
        (!operations.is_empty()).then_some(ErrorKind::ExpensiveOperation { operations });
    record("expensive_operations", plan, violation.into())
}

/// Fails with [`ErrorKind::NoIndex`] when a step runs without an index.
/// MySQL plans without rows pass.
pub fn classify_index_usage(plan: &ExecutionPlan) -> ClassificationResult {
    let failed = if plan.has_structured_rows() {
        any_row(plan, |row| !row.uses_index())
    } else {
        match plan.backend {
            BackendKind::MySqlLike => false,
            BackendKind::PostgresLike | BackendKind::SqliteLike | BackendKind::Generic => {
                matches_scan_symptom(&plan.raw_text, plan.backend)
            }
        }
    };

    record("index_usage", plan, ClassificationResult::fail_if(failed, || ErrorKind::NoIndex))
}

/// Fails with [`ErrorKind::UnusedIndexCandidate`] on the first row that had
/// candidate indexes but used none. Plans without rows pass.
pub fn classify_unused_index_candidate(plan: &ExecutionPlan) -> ClassificationResult {
    let violation = plan
        .rows
        .iter()
        .filter(|row| !row.uses_index())
        .find_map(|row| row.index_candidates())
        .map(|possible_keys| ErrorKind::UnusedIndexCandidate {
            possible_keys: possible_keys.to_string(),
        });

    record("unused_index_candidate", plan, violation.into())
}

fn any_row(plan: &ExecutionPlan, predicate: impl Fn(&PlanRow) -> bool) -> bool {
    plan.rows.iter().any(predicate)
}

fn is_full_table_row(row: &PlanRow) -> bool {
    row.has_access_type(ACCESS_TYPE_ALL)
}

fn expensive_flags(row: &PlanRow) -> impl Iterator<Item = &'static str> + '_ {
    [USING_FILESORT, USING_TEMPORARY]
        .into_iter()
        .filter(move |flag| row.has_extra(flag))
}

fn record(
    rule: &'static str,
    plan: &ExecutionPlan,
    result: ClassificationResult,
) -> ClassificationResult {
    match &result {
        ClassificationResult::Pass => {
            tracing::trace!(rule, backend = %plan.backend, "rule passed");
        }
        ClassificationResult::Fail(kind) => {
            tracing::debug!(
                rule,
                backend = %plan.backend,
                structured = plan.has_structured_rows(),
                violation = %kind,
                "rule violated"
            );
        }
    }
    result
}
