//! Plan Classification Rules
//!
//! Each rule inspects an [`ExecutionPlan`] and returns a
//! [`ClassificationResult`]. The `classify_*` functions are the rules
//! themselves; [`Rule`] names them so callers can select, configure and report
//! on them uniformly.

mod classifiers;
pub mod symptoms;

pub use classifiers::*;
pub use symptoms::{matches_access_symptom, matches_scan_symptom};

use crate::explain::ExecutionPlan;
use crate::verdict::ClassificationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row threshold used when none is configured
pub const DEFAULT_ROW_THRESHOLD: u64 = 1_000;

/// One of the six plan rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    FullScan,
    AccessType,
    RowCount { threshold: u64 },
    ExpensiveOperations,
    IndexUsage,
    UnusedIndexCandidate,
}

impl Rule {
    /// Stable identifiers, in canonical order
    pub const NAMES: [&'static str; 6] = [
        "full_scan",
        "access_type",
        "row_count",
        "expensive_operations",
        "index_usage",
        "unused_index_candidate",
    ];

    /// All six rules in canonical order
    pub fn all(threshold: u64) -> Vec<Rule> {
        Self::NAMES
            .iter()
            .filter_map(|name| Self::from_name(name, threshold))
            .collect()
    }

    /// Looks a rule up by its identifier. `table_scan` is accepted as an alias
    /// for `full_scan`. `threshold` is only used by `row_count`.
    pub fn from_name(name: &str, threshold: u64) -> Option<Rule> {
        match name.trim() {
            "full_scan" | "table_scan" => Some(Self::FullScan),
            "access_type" => Some(Self::AccessType),
            "row_count" => Some(Self::RowCount { threshold }),
            "expensive_operations" => Some(Self::ExpensiveOperations),
            "index_usage" => Some(Self::IndexUsage),
            "unused_index_candidate" => Some(Self::UnusedIndexCandidate),
            _ => None,
        }
    }

    /// Stable identifier
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullScan => "full_scan",
            Self::AccessType => "access_type",
            Self::RowCount { .. } => "row_count",
            Self::ExpensiveOperations => "expensive_operations",
            Self::IndexUsage => "index_usage",
            Self::UnusedIndexCandidate => "unused_index_candidate",
        }
    }

    /// What a passing plan looks like under this rule
    pub fn description(&self) -> String {
        match self {
            Self::FullScan => "avoid full table scans".to_string(),
            Self::AccessType => "use a good access type (not ALL or index)".to_string(),
            Self::RowCount { threshold } => format!("scan at most {threshold} rows per step"),
            Self::ExpensiveOperations => "avoid filesort and temporary tables".to_string(),
            Self::IndexUsage => "use an index for every step".to_string(),
            Self::UnusedIndexCandidate => "use the indexes the planner considered".to_string(),
        }
    }

    /// Runs this rule against `plan`
    pub fn classify(&self, plan: &ExecutionPlan) -> ClassificationResult {
        match *self {
            Self::FullScan => classify_full_scan(plan),
            Self::AccessType => classify_access_type(plan),
            Self::RowCount { threshold } => classify_row_count(plan, threshold),
            Self::ExpensiveOperations => classify_expensive_operations(plan),
            Self::IndexUsage => classify_index_usage(plan),
            Self::UnusedIndexCandidate => classify_unused_index_candidate(plan),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs every rule in `rules` against `plan`, preserving order
pub fn classify_all(plan: &ExecutionPlan, rules: &[Rule]) -> Vec<(Rule, ClassificationResult)> {
    rules.iter().map(|rule| (*rule, rule.classify(plan))).collect()
}
