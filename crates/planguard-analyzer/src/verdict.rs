//! Classification verdicts and evaluation errors
//!
//! A rule violation is an ordinary outcome, carried as
//! [`ClassificationResult::Fail`]. Failing to obtain or read the plan at all is
//! a different thing and is reported through [`EvaluationError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a plan failed a rule. One kind per rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Query would perform a full table scan")]
    FullScan,

    #[error("Query uses a problematic access type (ALL or index)")]
    BadAccessType,

    #[error("Query would scan too many rows ({observed} > threshold of {threshold})")]
    TooManyRows { observed: u64, threshold: u64 },

    #[error("Query uses expensive operations: {}", .operations.join(", "))]
    ExpensiveOperation { operations: Vec<String> },

    #[error("Query does not use an available index")]
    NoIndex,

    #[error("Query has potential indexes ({possible_keys}) but none were used")]
    UnusedIndexCandidate { possible_keys: String },
}

/// Outcome of running one rule against one plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum ClassificationResult {
    Pass,
    Fail(ErrorKind),
}

impl ClassificationResult {
    /// Returns true if the plan satisfied the rule
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if the plan violated the rule
    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// Returns the violation, if any
    pub fn error_kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Pass => None,
            Self::Fail(kind) => Some(kind),
        }
    }

    /// Passes when `failed` is false, otherwise fails with `kind`
    pub fn fail_if(failed: bool, kind: impl FnOnce() -> ErrorKind) -> Self {
        if failed { Self::Fail(kind()) } else { Self::Pass }
    }
}

impl From<Option<ErrorKind>> for ClassificationResult {
    fn from(violation: Option<ErrorKind>) -> Self {
        violation.map_or(Self::Pass, Self::Fail)
    }
}

/// The plan could not be analyzed, so no verdict exists
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Plan unavailable: {0}")]
    PlanUnavailable(String),

    #[error("Malformed plan: {0}")]
    MalformedPlan(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for plan evaluation
pub type Result<T> = std::result::Result<T, EvaluationError>;
