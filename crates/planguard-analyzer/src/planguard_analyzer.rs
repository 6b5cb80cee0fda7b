//! planguard Analyzer - EXPLAIN plan classification
//!
//! This crate provides functionality for:
//! - Normalizing EXPLAIN output from MySQL, PostgreSQL, SQLite and other backends
//! - Classifying plans against fixed rules (full scan, access type, row count,
//!   expensive operations, index usage, unused index candidates)
//! - Turning verdicts into test assertions with readable failure messages

pub mod assertion;
pub mod config;
pub mod explain;
pub mod rules;
pub mod verdict;

pub use assertion::{AssertionOutcome, PlanExpectation, PlanSource, Polarity, RawPlan};
pub use config::{AnalyzerConfig, ConfigError};
pub use explain::{BackendKind, ExecutionPlan, PlanRow, RawRowMap, normalize};
pub use rules::{Rule, classify_all};
pub use verdict::{ClassificationResult, ErrorKind, EvaluationError};
