//! Query EXPLAIN Ingestion Module
//!
//! This module turns backend EXPLAIN output into the canonical
//! [`ExecutionPlan`] every rule consumes:
//! - `plan`: the data model (`BackendKind`, `PlanRow`, `ExecutionPlan`)
//! - `normalize`: raw text + optional structured rows into an `ExecutionPlan`
//! - `tabular`: MySQL's printed EXPLAIN table into structured rows
//!
//! # Example
//!
//! ```
//! use planguard_analyzer::explain::{normalize, BackendKind};
//!
//! let plan = normalize(BackendKind::PostgresLike, "Seq Scan on users", None);
//! assert_eq!(plan.raw_text, "seq scan on users");
//! assert!(!plan.has_structured_rows());
//! ```

pub mod normalize;
pub mod plan;
pub mod tabular;

pub use normalize::{normalize, plan_row_from_map};
pub use plan::{BackendKind, ExecutionPlan, NULL_SENTINEL, PlanRow, RawRowMap, UnknownBackend};
pub use tabular::parse_tabular_rows;
