//! Execution Plan Model - Canonical representation of EXPLAIN output
//!
//! Every backend's EXPLAIN output is normalized into an [`ExecutionPlan`]:
//! the lower-cased raw text, plus structured [`PlanRow`]s when the backend
//! could supply them (MySQL-family `EXPLAIN` in practice).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of structured EXPLAIN output, keyed by column name.
///
/// Column names are read case-sensitively: `type`, `key`, `possible_keys`,
/// `rows` and `Extra`.
pub type RawRowMap = serde_json::Map<String, serde_json::Value>;

/// Sentinel MySQL prints for a column that has no value
pub const NULL_SENTINEL: &str = "NULL";

/// Database engine family whose EXPLAIN format is being interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// MySQL, MariaDB and wire-compatible engines
    #[serde(rename = "mysql")]
    MySqlLike,
    /// PostgreSQL and derivatives
    #[serde(rename = "postgres")]
    PostgresLike,
    /// SQLite
    #[serde(rename = "sqlite")]
    SqliteLike,
    /// Anything else
    #[serde(rename = "generic")]
    Generic,
}

impl BackendKind {
    /// All backend kinds, in declaration order
    pub const ALL: [BackendKind; 4] = [
        Self::MySqlLike,
        Self::PostgresLike,
        Self::SqliteLike,
        Self::Generic,
    ];

    /// Maps a database adapter identity (e.g. `"mysql2"`, `"postgresql"`) to a
    /// backend kind. Unrecognized adapters map to [`BackendKind::Generic`].
    pub fn from_adapter_name(adapter: &str) -> Self {
        match adapter.trim().to_lowercase().as_str() {
            "mysql" | "mysql2" | "trilogy" | "mariadb" => Self::MySqlLike,
            "postgres" | "postgresql" | "postgis" => Self::PostgresLike,
            "sqlite" | "sqlite3" => Self::SqliteLike,
            _ => Self::Generic,
        }
    }

    /// Short identifier used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySqlLike => "mysql",
            Self::PostgresLike => "postgres",
            Self::SqliteLike => "sqlite",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a backend name is not one of the known identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown backend: {0} (expected mysql, postgres, sqlite or generic)")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mysql_like" => Ok(Self::MySqlLike),
            "postgres" | "postgres_like" => Ok(Self::PostgresLike),
            "sqlite" | "sqlite_like" => Ok(Self::SqliteLike),
            "generic" => Ok(Self::Generic),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

/// A single step of a structured execution plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Access type label (e.g. `ALL`, `index`, `ref`, `range`)
    pub access_type: Option<String>,
    /// Index actually used. Never holds the `NULL` sentinel.
    pub key: Option<String>,
    /// Candidate indexes the planner considered. Never holds the `NULL` sentinel.
    pub possible_keys: Option<String>,
    /// Estimated number of rows examined by this step
    pub estimated_rows: Option<u64>,
    /// Free-text flags from the `Extra` column, in source order
    pub extra: Vec<String>,
}

impl PlanRow {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the access type
    pub fn with_access_type(mut self, access_type: impl Into<String>) -> Self {
        self.access_type = Some(access_type.into());
        self
    }

    /// Sets the index used
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the candidate indexes
    pub fn with_possible_keys(mut self, possible_keys: impl Into<String>) -> Self {
        self.possible_keys = Some(possible_keys.into());
        self
    }

    /// Sets the estimated rows
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.estimated_rows = Some(rows);
        self
    }

    /// Appends an `Extra` flag
    pub fn with_extra(mut self, flag: impl Into<String>) -> Self {
        self.extra.push(flag.into());
        self
    }

    /// Returns true if the planner actually used an index for this step
    pub fn uses_index(&self) -> bool {
        self.key.is_some()
    }

    /// Returns the candidate index list, if the planner had any
    pub fn index_candidates(&self) -> Option<&str> {
        self.possible_keys.as_deref()
    }

    /// Returns true if the access type matches `label` exactly
    pub fn has_access_type(&self, label: &str) -> bool {
        self.access_type.as_deref() == Some(label)
    }

    /// Returns true if any `Extra` flag contains `needle`
    pub fn has_extra(&self, needle: &str) -> bool {
        self.extra.iter().any(|flag| flag.contains(needle))
    }
}

/// Canonical execution plan consumed by every rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Backend that produced the plan
    pub backend: BackendKind,
    /// Full plan text, lower-cased
    pub raw_text: String,
    /// Structured rows, empty when none could be obtained
    pub rows: Vec<PlanRow>,
}

impl ExecutionPlan {
    /// Creates a text-only plan. The text is lower-cased here.
    pub fn from_text(backend: BackendKind, raw_text: &str) -> Self {
        Self {
            backend,
            raw_text: raw_text.to_lowercase(),
            rows: Vec::new(),
        }
    }

    /// Attaches structured rows
    pub fn with_rows(mut self, rows: Vec<PlanRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Returns true if structured rows are available
    pub fn has_structured_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Returns true if the lower-cased plan text contains `needle`
    ///
    /// `needle` must already be lower-case.
    pub fn text_contains(&self, needle: &str) -> bool {
        self.raw_text.contains(needle)
    }

    /// Returns true if the plan text contains any of `needles`
    pub fn text_contains_any(&self, needles: &[&str]) -> bool {
        contains_any(&self.raw_text, needles)
    }
}

/// Returns true if `text` contains any of `needles`
pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
