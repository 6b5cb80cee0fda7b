//! Analyzer configuration
//!
//! Selects which rules run and with what row threshold. Usually read from a
//! small TOML file:
//!
//! ```toml
//! row_threshold = 500
//! rules = ["full_scan", "index_usage", "row_count"]
//! backend = "mysql"
//! ```

use crate::explain::BackendKind;
use crate::rules::{DEFAULT_ROW_THRESHOLD, Rule};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Row threshold must be positive")]
    InvalidThreshold,

    #[error("Unknown rule: {0}")]
    UnknownRule(String),
}

/// Result type for configuration handling
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the plan analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Largest per-step row estimate the row-count rule accepts
    pub row_threshold: u64,
    /// Rule identifiers to run; empty means all of them
    pub rules: Vec<String>,
    /// Backend to assume when the caller doesn't name one
    pub backend: Option<BackendKind>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            row_threshold: DEFAULT_ROW_THRESHOLD,
            rules: Vec::new(),
            backend: None,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), rules = ?config.rules, "loaded analyzer config");
        Ok(config)
    }

    /// Sets the row threshold
    pub fn with_row_threshold(mut self, threshold: u64) -> Self {
        self.row_threshold = threshold;
        self
    }

    /// Sets the rules to run
    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules = rules.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default backend
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Checks the threshold and every rule name
    pub fn validate(&self) -> Result<()> {
        self.resolve_rules().map(|_| ())
    }

    /// Resolves the configured rule names, in the order given
    pub fn resolve_rules(&self) -> Result<Vec<Rule>> {
        if self.row_threshold == 0 {
            return Err(ConfigError::InvalidThreshold);
        }

        if self.rules.is_empty() {
            return Ok(Rule::all(self.row_threshold));
        }

        self.rules
            .iter()
            .map(|name| {
                Rule::from_name(name, self.row_threshold)
                    .ok_or_else(|| ConfigError::UnknownRule(name.clone()))
            })
            .collect()
    }
}
