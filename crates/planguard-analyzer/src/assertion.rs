//! Plan Assertions
//!
//! Glue between a test suite and the rules: fetch the plan for a query from a
//! [`PlanSource`], classify it, and render a message the test framework can
//! show. Fetching the plan is the only suspension point; classification is
//! synchronous.
//!
//! # Example
//!
//! ```
//! use planguard_analyzer::assertion::{PlanExpectation, RawPlan};
//! use planguard_analyzer::explain::BackendKind;
//! use planguard_analyzer::rules::Rule;
//!
//! let outcome = PlanExpectation::new(Rule::FullScan).evaluate_plan(
//!     "SELECT * FROM users WHERE email = 'a@b.c'",
//!     BackendKind::PostgresLike,
//!     RawPlan::text("Seq Scan on users"),
//! );
//!
//! assert!(!outcome.passed());
//! assert!(outcome.failure_message().unwrap().contains("Seq Scan on users"));
//! ```

use crate::explain::{BackendKind, RawRowMap, normalize};
use crate::rules::Rule;
use crate::verdict::{ClassificationResult, EvaluationError};
use async_trait::async_trait;

/// EXPLAIN output for one query, as obtained by a [`PlanSource`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlan {
    /// Plan rendered as text, passed through unchanged
    pub text: String,
    /// Structured rows, when the backend could produce them
    pub rows: Option<Vec<RawRowMap>>,
}

impl RawPlan {
    /// A plan with text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rows: None,
        }
    }

    /// Attaches structured rows
    pub fn with_rows(mut self, rows: Vec<RawRowMap>) -> Self {
        self.rows = Some(rows);
        self
    }
}

/// Something that can EXPLAIN a query, typically a live database connection
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Backend family of the underlying connection
    fn backend(&self) -> BackendKind;

    /// Runs EXPLAIN for `sql`
    async fn explain(&self, sql: &str) -> Result<RawPlan, EvaluationError>;
}

/// Whether a rule is expected to hold or to be broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Pass,
    Violate,
}

/// A rule together with what the test expects of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanExpectation {
    pub rule: Rule,
    pub polarity: Polarity,
}

impl PlanExpectation {
    /// Expects `rule` to pass
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            polarity: Polarity::Pass,
        }
    }

    /// Expects the rule to pass
    pub fn to_pass(mut self) -> Self {
        self.polarity = Polarity::Pass;
        self
    }

    /// Expects the rule to be violated
    pub fn to_violate(mut self) -> Self {
        self.polarity = Polarity::Violate;
        self
    }

    /// Fetches the plan for `sql` from `source` and checks it
    #[tracing::instrument(skip(self, source, sql), fields(rule = %self.rule, sql_preview = %sql.chars().take(100).collect::<String>()))]
    pub async fn evaluate(&self, source: &dyn PlanSource, sql: &str) -> AssertionOutcome {
        match source.explain(sql).await {
            Ok(raw) => self.evaluate_plan(sql, source.backend(), raw),
            Err(error) => {
                tracing::warn!(%error, "could not obtain execution plan");
                AssertionOutcome {
                    expectation: *self,
                    query: sql.to_string(),
                    plan_text: String::new(),
                    verdict: Err(error),
                }
            }
        }
    }

    /// Checks a plan the caller already holds
    pub fn evaluate_plan(&self, sql: &str, backend: BackendKind, raw: RawPlan) -> AssertionOutcome {
        let plan = normalize(backend, &raw.text, raw.rows.as_deref());
        let result = self.rule.classify(&plan);

        AssertionOutcome {
            expectation: *self,
            query: sql.to_string(),
            plan_text: raw.text,
            verdict: Ok(result),
        }
    }
}

/// Result of checking one query against one expectation
#[derive(Debug)]
pub struct AssertionOutcome {
    pub expectation: PlanExpectation,
    /// Query text, unchanged
    pub query: String,
    /// Raw plan text, unchanged. Empty when the plan couldn't be fetched.
    pub plan_text: String,
    /// Rule verdict, or why there isn't one
    pub verdict: Result<ClassificationResult, EvaluationError>,
}

impl AssertionOutcome {
    /// Returns true if the verdict matches the expectation. An evaluation
    /// error never passes.
    pub fn passed(&self) -> bool {
        match (&self.verdict, self.expectation.polarity) {
            (Ok(result), Polarity::Pass) => result.is_pass(),
            (Ok(result), Polarity::Violate) => result.is_fail(),
            (Err(_), _) => false,
        }
    }

    /// Message explaining why the assertion failed, or `None` if it passed
    pub fn failure_message(&self) -> Option<String> {
        if self.passed() {
            return None;
        }

        let message = match &self.verdict {
            Err(error) => {
                format!("expected the query to be analyzed but evaluation could not complete: {error}")
            }
            Ok(ClassificationResult::Fail(kind)) => format!(
                "expected the query to pass but failed: {kind}\nQuery: {}\nEXPLAIN output: {}",
                self.query, self.plan_text
            ),
            Ok(ClassificationResult::Pass) => format!(
                "expected the query to violate \"{}\" but it passed\nQuery: {}\nEXPLAIN output: {}",
                self.expectation.rule.description(),
                self.query,
                self.plan_text
            ),
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests;
