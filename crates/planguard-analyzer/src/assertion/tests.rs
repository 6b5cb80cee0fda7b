//! Tests for plan assertions

use super::*;
use crate::verdict::ErrorKind;
use serde_json::json;

const QUERY: &str = "SELECT * FROM users WHERE email = 'a@example.com' LIMIT 1";

/// In-memory stand-in for a database connection
struct FixedPlanSource {
    backend: BackendKind,
    plan: Option<RawPlan>,
}

impl FixedPlanSource {
    fn new(backend: BackendKind, plan: RawPlan) -> Self {
        Self {
            backend,
            plan: Some(plan),
        }
    }

    fn unreachable(backend: BackendKind) -> Self {
        Self {
            backend,
            plan: None,
        }
    }
}

#[async_trait]
impl PlanSource for FixedPlanSource {
    fn backend(&self) -> BackendKind {
        self.backend
    }

    async fn explain(&self, _sql: &str) -> Result<RawPlan, EvaluationError> {
        self.plan
            .clone()
            .ok_or_else(|| EvaluationError::PlanUnavailable("connection refused".into()))
    }
}

fn seq_scan_plan() -> RawPlan {
    RawPlan::text(
        "Limit  (cost=0.28..8.29 rows=1 width=617) (actual time=0.019..0.019 rows=0 loops=1)\n  ->  Seq Scan on users",
    )
}

fn index_scan_plan() -> RawPlan {
    RawPlan::text(
        "Limit  (cost=0.28..8.29 rows=1 width=617) (actual time=0.019..0.019 rows=0 loops=1)\n  ->  Index Scan using index_users_on_email on users",
    )
}

mod evaluate {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_full_scan_is_reported() {
        let source = FixedPlanSource::new(BackendKind::PostgresLike, seq_scan_plan());

        let outcome = PlanExpectation::new(Rule::FullScan)
            .evaluate(&source, QUERY)
            .await;

        assert!(!outcome.passed());
        assert_eq!(
            outcome.verdict.as_ref().ok(),
            Some(&ClassificationResult::Fail(ErrorKind::FullScan))
        );
    }

    #[tokio::test]
    async fn test_index_scan_passes() {
        let source = FixedPlanSource::new(BackendKind::PostgresLike, index_scan_plan());

        let outcome = PlanExpectation::new(Rule::FullScan)
            .evaluate(&source, QUERY)
            .await;

        assert!(outcome.passed());
        assert_eq!(outcome.failure_message(), None);
    }

    #[tokio::test]
    async fn test_negated_expectation() {
        let scanning = FixedPlanSource::new(BackendKind::PostgresLike, seq_scan_plan());
        let indexed = FixedPlanSource::new(BackendKind::PostgresLike, index_scan_plan());
        let expect_scan = PlanExpectation::new(Rule::FullScan).to_violate();

        assert!(expect_scan.evaluate(&scanning, QUERY).await.passed());

        let outcome = expect_scan.evaluate(&indexed, QUERY).await;
        assert!(!outcome.passed());
        let message = outcome.failure_message().unwrap();
        assert!(message.starts_with("expected the query to violate \"avoid full table scans\" but it passed"));
        assert!(message.contains(QUERY));
    }

    #[tokio::test]
    async fn test_structured_rows_reach_the_rule() {
        let rows = vec![
            json!({"type": "ALL", "key": "NULL", "possible_keys": "idx_email", "rows": "500"})
                .as_object()
                .cloned()
                .unwrap(),
        ];
        let source = FixedPlanSource::new(
            BackendKind::MySqlLike,
            RawPlan::text("EXPLAIN for: SELECT ...").with_rows(rows),
        );

        let outcome = PlanExpectation::new(Rule::UnusedIndexCandidate)
            .evaluate(&source, QUERY)
            .await;

        assert_eq!(
            outcome.verdict.as_ref().ok(),
            Some(&ClassificationResult::Fail(ErrorKind::UnusedIndexCandidate {
                possible_keys: "idx_email".into()
            }))
        );
    }
}

mod evaluation_errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_error_never_passes_either_polarity() {
        let source = FixedPlanSource::unreachable(BackendKind::MySqlLike);

        for expectation in [
            PlanExpectation::new(Rule::IndexUsage).to_pass(),
            PlanExpectation::new(Rule::IndexUsage).to_violate(),
        ] {
            let outcome = expectation.evaluate(&source, QUERY).await;
            assert!(!outcome.passed());
            assert!(outcome.verdict.is_err());
        }
    }

    #[tokio::test]
    async fn test_error_message_names_cause_without_verdict() {
        let source = FixedPlanSource::unreachable(BackendKind::MySqlLike);

        let outcome = PlanExpectation::new(Rule::FullScan)
            .evaluate(&source, QUERY)
            .await;

        let message = outcome.failure_message().unwrap();
        assert_eq!(
            message,
            "expected the query to be analyzed but evaluation could not complete: Plan unavailable: connection refused"
        );
        assert!(!message.contains("full table scan"));
    }
}

mod messages {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failure_message_includes_query_and_plan_verbatim() {
        let outcome = PlanExpectation::new(Rule::FullScan).evaluate_plan(
            QUERY,
            BackendKind::PostgresLike,
            seq_scan_plan(),
        );

        let message = outcome.failure_message().unwrap();
        assert_eq!(
            message,
            format!(
                "expected the query to pass but failed: Query would perform a full table scan\nQuery: {QUERY}\nEXPLAIN output: {}",
                seq_scan_plan().text
            )
        );
        // Plan text keeps its original casing
        assert!(message.contains("Seq Scan on users"));
    }

    #[test]
    fn test_row_count_message_carries_detail() {
        let rows = vec![json!({"type": "ALL", "rows": 500}).as_object().cloned().unwrap()];
        let outcome = PlanExpectation::new(Rule::RowCount { threshold: 10 }).evaluate_plan(
            QUERY,
            BackendKind::MySqlLike,
            RawPlan::text("").with_rows(rows),
        );

        let message = outcome.failure_message().unwrap();
        assert!(message.contains("(500 > threshold of 10)"));
    }
}
