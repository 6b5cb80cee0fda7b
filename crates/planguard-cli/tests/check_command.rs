//! End-to-end runs of the `check` command against saved plans

use clap::Parser;
use planguard_analyzer::{BackendKind, ClassificationResult, ErrorKind, Rule};
use planguard_cli::{CheckArgs, Cli, Command, OutputFormat, run_check};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

const MYSQL_TABLE: &str = "\
+----+-------------+--------+------+---------------+------+---------+------+------+-----------------------------+
| id | select_type | table  | type | possible_keys | key  | key_len | ref  | rows | Extra                       |
+----+-------------+--------+------+---------------+------+---------+------+------+-----------------------------+
|  1 | SIMPLE      | orders | ALL  | idx_user      | NULL | NULL    | NULL | 5000 | Using where; Using filesort |
+----+-------------+--------+------+---------------+------+---------+------+------+-----------------------------+";

fn write_file(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

fn parse_check(args: &[&str]) -> CheckArgs {
    let cli = Cli::try_parse_from(std::iter::once("planguard").chain(args.iter().copied()))
        .unwrap();
    match cli.command {
        Command::Check(args) => args,
        Command::Rules => panic!("expected check"),
    }
}

fn verdicts(report: &planguard_cli::CheckReport) -> Vec<(&'static str, bool)> {
    report
        .results
        .iter()
        .map(|r| (r.rule.name(), r.result.is_pass()))
        .collect()
}

#[test]
fn test_postgres_seq_scan_from_text() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(
        dir.path(),
        "plan.txt",
        "Seq Scan on users  (cost=0.00..35.50 rows=2550 width=36)\n",
    );

    let args = parse_check(&["check", "--backend", "postgres", "--plan", &plan]);
    let report = run_check(&args).unwrap();

    assert_eq!(report.backend, BackendKind::PostgresLike);
    assert_eq!(report.structured_rows, 0);
    assert_eq!(
        verdicts(&report),
        vec![
            ("full_scan", false),
            ("access_type", false),
            ("row_count", true),
            ("expensive_operations", true),
            ("index_usage", false),
            ("unused_index_candidate", true),
        ]
    );
    assert!(!report.all_passed());
    assert_eq!(report.failure_count(), 3);
}

#[test]
fn test_postgres_index_scan_passes() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(
        dir.path(),
        "plan.txt",
        "Index Scan using users_pkey on users  (cost=0.29..8.30 rows=1 width=36)\n",
    );

    let args = parse_check(&[
        "check",
        "--backend",
        "postgres",
        "--plan",
        &plan,
        "--rule",
        "full_scan",
        "--rule",
        "index_usage",
    ]);
    let report = run_check(&args).unwrap();

    assert_eq!(verdicts(&report), vec![("full_scan", true), ("index_usage", true)]);
    assert!(report.all_passed());
}

#[test]
fn test_mysql_rows_from_table() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(dir.path(), "plan.txt", MYSQL_TABLE);

    let args = parse_check(&[
        "check",
        "--backend",
        "mysql",
        "--plan",
        &plan,
        "--rows-from-table",
        "--max-rows",
        "100",
    ]);
    let report = run_check(&args).unwrap();

    assert_eq!(report.structured_rows, 1);
    let failures: Vec<_> = report
        .results
        .iter()
        .filter_map(|r| r.result.error_kind().cloned())
        .collect();
    assert_eq!(
        failures,
        vec![
            ErrorKind::FullScan,
            ErrorKind::BadAccessType,
            ErrorKind::TooManyRows {
                observed: 5000,
                threshold: 100
            },
            ErrorKind::ExpensiveOperation {
                operations: vec!["Using filesort".into()]
            },
            ErrorKind::NoIndex,
            ErrorKind::UnusedIndexCandidate {
                possible_keys: "idx_user".into()
            },
        ]
    );
}

#[test]
fn test_mysql_without_rows_is_lenient() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(dir.path(), "plan.txt", "1 row in set, using index\n");

    let args = parse_check(&["check", "--backend", "mysql", "--plan", &plan]);
    let report = run_check(&args).unwrap();

    assert!(report.all_passed());
}

#[test]
fn test_rows_file_overrides_text() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(dir.path(), "plan.txt", "Seq Scan on users\n");
    let rows = write_file(
        dir.path(),
        "rows.json",
        r#"[{"type": "ref", "key": "idx_email", "possible_keys": "idx_email", "rows": 1, "Extra": null}]"#,
    );

    let args = parse_check(&[
        "check", "--backend", "sqlite", "--plan", &plan, "--rows", &rows,
    ]);
    let report = run_check(&args).unwrap();

    assert_eq!(report.structured_rows, 1);
    assert!(report.all_passed());
}

#[test]
fn test_config_supplies_backend_rules_and_threshold() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(dir.path(), "plan.txt", MYSQL_TABLE);
    let config = write_file(
        dir.path(),
        "planguard.toml",
        "backend = \"mysql\"\nrow_threshold = 10000\nrules = [\"row_count\"]\n",
    );

    let args = parse_check(&[
        "check",
        "--plan",
        &plan,
        "--rows-from-table",
        "--config",
        &config,
    ]);
    let report = run_check(&args).unwrap();

    assert_eq!(report.backend, BackendKind::MySqlLike);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].rule, Rule::RowCount { threshold: 10_000 });
    assert_eq!(report.results[0].result, ClassificationResult::Pass);
}

#[test]
fn test_max_rows_beats_config() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(dir.path(), "plan.txt", MYSQL_TABLE);
    let config = write_file(dir.path(), "planguard.toml", "row_threshold = 10000\n");

    let args = parse_check(&[
        "check",
        "--backend",
        "mysql",
        "--plan",
        &plan,
        "--rows-from-table",
        "--config",
        &config,
        "--max-rows",
        "50",
        "--rule",
        "row_count",
    ]);
    let report = run_check(&args).unwrap();

    assert_eq!(
        report.results[0].result,
        ClassificationResult::Fail(ErrorKind::TooManyRows {
            observed: 5000,
            threshold: 50
        })
    );
}

mod errors {
    use super::*;

    fn args(plan: &str) -> CheckArgs {
        CheckArgs {
            backend: Some(BackendKind::Generic),
            plan: plan.to_string(),
            rows: None,
            rows_from_table: false,
            rules: Vec::new(),
            max_rows: None,
            query: None,
            config: None,
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn test_missing_plan_file() {
        let err = run_check(&args("/nonexistent/plan.txt")).unwrap_err();
        assert!(err.to_string().contains("Plan unavailable"));
    }

    #[test]
    fn test_missing_backend() {
        let plan = NamedTempFile::new().unwrap();
        let mut args = args(plan.path().to_str().unwrap());
        args.backend = None;

        let err = run_check(&args).unwrap_err();
        assert!(err.to_string().contains("no backend given"));
    }

    #[test]
    fn test_unknown_rule() {
        let plan = NamedTempFile::new().unwrap();
        let mut args = args(plan.path().to_str().unwrap());
        args.rules = vec!["bogus".into()];

        let err = run_check(&args).unwrap_err();
        assert!(format!("{err:#}").contains("bogus"));
    }

    #[test]
    fn test_zero_threshold() {
        let plan = NamedTempFile::new().unwrap();
        let mut args = args(plan.path().to_str().unwrap());
        args.max_rows = Some(0);

        assert!(run_check(&args).is_err());
    }

    #[test]
    fn test_malformed_rows_file() {
        let dir = TempDir::new().unwrap();
        let plan = write_file(dir.path(), "plan.txt", "");
        let rows = write_file(dir.path(), "rows.json", r#"{"type": "ALL"}"#);
        let mut args = args(&plan);
        args.rows = Some(rows.into());

        let err = run_check(&args).unwrap_err();
        assert!(err.to_string().contains("Malformed plan"));
    }
}
