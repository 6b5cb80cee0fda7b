//! The `check` command

use crate::args::CheckArgs;
use crate::input::{read_plan_text, read_rows};
use anyhow::{Context, Result, bail};
use planguard_analyzer::explain::parse_tabular_rows;
use planguard_analyzer::{
    AnalyzerConfig, BackendKind, ClassificationResult, ExecutionPlan, Rule, classify_all, normalize,
};
use serde::Serialize;

/// Verdict for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    pub rule: Rule,
    pub result: ClassificationResult,
}

/// Everything `check` found for one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub backend: BackendKind,
    pub query: Option<String>,
    /// Plan text as it was read
    pub plan: String,
    pub structured_rows: usize,
    pub results: Vec<RuleReport>,
}

impl CheckReport {
    /// Returns true if every rule passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.result.is_pass())
    }

    /// Number of rules that failed
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_fail()).count()
    }
}

/// Loads the config, reads the plan and runs the selected rules
pub fn run_check(args: &CheckArgs) -> Result<CheckReport> {
    let config = load_config(args)?;
    let backend = match args.backend.or(config.backend) {
        Some(backend) => backend,
        None => bail!("no backend given: pass --backend or set `backend` in the config file"),
    };
    let rules = config.resolve_rules()?;

    let text = read_plan_text(&args.plan)?;
    let raw_rows = if let Some(path) = &args.rows {
        Some(read_rows(path)?)
    } else if args.rows_from_table {
        Some(parse_tabular_rows(&text))
    } else {
        None
    };

    let plan: ExecutionPlan = normalize(backend, &text, raw_rows.as_deref());
    tracing::info!(
        backend = %backend,
        rules = rules.len(),
        structured_rows = plan.rows.len(),
        "checking plan"
    );

    let results = classify_all(&plan, &rules)
        .into_iter()
        .map(|(rule, result)| RuleReport { rule, result })
        .collect();

    Ok(CheckReport {
        backend,
        query: args.query.clone(),
        structured_rows: plan.rows.len(),
        plan: text,
        results,
    })
}

/// Config file first, then command-line overrides
fn load_config(args: &CheckArgs) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if let Some(max_rows) = args.max_rows {
        config.row_threshold = max_rows;
    }
    if !args.rules.is_empty() {
        config.rules = args.rules.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
