//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use planguard_analyzer::BackendKind;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "planguard",
    version,
    about = "Check saved EXPLAIN output against query plan rules"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one plan against the selected rules
    Check(CheckArgs),
    /// List the available rules
    Rules,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Backend that produced the plan (mysql, postgres, sqlite, generic)
    #[arg(long)]
    pub backend: Option<BackendKind>,

    /// File holding the plan text, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub plan: String,

    /// JSON file with structured EXPLAIN rows (an array of objects)
    #[arg(long, conflicts_with = "rows_from_table")]
    pub rows: Option<PathBuf>,

    /// Read structured rows from the plan text itself (MySQL tabular EXPLAIN)
    #[arg(long)]
    pub rows_from_table: bool,

    /// Rule to run; repeat to run several. Defaults to every rule.
    #[arg(long = "rule", value_name = "RULE")]
    pub rules: Vec<String>,

    /// Largest per-step row estimate accepted by the row_count rule
    #[arg(long)]
    pub max_rows: Option<u64>,

    /// Query text to include in failure messages
    #[arg(long)]
    pub query: Option<String>,

    /// TOML configuration file
    #[arg(long, env = "PLANGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
