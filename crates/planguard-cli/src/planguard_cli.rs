//! planguard CLI - check saved EXPLAIN output from the command line
//!
//! The binary lives in `cli.rs`; everything it does is exposed here so it can
//! be driven from integration tests.

pub mod args;
pub mod check;
pub mod input;
pub mod logging;
pub mod report;

pub use args::{CheckArgs, Cli, Command, OutputFormat};
pub use check::{CheckReport, RuleReport, run_check};
