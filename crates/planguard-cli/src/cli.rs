use clap::Parser;
use planguard_analyzer::rules::DEFAULT_ROW_THRESHOLD;
use planguard_cli::report::{render_json, render_rules, render_table};
use planguard_cli::{Cli, Command, OutputFormat, logging, run_check};
use std::process::ExitCode;

/// A rule failed
const EXIT_VIOLATION: u8 = 1;
/// The plan couldn't be evaluated at all
const EXIT_UNEVALUATED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Rules => {
            println!("{}", render_rules(DEFAULT_ROW_THRESHOLD));
            ExitCode::SUCCESS
        }
        Command::Check(args) => {
            let report = match run_check(&args) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(error = %e, "check could not complete");
                    eprintln!("error: {e:#}");
                    return ExitCode::from(EXIT_UNEVALUATED);
                }
            };

            match args.format {
                OutputFormat::Table => print!("{}", render_table(&report)),
                OutputFormat::Json => match render_json(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("error: failed to encode report: {e}");
                        return ExitCode::from(EXIT_UNEVALUATED);
                    }
                },
            }

            if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_VIOLATION)
            }
        }
    }
}
