//! Logging setup for the planguard binary
//!
//! Logs go to stderr so stdout stays clean for table/JSON output. `RUST_LOG`
//! overrides the verbosity flags.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,planguard_cli=debug,planguard_analyzer=debug",
        _ => "warn,planguard_cli=trace,planguard_analyzer=trace",
    }
}

/// Installs the global subscriber. Safe to call once per process.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .compact();

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }
}
