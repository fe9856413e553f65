//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout stays clean for reports and JSON.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "imgpin=debug"
    } else {
        "imgpin=warn"
    }
}

/// Install the global subscriber; `RUST_LOG` takes precedence
pub fn init(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());

    // A subscriber installed earlier (e.g. by a test harness) stays in place
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
