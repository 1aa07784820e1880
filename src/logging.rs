//! Logging setup. Logs always go to stderr so stdout stays usable for JSON.

use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "ERRSCAN_LOG";

/// Default filter when neither `--debug` nor a log variable is set
const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber. Safe to call more than once.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}
