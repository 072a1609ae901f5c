//! Logging setup for the `bq` binary and tests.
//!
//! Logs always go to stderr so stdout stays clean for command output.

use anyhow::Context;
use std::io::{self, IsTerminal};
use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter directive for a verbosity setting.
///
/// `quiet` wins over `verbose`.
#[must_use]
pub const fn level_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the level picked from `verbose`/`quiet`. `json`
/// switches to JSON lines; unset means plain text.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool, json: Option<bool>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbose, quiet)));
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json.unwrap_or(false) {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(verbose > 1)
                    .with_ansi(io::stderr().is_terminal()),
            )
            .try_init()
    };
    installed.context("failed to install tracing subscriber")
}

static TEST_INIT: Once = Once::new();

/// Route logs through the test harness writer. Safe to call repeatedly.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_directive(0, false), "warn");
        assert_eq!(level_directive(1, false), "debug");
        assert_eq!(level_directive(2, false), "trace");
        assert_eq!(level_directive(5, false), "trace");
        assert_eq!(level_directive(2, true), "error");
    }

    #[test]
    fn test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("still fine");
    }
}
