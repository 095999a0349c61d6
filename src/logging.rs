//! Logging setup.
//!
//! All diagnostics go to stderr (or a log file) so that stdout stays a clean
//! JSON payload stream.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

const CRATE_TARGET: &str = "issue_tracker";

/// Map CLI verbosity flags to a default filter directive.
///
/// `RUST_LOG` always wins when set.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => "warn".to_string(),
        1 => format!("warn,{CRATE_TARGET}=debug"),
        _ => format!("debug,{CRATE_TARGET}=trace"),
    }
}

/// Initialize the global tracing subscriber.
///
/// Log files receive JSON lines; stderr receives the human format.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose, quiet)))?;

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        fmt()
            .json()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()?;
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(verbose > 1)
            .try_init()?;
    }

    Ok(())
}

/// Install a test-friendly subscriber exactly once.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(format!("{CRATE_TARGET}=debug"))),
            )
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_verbosity() {
        assert_eq!(default_directive(2, true), "error");
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_directive(0, false), "warn");
        assert_eq!(default_directive(1, false), "warn,issue_tracker=debug");
        assert_eq!(default_directive(3, false), "debug,issue_tracker=trace");
    }
}
