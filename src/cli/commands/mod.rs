//! Command implementations.
//!
//! Every command prints exactly one JSON document on stdout. Domain errors
//! (missing fields, unknown ids) are printed as their payload and are not
//! failures of the command; only infrastructure errors propagate.

pub mod create;
pub mod delete;
pub mod list;
pub mod projects;
pub mod update;

use crate::config::{self, CliOverrides, DynIssueStore, TrackerConfig};
use crate::error::Result;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Load layered config from the current directory and open the store.
///
/// # Errors
///
/// Returns config, I/O or database errors.
pub fn open_store(cli: &CliOverrides) -> Result<DynIssueStore> {
    let root = Path::new(".");
    let layer = config::load_config(root, cli)?;
    let tracker_config = TrackerConfig::from_layer(&layer, root)?;
    config::open_store(&tracker_config)
}

/// Print an operation outcome: the value on success, the payload on a
/// domain error.
///
/// # Errors
///
/// Returns infrastructure errors unchanged, or a write/serialization error.
pub fn emit_outcome<T: Serialize>(outcome: Result<T>, pretty: bool) -> Result<()> {
    match outcome {
        Ok(value) => emit(&value, pretty),
        Err(err) => match err.payload() {
            Some(payload) => {
                tracing::debug!(error = %err, "Reporting domain error as payload");
                emit(&payload, pretty)
            }
            None => Err(err),
        },
    }
}

/// Print one JSON document on stdout.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = render(value, pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
