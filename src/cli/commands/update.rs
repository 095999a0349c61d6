//! Update command implementation.

use super::{emit_outcome, open_store};
use crate::cli::UpdateArgs;
use crate::config;
use crate::error::Result;

/// Execute the update command.
///
/// Blank values leave their field unchanged. Prints the acknowledgment or
/// the error payload.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written, or if
/// `--body` is malformed.
pub fn execute(args: &UpdateArgs, pretty: bool, cli: &config::CliOverrides) -> Result<()> {
    let fields = args.to_fields()?;
    let store = open_store(cli)?;
    emit_outcome(store.update(&args.project, &fields), pretty)
}
