//! Create command implementation.

use super::{emit_outcome, open_store};
use crate::cli::CreateArgs;
use crate::config;
use crate::error::Result;

/// Execute the create command.
///
/// Prints the created issue, or the error payload if validation fails.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written, or if
/// `--body` is malformed.
pub fn execute(args: &CreateArgs, pretty: bool, cli: &config::CliOverrides) -> Result<()> {
    let fields = args.issue.to_fields()?;
    let store = open_store(cli)?;
    emit_outcome(store.create(&args.project, &fields), pretty)
}
