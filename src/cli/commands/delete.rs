//! Delete command implementation.

use super::{emit_outcome, open_store};
use crate::cli::DeleteArgs;
use crate::config;
use crate::error::Result;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written, or if
/// `--body` is malformed.
pub fn execute(args: &DeleteArgs, pretty: bool, cli: &config::CliOverrides) -> Result<()> {
    let fields = args.to_fields()?;
    let store = open_store(cli)?;
    emit_outcome(store.delete(&args.project, &fields), pretty)
}
