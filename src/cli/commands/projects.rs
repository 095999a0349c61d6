//! Projects command implementation.

use super::{emit, open_store};
use crate::config;
use crate::error::Result;

/// Execute the projects command: print all project names, sorted.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or read.
pub fn execute(pretty: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = open_store(cli)?;
    emit(&store.projects()?, pretty)
}
