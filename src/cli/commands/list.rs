//! List command implementation.

use super::{emit, open_store};
use crate::cli::ListArgs;
use crate::config;
use crate::error::Result;
use crate::filter::IssueFilter;

/// Execute the list command.
///
/// Positional and `--filter` constraints are combined; all must match.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or read.
pub fn execute(args: &ListArgs, pretty: bool, cli: &config::CliOverrides) -> Result<()> {
    let filter = build_filter(args);
    if filter.has_unknown_fields() {
        tracing::debug!(project = %args.project, "Filter names an unknown field; no issue can match");
    }

    let store = open_store(cli)?;
    let issues = store.list(&args.project, &filter)?;
    emit(&issues, pretty)
}

fn build_filter(args: &ListArgs) -> IssueFilter {
    IssueFilter::from_pairs(args.constraints.iter().chain(&args.filters).cloned())
}
