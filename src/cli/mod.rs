//! CLI definitions and entry point.

use crate::error::Result;
use crate::model::{Fields, IssueField};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Project-scoped issue tracker (`SQLite` or in-memory)
#[derive(Parser, Debug)]
#[command(name = "itr", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: .issue-tracker/issues.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage backend: sqlite or memory
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an issue in a project
    Create(CreateArgs),

    /// List a project's issues, optionally filtered
    List(ListArgs),

    /// Update fields of an issue
    Update(UpdateArgs),

    /// Delete an issue
    Delete(DeleteArgs),

    /// List known projects
    Projects,
}

/// Issue field flags shared by create and update.
#[derive(Args, Debug, Default, Clone)]
pub struct IssueFieldArgs {
    /// Issue title
    #[arg(long)]
    pub title: Option<String>,

    /// Issue text
    #[arg(long)]
    pub text: Option<String>,

    /// Creator name
    #[arg(long)]
    pub created_by: Option<String>,

    /// Assignee name
    #[arg(long)]
    pub assigned_to: Option<String>,

    /// Free-form status
    #[arg(long)]
    pub status_text: Option<String>,

    /// Raw field (repeatable, format: name=value)
    #[arg(long = "field", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// Fields as a JSON object; flags take precedence
    #[arg(long)]
    pub body: Option<String>,
}

impl IssueFieldArgs {
    /// Merge body, raw fields and named flags, in increasing precedence.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if `--body` is not an object of scalar values.
    pub fn to_fields(&self) -> Result<Fields> {
        let mut fields = match &self.body {
            Some(body) => serde_json::from_str::<Fields>(body)?,
            None => Fields::new(),
        };
        for (name, value) in &self.fields {
            fields.insert(name.clone(), value.clone());
        }

        let named = [
            (IssueField::IssueTitle, &self.title),
            (IssueField::IssueText, &self.text),
            (IssueField::CreatedBy, &self.created_by),
            (IssueField::AssignedTo, &self.assigned_to),
            (IssueField::StatusText, &self.status_text),
        ];
        for (field, value) in named {
            if let Some(value) = value {
                fields.insert(field.as_str(), value.clone());
            }
        }
        Ok(fields)
    }
}

/// Arguments for the create command.
#[derive(Args, Debug, Default, Clone)]
pub struct CreateArgs {
    /// Project name (created if absent)
    pub project: String,

    #[command(flatten)]
    pub issue: IssueFieldArgs,
}

/// Arguments for the list command.
#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Project name
    pub project: String,

    /// Constraints as name=value (all must match)
    #[arg(value_parser = parse_key_value)]
    pub constraints: Vec<(String, String)>,

    /// Constraint (repeatable, format: name=value)
    #[arg(long = "filter", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,
}

/// Arguments for the update command.
#[derive(Args, Debug, Default, Clone)]
pub struct UpdateArgs {
    /// Project name
    pub project: String,

    /// Issue id
    #[arg(long)]
    pub id: Option<String>,

    /// Open state (true or false)
    #[arg(long)]
    pub open: Option<String>,

    #[command(flatten)]
    pub issue: IssueFieldArgs,
}

impl UpdateArgs {
    /// Submitted fields including `_id` and `open`.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if `--body` is malformed.
    pub fn to_fields(&self) -> Result<Fields> {
        let mut fields = self.issue.to_fields()?;
        if let Some(id) = &self.id {
            fields.insert(IssueField::Id.as_str(), id.clone());
        }
        if let Some(open) = &self.open {
            fields.insert(IssueField::Open.as_str(), open.clone());
        }
        Ok(fields)
    }
}

/// Arguments for the delete command.
#[derive(Args, Debug, Default, Clone)]
pub struct DeleteArgs {
    /// Project name
    pub project: String,

    /// Issue id
    #[arg(long)]
    pub id: Option<String>,

    /// Fields as a JSON object (only `_id` is used)
    #[arg(long)]
    pub body: Option<String>,
}

impl DeleteArgs {
    /// Submitted fields; `--id` overrides an `_id` in the body.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if `--body` is malformed.
    pub fn to_fields(&self) -> Result<Fields> {
        let mut fields = match &self.body {
            Some(body) => serde_json::from_str::<Fields>(body)?,
            None => Fields::new(),
        };
        if let Some(id) = &self.id {
            fields.insert(IssueField::Id.as_str(), id.clone());
        }
        Ok(fields)
    }
}

/// Parse `name=value`. The value may be empty or contain `=`.
///
/// # Errors
///
/// Returns a message if there is no `=` or the name is empty.
pub fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
