//! Partial update resolution.
//!
//! Turns a submitted field mapping into the list of changes to apply to an
//! existing issue. A submitted field takes part in the change set only if:
//!
//! - it is not `_id` (the id locates the issue, it is never rewritten)
//! - its value is not the empty string (blank means leave unchanged)
//! - it names a writable field (`created_on`, `updated_on` and unknown
//!   names are dropped)
//!
//! An empty change set is reported as `NoUpdateFields`.

use crate::error::{Result, TrackerError};
use crate::model::{Fields, Issue, IssueField};
use crate::validation::IssueValidator;
use tracing::trace;

/// New value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewValue {
    Text(String),
    Open(bool),
}

/// One resolved change with the value it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: IssueField,
    pub old_value: String,
    pub new_value: NewValue,
}

/// Non-empty, ordered set of changes for one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<IssueField> {
        self.changes.iter().map(|change| change.field).collect()
    }

    /// Write every change into `issue`. Does not touch `updated_on`.
    pub fn apply_to(&self, issue: &mut Issue) {
        for change in &self.changes {
            match &change.new_value {
                NewValue::Open(open) => issue.open = *open,
                NewValue::Text(text) => {
                    if let Some(slot) = issue.text_mut(change.field) {
                        slot.clone_from(text);
                    }
                }
            }
        }
    }
}

/// Compute the change set for `submitted` against `existing`.
///
/// Besides `_id` and blank values, unknown names and the timestamps
/// `created_on`/`updated_on` are skipped too, so `{_id, foo: "x"}` is a
/// `NoUpdateFields` submission rather than a silent success.
///
/// Later submissions of the same field replace earlier ones, since
/// [`Fields`] keeps one value per name.
///
/// # Errors
///
/// - `NoUpdateFields` if nothing applicable was submitted
/// - `InvalidField` if `open` carries a string other than `"true"`/`"false"`
pub fn resolve_update(existing: &Issue, submitted: &Fields) -> Result<ChangeSet> {
    let mut changes = Vec::new();

    for (name, value) in submitted.iter() {
        let Some(field) = IssueField::parse(name) else {
            trace!(field = name, "Ignoring unknown update field");
            continue;
        };
        if field == IssueField::Id || value.is_blank() {
            continue;
        }
        if !field.is_writable() {
            trace!(field = name, "Ignoring read-only update field");
            continue;
        }

        let new_value = if field == IssueField::Open {
            NewValue::Open(IssueValidator::parse_open(&existing.id, value)?)
        } else {
            NewValue::Text(value.to_text())
        };

        changes.push(FieldChange {
            field,
            old_value: existing.field_string(field),
            new_value,
        });
    }

    if changes.is_empty() {
        return Err(TrackerError::NoUpdateFields {
            id: existing.id.clone(),
        });
    }

    Ok(ChangeSet { changes })
}
