//! Validation helpers for `issue_tracker`.
//!
//! These routines enforce issue creation constraints and return
//! errors without touching storage.

use crate::error::{Result, TrackerError};
use crate::model::{FieldValue, Fields, IssueField, NewIssue};

/// Validates creation submissions.
pub struct IssueValidator;

impl IssueValidator {
    /// Check required fields and fill defaults for optional ones.
    ///
    /// `issue_title`, `issue_text` and `created_by` must each be submitted as
    /// non-empty strings. `assigned_to` and `status_text` default to `""`.
    /// Any other submitted key is ignored; new issues always start open.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::MissingFields` if any required field is absent
    /// or empty.
    pub fn validate_create(fields: &Fields) -> Result<NewIssue> {
        let missing: Vec<&str> = IssueField::REQUIRED
            .iter()
            .filter(|field| required_text(fields, **field).is_none())
            .map(IssueField::as_str)
            .collect();

        if !missing.is_empty() {
            tracing::debug!(?missing, "Rejected create: required field(s) missing");
            return Err(TrackerError::MissingFields);
        }

        Ok(NewIssue {
            issue_title: required_text(fields, IssueField::IssueTitle).unwrap_or_default(),
            issue_text: required_text(fields, IssueField::IssueText).unwrap_or_default(),
            created_by: required_text(fields, IssueField::CreatedBy).unwrap_or_default(),
            assigned_to: optional_text(fields, IssueField::AssignedTo),
            status_text: optional_text(fields, IssueField::StatusText),
        })
    }

    /// Interpret a submitted `open` value.
    ///
    /// Accepts a boolean or the strings `"true"` / `"false"`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidField` for any other string.
    pub fn parse_open(id: &str, value: &FieldValue) -> Result<bool> {
        match value {
            FieldValue::Flag(flag) => Ok(*flag),
            FieldValue::Text(text) => match text.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(TrackerError::invalid_field(
                    id,
                    IssueField::Open.as_str(),
                    format!("expected true or false, got '{text}'"),
                )),
            },
        }
    }
}

fn required_text(fields: &Fields, field: IssueField) -> Option<String> {
    fields
        .text(field)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn optional_text(fields: &Fields, field: IssueField) -> String {
    fields
        .get(field.as_str())
        .map(FieldValue::to_text)
        .unwrap_or_default()
}
