//! Structured error output.
//!
//! Two renderings exist for a [`TrackerError`]:
//!
//! - [`ErrorPayload`]: the `{error, _id}` body returned to callers for
//!   expected domain outcomes. Transports emit it as a normal response.
//! - [`StructuredError`]: a machine-parseable report (code, message, hint,
//!   retryability) for infrastructure failures that abort the request.

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Request Errors (exit code 0: reported as payloads) ===
    /// Required creation field missing
    RequiredField,
    /// Update/delete submitted without an identifier
    MissingId,
    /// Update target not found
    UpdateFailed,
    /// Delete target not found
    DeleteFailed,
    /// Update carried no applicable fields
    NoUpdateFields,
    /// Value not storable in the named field
    InvalidField,

    // === Storage Errors (exit code 2) ===
    /// Database operation failed
    DatabaseError,
    /// Storage lock poisoned
    LockPoisoned,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,
}

impl ErrorCode {
    /// Classify an error.
    #[must_use]
    pub const fn from_error(err: &TrackerError) -> Self {
        match err {
            TrackerError::MissingFields => Self::RequiredField,
            TrackerError::MissingId => Self::MissingId,
            TrackerError::UpdateFailed { .. } => Self::UpdateFailed,
            TrackerError::DeleteFailed { .. } => Self::DeleteFailed,
            TrackerError::NoUpdateFields { .. } => Self::NoUpdateFields,
            TrackerError::InvalidField { .. } => Self::InvalidField,
            TrackerError::Database(_) => Self::DatabaseError,
            TrackerError::LockPoisoned(_) => Self::LockPoisoned,
            TrackerError::Config(_) => Self::ConfigError,
            TrackerError::Io(_) => Self::IoError,
            TrackerError::Json(_) => Self::JsonError,
            TrackerError::Yaml(_) => Self::YamlError,
        }
    }

    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredField => "REQUIRED_FIELD",
            Self::MissingId => "MISSING_ID",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::NoUpdateFields => "NO_UPDATE_FIELDS",
            Self::InvalidField => "INVALID_FIELD",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::LockPoisoned => "LOCK_POISONED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
        }
    }

    /// Whether retrying (after waiting or fixing input) may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequiredField
                | Self::MissingId
                | Self::NoUpdateFields
                | Self::InvalidField
                | Self::DatabaseError
        )
    }

    /// Process exit code for this error category.
    ///
    /// Request errors are delivered as payloads, so they exit cleanly.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::RequiredField
            | Self::MissingId
            | Self::UpdateFailed
            | Self::DeleteFailed
            | Self::NoUpdateFields
            | Self::InvalidField => 0,
            Self::DatabaseError | Self::LockPoisoned => 2,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
        }
    }
}

/// Response body for a domain error.
///
/// `_id` echoes the submitted identifier whenever the error refers to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorPayload {
    #[must_use]
    pub fn new(error: &str, id: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            id: id.map(str::to_string),
            field: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }
}

/// Structured error for machine-parseable diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `TrackerError`.
    #[must_use]
    pub fn from_error(err: &TrackerError) -> Self {
        let code = ErrorCode::from_error(err);
        let context = match err {
            TrackerError::InvalidField { id, field, reason } => {
                Some(json!({"_id": id, "field": field, "reason": reason}))
            }
            other => other.id().map(|id| json!({"_id": id})),
        };

        Self {
            code,
            message: err.to_string(),
            hint: hint_for(code).map(str::to_string),
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }
        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }
}

const fn hint_for(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::RequiredField => Some("Provide issue_title, issue_text and created_by"),
        ErrorCode::MissingId => Some("Pass the issue _id (see: itr list <project>)"),
        ErrorCode::NoUpdateFields => Some("Submit at least one non-blank field to change"),
        ErrorCode::InvalidField => Some("The open field accepts true or false"),
        ErrorCode::DatabaseError => Some("Check --db or raise --lock-timeout and retry"),
        ErrorCode::ConfigError => {
            Some("Check .issue-tracker/config.yaml and ISSUE_TRACKER_* variables")
        }
        _ => None,
    }
}
