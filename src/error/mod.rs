//! Error types and handling for `issue_tracker`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Domain errors (missing fields, unknown ids, empty updates) are expected
//!   outcomes and carry a wire payload via [`TrackerError::payload`]
//! - Infrastructure errors (storage, I/O, config) have no payload and are
//!   rendered by [`StructuredError`] instead

mod structured;

pub use structured::{ErrorCode, ErrorPayload, StructuredError};

use thiserror::Error;

/// Primary error type for `issue_tracker` operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // === Domain Errors ===
    /// One or more of `issue_title`, `issue_text`, `created_by` absent or empty.
    #[error("required field(s) missing")]
    MissingFields,

    /// Update or delete submitted without an `_id`.
    #[error("missing _id")]
    MissingId,

    /// Target project or issue not found on update.
    #[error("could not update: {id}")]
    UpdateFailed { id: String },

    /// Target project or issue not found on delete.
    #[error("could not delete: {id}")]
    DeleteFailed { id: String },

    /// Every submitted field was blank, read-only, or the identifier.
    #[error("no update field(s) sent: {id}")]
    NoUpdateFields { id: String },

    /// A submitted value cannot be stored in the named field.
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        id: String,
        field: String,
        reason: String,
    },

    // === Storage Errors ===
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A storage lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),

    // === Configuration Errors ===
    /// Configuration value or file error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TrackerError {
    /// True for expected outcomes that are reported to the caller as a payload.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::MissingFields
                | Self::MissingId
                | Self::UpdateFailed { .. }
                | Self::DeleteFailed { .. }
                | Self::NoUpdateFields { .. }
                | Self::InvalidField { .. }
        )
    }

    /// The identifier this error refers to, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::UpdateFailed { id }
            | Self::DeleteFailed { id }
            | Self::NoUpdateFields { id }
            | Self::InvalidField { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Wire payload for domain errors; `None` for infrastructure failures.
    #[must_use]
    pub fn payload(&self) -> Option<ErrorPayload> {
        let payload = match self {
            Self::MissingFields => ErrorPayload::new("required field(s) missing", None),
            Self::MissingId => ErrorPayload::new("missing _id", None),
            Self::UpdateFailed { id } => ErrorPayload::new("could not update", Some(id)),
            Self::DeleteFailed { id } => ErrorPayload::new("could not delete", Some(id)),
            Self::NoUpdateFields { id } => ErrorPayload::new("no update field(s) sent", Some(id)),
            Self::InvalidField { id, field, .. } => {
                ErrorPayload::new("invalid field value", Some(id)).with_field(field)
            }
            _ => return None,
        };
        Some(payload)
    }

    /// Create an invalid-field error.
    #[must_use]
    pub fn invalid_field(
        id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            id: id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Exit code for infrastructure failures surfaced by the CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        ErrorCode::from_error(self).exit_code()
    }
}

impl<T> From<std::sync::PoisonError<T>> for TrackerError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned(err.to_string())
    }
}

/// Result type using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;
