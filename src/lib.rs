//! `issue_tracker` - a project-scoped issue record store.
//!
//! Issues live inside named projects. The [`tracker::IssueStore`] composes
//! creation validation ([`validation`]), list filtering ([`filter`]) and
//! partial-update resolution ([`update`]) on top of a pluggable
//! [`storage::ProjectStore`] backend.
//!
//! Every operation returns either a value or a [`TrackerError`]. Domain
//! errors carry a JSON payload ([`TrackerError::payload`]) that transports
//! hand back to callers verbatim.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod storage;
pub mod tracker;
pub mod update;
pub mod util;
pub mod validation;

pub use error::{ErrorCode, Result, StructuredError, TrackerError};
pub use model::{Ack, FieldValue, Fields, Issue, IssueField, Project};
pub use tracker::IssueStore;
