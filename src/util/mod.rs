//! Shared utilities for `issue_tracker`.
//!
//! - ID generation (SHA-256, 24 hex chars)

pub mod id;

pub use id::{IdGenerator, compute_id_hash, generate_id_seed, is_valid_id_format};
