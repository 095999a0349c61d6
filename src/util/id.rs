//! ID generation for issues.
//!
//! Issue ids are 24 lowercase hex characters derived from a SHA-256 hash of
//! the issue's content, its creation time and a nonce. Generation retries
//! nonces until the caller's collision check reports a free id, so an id is
//! never handed out twice by the same store.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Length of a generated id in hex characters.
pub const ID_LENGTH: usize = 24;

/// ID generator that produces unique issue IDs.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator;

impl IdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate a candidate ID with the given parameters.
    #[must_use]
    pub fn generate_candidate(
        &self,
        title: &str,
        text: &str,
        creator: &str,
        created_at: DateTime<Utc>,
        nonce: u32,
    ) -> String {
        let seed = generate_id_seed(title, text, creator, created_at, nonce);
        compute_id_hash(&seed)
    }

    /// Generate an ID, checking for collisions with the provided checker.
    ///
    /// The checker returns `Ok(true)` if the ID was already issued.
    ///
    /// # Errors
    ///
    /// Propagates the checker's error.
    pub fn generate<F, E>(
        &self,
        title: &str,
        text: &str,
        creator: &str,
        created_at: DateTime<Utc>,
        exists: F,
    ) -> Result<String, E>
    where
        F: Fn(&str) -> Result<bool, E>,
    {
        let mut nonce = 0u32;
        loop {
            let id = self.generate_candidate(title, text, creator, created_at, nonce);
            if !exists(&id)? {
                return Ok(id);
            }
            tracing::trace!(%id, nonce, "ID collision, retrying");
            nonce = nonce.wrapping_add(1);
        }
    }
}

/// Generate the seed string for ID generation.
///
/// Inputs: `title | text | creator | created_at (ns) | nonce`
#[must_use]
pub fn generate_id_seed(
    title: &str,
    text: &str,
    creator: &str,
    created_at: DateTime<Utc>,
    nonce: u32,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        title,
        text,
        creator,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

/// Hex-encode the first 12 bytes of the SHA-256 of `input`.
#[must_use]
pub fn compute_id_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex = format!("{digest:x}");
    hex[..ID_LENGTH].to_string()
}

/// Check the generated id shape (24 lowercase hex chars).
#[must_use]
pub fn is_valid_id_format(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
