//! SHA-256 checksum of a changeset body, used for change detection.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content checksum of a changeset body.
///
/// Computed over the body with `\r\n` folded to `\n` and trailing whitespace
/// trimmed, so that re-saving a changelog on another platform does not count
/// as a change. Compared as a plain string; a value read back from the history
/// store is taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Compute the checksum of a changeset body.
    pub fn compute(body: &str) -> Self {
        let normalized = body.replace("\r\n", "\n");
        let mut hasher = Sha256::new();
        hasher.update(normalized.trim_end().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wrap a checksum recorded elsewhere (history store, test fixtures).
    pub fn parse(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Return the checksum as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
