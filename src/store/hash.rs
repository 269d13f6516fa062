//! Content hashing for stored query revisions.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the SHA256 revision of a serializable document.
///
/// The value is serialized to JSON before hashing, so equal documents get
/// equal revisions. Returns a 64-character lowercase hexadecimal string.
///
/// # Errors
/// Returns an error if the value cannot be serialized to JSON.
pub fn compute_revision<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
