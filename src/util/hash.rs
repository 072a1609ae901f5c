//! Content hashing for records that arrive without an identifier.
//!
//! Uses SHA256 over the compact JSON text of the payload, so the same
//! payload always yields the same identifier across runs.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Prefix for identifiers derived from record content.
pub const DERIVED_ID_PREFIX: &str = "local-";

/// Hex characters of the digest kept in a derived identifier.
const DERIVED_ID_LEN: usize = 12;

/// Compute the SHA256 content hash of a JSON payload (64 hex chars).
#[must_use]
pub fn content_hash(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Derive a stable record identifier (`local-<12 hex>`) from a payload.
#[must_use]
pub fn derived_record_id(value: &Value) -> String {
    let hash = content_hash(value);
    format!("{DERIVED_ID_PREFIX}{}", &hash[..DERIVED_ID_LEN])
}
