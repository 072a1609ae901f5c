//! Shared utilities for `bug_query`.
//!
//! - Content hashing (SHA256) for derived record identifiers
//! - Date parsing for date-valued filter clauses

pub mod hash;
pub mod time;

pub use hash::{content_hash, derived_record_id};
pub use time::{normalize_date_value, normalize_date_value_at};
