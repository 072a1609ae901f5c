//! Error types and handling for `bug_query`.
//!
//! The query engine itself never fails: malformed records degrade to empty
//! values and the executor returns whatever it can. Errors only exist at the
//! edges, where records are loaded, configuration is read, and user input
//! (field names, clause specs, dates) is parsed.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration through [`QueryError::Other`]
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output via [`StructuredError`]

mod structured;

pub use structured::{ErrorCode, StructuredError, find_similar_names};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `bug_query` operations.
#[derive(Error, Debug)]
pub enum QueryError {
    // === Ingestion Errors ===
    /// Record export file not found.
    #[error("Records file not found: '{path}'")]
    RecordsNotFound { path: PathBuf },

    /// A record export could not be decoded.
    #[error("Record parse error at line {line}: {reason}")]
    RecordParse { line: usize, reason: String },

    // === Query Input Errors ===
    /// Field name does not name a logical field.
    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    /// A `<Field>=<value>` clause spec could not be parsed.
    #[error("Invalid filter clause '{spec}': {reason}")]
    InvalidClause { spec: String, reason: String },

    /// Sort direction is neither ascending nor descending.
    #[error("Invalid sort direction: {direction}")]
    InvalidSortDirection { direction: String },

    /// A date clause value could not be interpreted.
    #[error("Invalid date for {field}: {reason}")]
    InvalidDate { field: String, reason: String },

    // === Configuration Errors ===
    /// Configuration file error.
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

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QueryError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RecordsNotFound { .. }
                | Self::RecordParse { .. }
                | Self::UnknownField { .. }
                | Self::InvalidClause { .. }
                | Self::InvalidSortDirection { .. }
                | Self::InvalidDate { .. }
                | Self::Config(_)
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::RecordsNotFound { .. } => {
                Some("Pass a JSON or JSONL export of bug records, or '-' for stdin")
            }
            Self::UnknownField { .. } => Some("Run: bq fields"),
            Self::InvalidClause { .. } => Some("Write filters as --filter \"Status=open\""),
            Self::InvalidSortDirection { .. } => Some("Use asc or desc"),
            Self::InvalidDate { .. } => {
                Some("Use YYYY-MM-DD, today, tomorrow, yesterday, or an offset like +3d / -1w")
            }
            _ => None,
        }
    }

    /// Create an unknown-field error.
    #[must_use]
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Create an invalid-clause error.
    #[must_use]
    pub fn invalid_clause(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidClause {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `QueryError`.
pub type Result<T> = std::result::Result<T, QueryError>;
