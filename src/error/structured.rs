//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::QueryError;
use crate::query::LogicalField;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Ingestion Errors (exit code 2) ===
    /// Records file not found
    RecordsNotFound,
    /// Records could not be decoded
    RecordParseError,

    // === Query Input Errors (exit code 4) ===
    /// Unknown logical field
    UnknownField,
    /// Malformed filter clause
    InvalidClause,
    /// Malformed sort direction
    InvalidSortDirection,
    /// Malformed date value
    InvalidDate,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,
    /// Config parse error
    ConfigParseError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RecordsNotFound => "RECORDS_NOT_FOUND",
            Self::RecordParseError => "RECORD_PARSE_ERROR",
            Self::UnknownField => "UNKNOWN_FIELD",
            Self::InvalidClause => "INVALID_CLAUSE",
            Self::InvalidSortDirection => "INVALID_SORT_DIRECTION",
            Self::InvalidDate => "INVALID_DATE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ConfigParseError => "CONFIG_PARSE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether fixing the input and retrying can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UnknownField
                | Self::InvalidClause
                | Self::InvalidSortDirection
                | Self::InvalidDate
        )
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Ingestion errors
    /// - 4: Query input errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::RecordsNotFound | Self::RecordParseError => 2,
            Self::UnknownField
            | Self::InvalidClause
            | Self::InvalidSortDirection
            | Self::InvalidDate => 4,
            Self::ConfigError | Self::ConfigParseError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
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
    /// Create a new structured error from a `QueryError`.
    #[must_use]
    pub fn from_error(err: &QueryError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
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

    fn extract_code_and_context(err: &QueryError) -> (ErrorCode, Option<Value>) {
        match err {
            QueryError::RecordsNotFound { path } => (
                ErrorCode::RecordsNotFound,
                Some(json!({"path": path.display().to_string()})),
            ),
            QueryError::RecordParse { line, reason } => (
                ErrorCode::RecordParseError,
                Some(json!({"line": line, "reason": reason})),
            ),
            QueryError::UnknownField { name } => (
                ErrorCode::UnknownField,
                Some(json!({
                    "provided": name,
                    "valid_values": known_field_names(),
                })),
            ),
            QueryError::InvalidClause { spec, reason } => (
                ErrorCode::InvalidClause,
                Some(json!({"spec": spec, "reason": reason})),
            ),
            QueryError::InvalidSortDirection { direction } => (
                ErrorCode::InvalidSortDirection,
                Some(json!({"provided": direction, "valid_values": ["asc", "desc"]})),
            ),
            QueryError::InvalidDate { field, reason } => (
                ErrorCode::InvalidDate,
                Some(json!({"field": field, "reason": reason})),
            ),
            QueryError::Config(_) => (ErrorCode::ConfigError, None),
            QueryError::Yaml(_) => (ErrorCode::ConfigParseError, None),
            QueryError::Io(_) => (ErrorCode::IoError, None),
            QueryError::Json(_) => (ErrorCode::JsonError, None),
            QueryError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    fn generate_hint(err: &QueryError) -> Option<String> {
        if let QueryError::UnknownField { name } = err {
            let similar = find_similar_names(name, &known_field_names(), 2);
            if let Some(best) = similar.first() {
                return Some(format!("Did you mean '{best}'?"));
            }
        }
        if let QueryError::RecordParse { line, .. } = err {
            return Some(format!("Check line {line} of the records file for syntax errors."));
        }

        err.suggestion().map(str::to_string)
    }
}

fn known_field_names() -> Vec<String> {
    LogicalField::KNOWN
        .iter()
        .map(|field| field.as_str().to_string())
        .collect()
}

// === Levenshtein Distance ===

/// Calculate the Levenshtein distance between two strings.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Find names similar to `searched` (case-insensitive Levenshtein distance <= 3).
pub fn find_similar_names(
    searched: &str,
    existing: &[String],
    max_suggestions: usize,
) -> Vec<String> {
    let needle = searched.to_lowercase();
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|name| (levenshtein_distance(&needle, &name.to_lowercase()), name.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}
