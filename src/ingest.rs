//! Loading record exports from disk or stdin.
//!
//! Accepted layouts:
//! - a JSON array of record objects
//! - an object wrapping that array under `bugs`, `data`, `items` or `records`
//! - a single record object
//! - JSONL, one record object per line
//!
//! Anything that is not a JSON object where a record is expected is skipped
//! with a warning. Decoding individual records never fails; see
//! [`Record::from_value`].

use crate::error::{QueryError, Result};
use crate::model::Record;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Keys under which API responses wrap the record array.
pub const WRAPPER_KEYS: [&str; 4] = ["bugs", "data", "items", "records"];

/// Read records from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, or is not valid
/// JSON / JSONL.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !path.is_file() {
            return Err(QueryError::RecordsNotFound {
                path: path.to_path_buf(),
            });
        }
        fs::read_to_string(path)?
    };

    let records = parse_records(&contents)?;
    debug!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}

/// Parse an export held in memory.
///
/// # Errors
///
/// Returns [`QueryError::RecordParse`] with the offending line if the text is
/// neither a JSON document nor JSONL.
pub fn parse_records(contents: &str) -> Result<Vec<Record>> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(contents) {
        Ok(document) => Ok(records_from_document(document)),
        Err(err) if trimmed.starts_with('{') => {
            debug!(error = %err, "Not a single JSON document, reading as JSONL");
            parse_jsonl(contents)
        }
        Err(err) => Err(QueryError::RecordParse {
            line: err.line(),
            reason: err.to_string(),
        }),
    }
}

fn parse_jsonl(contents: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|err| QueryError::RecordParse {
            line: index + 1,
            reason: err.to_string(),
        })?;
        push_record(&mut records, value, index + 1);
    }
    Ok(records)
}

fn records_from_document(document: Value) -> Vec<Record> {
    match document {
        Value::Array(items) => items_to_records(items),
        Value::Object(mut object) => {
            let wrapped = WRAPPER_KEYS
                .iter()
                .find(|key| object.get(**key).is_some_and(Value::is_array));
            match wrapped.and_then(|key| object.remove(*key)) {
                Some(Value::Array(items)) => items_to_records(items),
                _ => vec![Record::from_value(&Value::Object(object))],
            }
        }
        other => {
            warn!(kind = json_kind(&other), "Export is not an object or array; no records read");
            Vec::new()
        }
    }
}

fn items_to_records(items: Vec<Value>) -> Vec<Record> {
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        push_record(&mut records, item, index + 1);
    }
    records
}

fn push_record(records: &mut Vec<Record>, value: Value, position: usize) {
    if value.is_object() {
        records.push(Record::from_value(&value));
    } else {
        warn!(position, kind = json_kind(&value), "Skipping non-object record");
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
