//! Predicate evaluation of filter clauses against records.

use super::accessor::resolve;
use super::field::{FieldValue, LogicalField};
use super::state::FilterClause;
use crate::model::{Record, split_delimited};
use tracing::warn;

/// Whether `record` satisfies `clause`.
///
/// Inactive clauses are satisfied by every record. When a key feeding the
/// clause's field was malformed on ingestion, the clause is satisfied and a
/// warning is logged. A record with no value passes unless the field is
/// strict ([`LogicalField::is_strict`]).
#[must_use]
pub fn matches(record: &Record, clause: &FilterClause) -> bool {
    let Some(field) = clause.field.as_ref() else {
        return true;
    };
    let needle = clause.value.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    // Only the field's own keys count here. A record that is not an object
    // at all resolves to absent and goes through the strictness rule.
    if let Some(key) = field
        .source_keys()
        .iter()
        .find(|key| record.malformed.contains(**key))
    {
        warn!(
            record = %record.id,
            field = %field,
            key,
            "Malformed value, letting record through filter"
        );
        return true;
    }

    let value = resolve(record, field);
    if value.is_empty() {
        return !field.is_strict();
    }

    match field {
        LogicalField::Status | LogicalField::Priority => value.to_text().to_lowercase() == needle,
        LogicalField::Tags => tag_items(&value)
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle)),
        LogicalField::Assignee | LogicalField::CreatedBy => value
            .items()
            .iter()
            .any(|name| name.to_lowercase().contains(&needle)),
        _ => value.to_text().to_lowercase().contains(&needle),
    }
}

/// Whether `record` satisfies every active clause.
#[must_use]
pub fn matches_all(record: &Record, clauses: &[FilterClause]) -> bool {
    clauses
        .iter()
        .filter(|clause| clause.is_active())
        .all(|clause| matches(record, clause))
}

fn tag_items<'a>(value: &FieldValue<'a>) -> Vec<&'a str> {
    match value {
        FieldValue::Text(raw) => split_delimited(*raw),
        FieldValue::List(_) | FieldValue::Absent => value.items(),
    }
}
