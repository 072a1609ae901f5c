//! Field accessor: resolves a logical field against a record.
//!
//! Each logical field has one extractor that probes the record's physical
//! representations in priority order and returns the first non-empty value.

use super::field::{FieldValue, LogicalField};
use crate::model::{Person, Record, Tags};

type Extractor = for<'a> fn(&'a Record) -> FieldValue<'a>;

/// Default task type for records that carry none.
pub const DEFAULT_TASK_TYPE: &str = "Bug";

fn extractor(field: &LogicalField) -> Extractor {
    match field {
        LogicalField::Status => status,
        LogicalField::Assignee => assignee,
        LogicalField::Priority => priority,
        LogicalField::Tags => tags,
        LogicalField::DueDate => due_date,
        LogicalField::TaskType => task_type,
        LogicalField::CreatedBy => created_by,
        LogicalField::DateClosed => date_closed,
        LogicalField::DateCreated => date_created,
        LogicalField::Unrecognized(_) => absent,
    }
}

/// Resolve `field` on `record`. Total: missing or malformed data is [`FieldValue::Absent`].
#[must_use]
pub fn resolve<'a>(record: &'a Record, field: &LogicalField) -> FieldValue<'a> {
    extractor(field)(record)
}

fn status(record: &Record) -> FieldValue<'_> {
    text(record.status.as_deref())
}

fn priority(record: &Record) -> FieldValue<'_> {
    text(record.priority.as_deref())
}

fn due_date(record: &Record) -> FieldValue<'_> {
    text(record.due_date.as_deref())
}

fn date_closed(record: &Record) -> FieldValue<'_> {
    text(record.closed_date.as_deref())
}

fn date_created(record: &Record) -> FieldValue<'_> {
    text(record.created_at.as_deref())
}

fn task_type(record: &Record) -> FieldValue<'_> {
    FieldValue::Text(non_blank(record.record_type.as_deref()).unwrap_or(DEFAULT_TASK_TYPE))
}

fn assignee(record: &Record) -> FieldValue<'_> {
    let assigned_to = record.assigned_to.as_ref();
    let assignee = record.assignee.as_ref();

    assigned_to
        .and_then(Person::name)
        .or_else(|| assigned_to.and_then(Person::username))
        .or_else(|| assignee.and_then(Person::name))
        .or_else(|| assignee.and_then(Person::username))
        .or_else(|| non_blank(record.assigned_name.as_deref()))
        .map(FieldValue::Text)
        .or_else(|| assigned_to.and_then(bare_person))
        .or_else(|| assignee.and_then(bare_person))
        .unwrap_or(FieldValue::Absent)
}

fn created_by(record: &Record) -> FieldValue<'_> {
    let creator = record.created_by.as_ref();

    creator
        .and_then(Person::name)
        .or_else(|| creator.and_then(Person::username))
        .map(FieldValue::Text)
        .or_else(|| creator.and_then(bare_person))
        .unwrap_or(FieldValue::Absent)
}

fn tags(record: &Record) -> FieldValue<'_> {
    match &record.tags {
        Some(list @ Tags::List(_)) => {
            let items = list.items();
            if items.is_empty() {
                FieldValue::Absent
            } else {
                FieldValue::List(items)
            }
        }
        Some(Tags::Delimited(raw)) => text(Some(raw)),
        None => FieldValue::Absent,
    }
}

fn absent(_: &Record) -> FieldValue<'_> {
    FieldValue::Absent
}

/// String form of a person that is not an object: a plain name, or the
/// names of an assignee array.
fn bare_person(person: &Person) -> Option<FieldValue<'_>> {
    match person {
        Person::Name(_) => person.as_plain().map(FieldValue::Text),
        Person::Many(_) => {
            let names = person.names();
            (!names.is_empty()).then_some(FieldValue::List(names))
        }
        Person::Profile(_) => None,
    }
}

fn text(value: Option<&str>) -> FieldValue<'_> {
    non_blank(value).map_or(FieldValue::Absent, FieldValue::Text)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
