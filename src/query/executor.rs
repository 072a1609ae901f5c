//! Query executor: search, filter, sort, then optionally group.
//!
//! The executor borrows records and never fails. Each stage is public so
//! callers can run part of the pipeline on their own.

use super::accessor::resolve;
use super::collate::{CollationKey, collation_key};
use super::field::LogicalField;
use super::predicate::matches_all;
use super::state::{Combinator, FilterClause, QueryState, SortDirection};
use crate::model::Record;
use indexmap::IndexMap;
use std::time::Instant;
use tracing::{debug, trace};

/// Raw keys the search stage reads.
pub const SEARCH_KEYS: [&str; 8] = [
    "title",
    "description",
    "assignedTo",
    "assignee",
    "createdBy",
    "status",
    "priority",
    "tags",
];

/// Records grouped by key, in order of first appearance.
pub type Groups<'a> = IndexMap<String, Vec<&'a Record>>;

/// Output of one query run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult<'a> {
    /// Matching records in sorted order.
    pub records: Vec<&'a Record>,
    /// Present only for [`execute_grouped`].
    pub groups: Option<Groups<'a>>,
}

impl QueryResult<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Run search, filter and sort over `records`.
pub fn execute<'a, I>(records: I, state: &QueryState) -> QueryResult<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let start = Instant::now();
    let input: Vec<&'a Record> = records.into_iter().collect();
    let total = input.len();

    let searched = search(input, state.search_text());
    let after_search = searched.len();
    let filtered = filter(searched, state.clauses());
    let after_filter = filtered.len();
    let sorted = sort(filtered, state.sort_field(), state.sort_direction());

    debug!(
        total,
        after_search,
        after_filter,
        sort_field = %state.sort_field(),
        sort_direction = %state.sort_direction(),
        elapsed_us = start.elapsed().as_micros(),
        "Executed query"
    );

    QueryResult {
        records: sorted,
        groups: None,
    }
}

/// Like [`execute`], then group the sorted records by the sort field.
pub fn execute_grouped<'a, I>(records: I, state: &QueryState) -> QueryResult<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut result = execute(records, state);
    result.groups = Some(group(&result.records, state.sort_field()));
    result
}

/// Keep records whose searchable text contains `text`, ignoring case.
///
/// Blank search text keeps everything. Records with a malformed searchable
/// key are dropped.
pub fn search<'a, I>(records: I, text: &str) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| search_matches(record, &needle))
        .collect()
}

fn search_matches(record: &Record, needle: &str) -> bool {
    if let Some(key) = SEARCH_KEYS.iter().find(|key| record.is_malformed(key)) {
        debug!(record = %record.id, key, "Malformed searchable value, excluding from search");
        return false;
    }

    let people = [&record.assigned_to, &record.assignee, &record.created_by];
    let names = people.into_iter().flatten().flat_map(|person| person.names());
    let tags = record.tags.iter().flat_map(|tags| tags.items());

    [&record.title, &record.description, &record.status, &record.priority]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .chain(names)
        .chain(tags)
        .any(|text| text.to_lowercase().contains(needle))
}

/// Keep records that satisfy every active clause.
///
/// Combinators are not evaluated: an `OR` clause is required like any other.
#[must_use]
pub fn filter<'a>(records: Vec<&'a Record>, clauses: &[FilterClause]) -> Vec<&'a Record> {
    let mut active = clauses.iter().filter(|clause| clause.is_active()).peekable();
    if active.peek().is_none() {
        return records;
    }
    if active.skip(1).any(|clause| clause.combinator == Combinator::Or) {
        debug!("OR combinator present; clauses are combined with AND");
    }

    records
        .into_iter()
        .filter(|record| matches_all(record, clauses))
        .collect()
}

/// Stable sort by the field's lower-cased text, compared by collation order.
///
/// Records with equal keys keep their input order in either direction.
#[must_use]
pub fn sort<'a>(
    records: Vec<&'a Record>,
    field: &LogicalField,
    direction: SortDirection,
) -> Vec<&'a Record> {
    let mut keyed: Vec<(CollationKey, &'a Record)> = records
        .into_iter()
        .map(|record| (sort_key(record, field), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| direction.apply(a.cmp(b)));
    trace!(count = keyed.len(), field = %field, "Sorted records");
    keyed.into_iter().map(|(_, record)| record).collect()
}

fn sort_key(record: &Record, field: &LogicalField) -> CollationKey {
    collation_key(&resolve(record, field).to_text().to_lowercase())
}

/// Group already-sorted records by `field`.
///
/// Group order is the order each key first appears; records keep their
/// relative order inside a group.
#[must_use]
pub fn group<'a>(records: &[&'a Record], field: &LogicalField) -> Groups<'a> {
    let mut groups = Groups::new();
    for record in records {
        groups
            .entry(group_key(record, field))
            .or_default()
            .push(*record);
    }
    trace!(groups = groups.len(), field = %field, "Grouped records");
    groups
}

/// Group key of one record: its text value, or the field's empty label.
#[must_use]
pub fn group_key(record: &Record, field: &LogicalField) -> String {
    let value = resolve(record, field);
    if value.is_empty() {
        field.group_label().to_string()
    } else {
        value.to_text().into_owned()
    }
}
