use crate::model::Record;
use crate::query::{Groups, LogicalField, QueryResult, QueryState};
use serde::Serialize;

/// JSON payload for list and search views.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput<'a> {
    /// Records matching the query before `--limit` was applied.
    pub total: usize,
    pub records: Vec<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupOutput<'a>>>,
    /// The query that produced this view.
    pub query: &'a QueryState,
}

/// One group of a grouped view.
#[derive(Debug, Clone, Serialize)]
pub struct GroupOutput<'a> {
    pub key: String,
    pub count: usize,
    pub records: Vec<&'a Record>,
}

impl<'a> ListOutput<'a> {
    /// Build the payload, keeping at most `limit` records (0 means unlimited).
    ///
    /// Groups are rebuilt from the kept records so the two never disagree.
    #[must_use]
    pub fn from_result(result: &QueryResult<'a>, query: &'a QueryState, limit: usize) -> Self {
        let total = result.records.len();
        let keep = if limit == 0 { total } else { limit.min(total) };
        let records: Vec<&'a Record> = result.records[..keep].to_vec();
        let groups = result
            .groups
            .as_ref()
            .map(|_| group_outputs(&crate::query::group(&records, query.sort_field())));

        Self {
            total,
            records,
            groups,
            query,
        }
    }
}

fn group_outputs<'a>(groups: &Groups<'a>) -> Vec<GroupOutput<'a>> {
    groups
        .iter()
        .map(|(key, records)| GroupOutput {
            key: key.clone(),
            count: records.len(),
            records: records.clone(),
        })
        .collect()
}

/// Description of one logical field for `bq fields`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub group_label: &'static str,
    pub source_keys: &'static [&'static str],
    pub strict: bool,
}

impl From<&LogicalField> for FieldInfo {
    fn from(field: &LogicalField) -> Self {
        Self {
            name: field.as_str().to_string(),
            group_label: field.group_label(),
            source_keys: field.source_keys(),
            strict: field.is_strict(),
        }
    }
}
