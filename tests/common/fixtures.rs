#![allow(dead_code)]

use bug_query::model::Record;
use bug_query::query::{ClausePatch, Combinator, LogicalField, QueryState};
use serde_json::{Map, Value, json};

/// Builds raw record payloads the way the various producing APIs shape them.
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(id));
        fields.insert("title".to_string(), json!(format!("Bug {id}")));
        Self { fields }
    }

    /// A record without an id, as drafted locally before upload.
    pub fn draft(title: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!(title));
        Self { fields }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.with("title", json!(title))
    }

    pub fn description(self, description: &str) -> Self {
        self.with("description", json!(description))
    }

    pub fn status(self, status: &str) -> Self {
        self.with("status", json!(status))
    }

    pub fn priority(self, priority: &str) -> Self {
        self.with("priority", json!(priority))
    }

    /// Server shape: `assignedTo: {name, username}`.
    pub fn assigned_to(self, name: &str) -> Self {
        let username = name.to_lowercase().replace(' ', ".");
        self.with("assignedTo", json!({"name": name, "username": username}))
    }

    /// Legacy shape: `assignee: "<name>"`.
    pub fn assignee(self, name: &str) -> Self {
        self.with("assignee", json!(name))
    }

    /// Multi-assignee shape: `assignee: [{name}, ...]`.
    pub fn assignees(self, names: &[&str]) -> Self {
        let people: Vec<Value> = names.iter().map(|name| json!({"name": name})).collect();
        self.with("assignee", Value::Array(people))
    }

    pub fn created_by(self, name: &str) -> Self {
        self.with("createdBy", json!({"name": name}))
    }

    pub fn tags(self, tags: &[&str]) -> Self {
        self.with("tags", json!(tags))
    }

    pub fn tag_string(self, tags: &str) -> Self {
        self.with("tags", json!(tags))
    }

    pub fn task_type(self, task_type: &str) -> Self {
        self.with("type", json!(task_type))
    }

    pub fn due(self, date: &str) -> Self {
        self.with("dueDate", json!(date))
    }

    pub fn created_at(self, date: &str) -> Self {
        self.with("createdAt", json!(date))
    }

    pub fn value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn build(self) -> Record {
        Record::from_value(&self.value())
    }
}

pub fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records.into_iter().map(|record| record.id.clone()).collect()
}

/// Fill the seed clause or append a new one.
pub fn add_filter(state: &mut QueryState, field: LogicalField, value: &str) {
    add_clause(state, field, value, Combinator::And);
}

pub fn add_clause(state: &mut QueryState, field: LogicalField, value: &str, combinator: Combinator) {
    let blank = state
        .clauses()
        .iter()
        .find(|clause| clause.field.is_none())
        .map(|clause| clause.id);
    let id = blank.unwrap_or_else(|| state.add_clause());
    state.update_clause(
        id,
        ClausePatch::new()
            .field(field)
            .value(value)
            .combinator(combinator),
    );
}

/// A small mixed-provenance export.
pub fn sample_export() -> Vec<Value> {
    vec![
        RecordBuilder::new("BUG-1")
            .title("Login fails on Safari")
            .description("OAuth redirect loops forever")
            .status("Open")
            .priority("High")
            .assigned_to("Alice Moreau")
            .created_by("Dana")
            .tags(&["auth", "frontend"])
            .task_type("Bug")
            .due("2024-05-01")
            .value(),
        RecordBuilder::new("BUG-2")
            .title("Export to CSV drops rows")
            .status("In Progress")
            .priority("Medium")
            .assignee("bob")
            .tag_string("export, backend")
            .value(),
        RecordBuilder::new("BUG-3")
            .title("Dark mode contrast")
            .status("Closed")
            .priority("Low")
            .assignees(&["Carol", "Alice Moreau"])
            .tags(&["frontend"])
            .task_type("Feature")
            .value(),
        RecordBuilder::new("BUG-4")
            .title("Crash when uploading avatar")
            .status("open")
            .value(),
        RecordBuilder::draft("Local draft: search is slow")
            .priority("High")
            .value(),
    ]
}
