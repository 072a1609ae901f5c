//! Core data types for `bug_query`.
//!
//! This module defines the record shapes the query engine works over:
//! - `Record` - A bug as delivered by whichever API (or local draft) produced it
//! - `Person` - The shapes an assignee or creator can take
//! - `Tags` - A tag list or a single delimited tag string
//!
//! Decoding a [`Record`] from JSON never fails. Values of an unexpected shape
//! are dropped and the raw key is remembered in [`Record::malformed`], so the
//! query stages can apply their own recovery policy later without ever
//! touching raw JSON again.

use crate::util::hash::derived_record_id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Key recorded in [`Record::malformed`] when the payload is not an object at all.
pub const ROOT_KEY: &str = "$root";

/// An assignee/creator object (`{ name, username }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Profile {
    /// `name`, falling back to `username`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref()).or_else(|| non_blank(self.username.as_deref()))
    }
}

/// A person reference as it appears on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Person {
    /// Plain string (`"alice"`).
    Name(String),
    /// Object with `name` and/or `username`.
    Profile(Profile),
    /// Array of people (multi-assignee payloads).
    Many(Vec<Person>),
}

impl Person {
    /// The `name` property of an object-shaped person.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Profile(profile) => non_blank(profile.name.as_deref()),
            Self::Name(_) | Self::Many(_) => None,
        }
    }

    /// The `username` property of an object-shaped person.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Profile(profile) => non_blank(profile.username.as_deref()),
            Self::Name(_) | Self::Many(_) => None,
        }
    }

    /// The plain-string form; only [`Person::Name`] has one.
    #[must_use]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Name(name) => non_blank(Some(name)),
            Self::Profile(_) | Self::Many(_) => None,
        }
    }

    /// Every non-empty display name this value carries, arrays flattened.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Name(name) => non_blank(Some(name)).into_iter().collect(),
            Self::Profile(profile) => profile.display_name().into_iter().collect(),
            Self::Many(people) => people.iter().flat_map(Self::names).collect(),
        }
    }
}

/// Tags as stored on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Delimited(String),
}

impl Tags {
    /// Individual tags, trimmed, empties dropped.
    ///
    /// A delimited string is split on `,` and `;`.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::List(tags) => tags
                .iter()
                .map(|tag| tag.trim())
                .filter(|tag| !tag.is_empty())
                .collect(),
            Self::Delimited(raw) => split_delimited(raw),
        }
    }
}

/// Split a delimited tag string into trimmed, non-empty tags.
#[must_use]
pub fn split_delimited(raw: &str) -> Vec<&str> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// A bug record.
///
/// Field names follow the camelCase keys of the dashboard API. Every field
/// is optional because payloads differ by provenance; see the module docs
/// for how odd shapes are handled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Record {
    /// Stable identifier (`id` / `_id`, or derived from the content).
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Task type (`type` in payloads).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Person>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Person>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Person>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Raw keys whose value had an unexpected shape.
    #[serde(skip)]
    pub malformed: BTreeSet<String>,
}

impl Record {
    /// Decode a record from an arbitrary JSON value. Never fails.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(object) = value else {
            let mut record = Self {
                id: derived_record_id(value),
                ..Self::default()
            };
            record.malformed.insert(ROOT_KEY.to_string());
            return record;
        };

        let mut decoder = Decoder::new(object);
        let id = decoder
            .text("id")
            .or_else(|| decoder.text("_id"))
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| derived_record_id(value));

        Self {
            id,
            title: decoder.text("title"),
            description: decoder.text("description"),
            status: decoder.text("status"),
            priority: decoder.text("priority"),
            record_type: decoder.text("type"),
            assigned_to: decoder.person("assignedTo"),
            assignee: decoder.person("assignee"),
            assigned_name: decoder.text("assignedName"),
            created_by: decoder.person("createdBy"),
            tags: decoder.tags("tags"),
            due_date: decoder.text("dueDate"),
            closed_date: decoder.text("closedDate"),
            created_at: decoder.text("createdAt"),
            malformed: decoder.malformed,
        }
    }

    /// Whether the raw `key` carried a value of unexpected shape.
    #[must_use]
    pub fn is_malformed(&self, key: &str) -> bool {
        self.malformed.contains(key) || self.malformed.contains(ROOT_KEY)
    }

    /// Title, or an empty string.
    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Shape-tolerant field reader over one JSON object.
struct Decoder<'a> {
    object: &'a Map<String, Value>,
    malformed: BTreeSet<String>,
}

impl<'a> Decoder<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            malformed: BTreeSet::new(),
        }
    }

    fn flag(&mut self, key: &str) {
        self.malformed.insert(key.to_string());
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|value| !value.is_null())
    }

    fn text(&mut self, key: &str) -> Option<String> {
        let value = self.present(key)?;
        let text = scalar_text(value);
        if text.is_none() {
            self.flag(key);
        }
        text
    }

    fn person(&mut self, key: &str) -> Option<Person> {
        let value = self.present(key)?;
        let mut clean = true;
        let person = decode_person(value, &mut clean);
        if !clean || person.is_none() {
            self.flag(key);
        }
        person
    }

    fn tags(&mut self, key: &str) -> Option<Tags> {
        match self.present(key)? {
            Value::Array(items) => {
                let mut tags = Vec::with_capacity(items.len());
                for item in items {
                    match scalar_text(item) {
                        Some(tag) => tags.push(tag),
                        None if item.is_null() => {}
                        None => self.flag(key),
                    }
                }
                Some(Tags::List(tags))
            }
            value => {
                let text = scalar_text(value);
                if text.is_none() {
                    self.flag(key);
                }
                text.map(Tags::Delimited)
            }
        }
    }
}

/// Strings verbatim, numbers and booleans in textual form; `None` otherwise.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn decode_person(value: &Value, clean: &mut bool) -> Option<Person> {
    match value {
        Value::Null => None,
        Value::Object(object) => {
            let mut field = |key: &str| match object.get(key) {
                None | Some(Value::Null) => None,
                Some(inner) => {
                    let text = scalar_text(inner);
                    if text.is_none() {
                        *clean = false;
                    }
                    text
                }
            };
            let name = field("name");
            let username = field("username");
            Some(Person::Profile(Profile { name, username }))
        }
        Value::Array(items) => Some(Person::Many(
            items
                .iter()
                .filter_map(|item| decode_person(item, clean))
                .collect(),
        )),
        scalar => scalar_text(scalar).map(Person::Name),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
