//! Logical fields and the values they resolve to.

use crate::error::QueryError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A field the dashboard lets users filter, sort, or group by.
///
/// Logical fields are independent of how a record stores them; see
/// [`crate::query::resolve`] for the mapping to physical keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Status,
    Assignee,
    Priority,
    Tags,
    DueDate,
    TaskType,
    CreatedBy,
    DateClosed,
    DateCreated,
    /// A name the engine does not know; resolves to an empty value.
    Unrecognized(String),
}

impl LogicalField {
    /// Every recognized field, in display order.
    pub const KNOWN: [Self; 9] = [
        Self::Status,
        Self::Assignee,
        Self::Priority,
        Self::Tags,
        Self::DueDate,
        Self::TaskType,
        Self::CreatedBy,
        Self::DateClosed,
        Self::DateCreated,
    ];

    /// Display name, as shown in the dashboard.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Status => "Status",
            Self::Assignee => "Assignee",
            Self::Priority => "Priority",
            Self::Tags => "Tags",
            Self::DueDate => "Due date",
            Self::TaskType => "Task type",
            Self::CreatedBy => "Created by",
            Self::DateClosed => "Date closed",
            Self::DateCreated => "Date created",
            Self::Unrecognized(name) => name,
        }
    }

    /// Parse a field name, returning `None` for names the engine does not know.
    ///
    /// Matching is case-insensitive and treats `_`, `-` and spaces alike, so
    /// `due_date`, `Due-Date` and `due date` all name [`LogicalField::DueDate`].
    #[must_use]
    pub fn parse_known(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();
        let field = match normalized.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "status" => Self::Status,
            "assignee" | "assigned to" | "assignedto" => Self::Assignee,
            "priority" => Self::Priority,
            "tags" | "tag" => Self::Tags,
            "due date" | "duedate" | "due" => Self::DueDate,
            "task type" | "tasktype" | "type" => Self::TaskType,
            "created by" | "createdby" | "creator" => Self::CreatedBy,
            "date closed" | "closed date" | "closeddate" | "closed" => Self::DateClosed,
            "date created" | "created at" | "createdat" | "created" => Self::DateCreated,
            _ => return None,
        };
        Some(field)
    }

    /// Label used for the group of records whose value for this field is empty.
    #[must_use]
    pub const fn group_label(&self) -> &'static str {
        match self {
            Self::Assignee => "Unassigned",
            Self::Status => "No Status",
            Self::Priority => "No Priority",
            Self::Tags => "No Tags",
            Self::CreatedBy => "Unknown",
            Self::DueDate => "No Due Date",
            Self::TaskType | Self::DateClosed | Self::DateCreated | Self::Unrecognized(_) => {
                "All Bugs"
            }
        }
    }

    /// Raw record keys that feed this field.
    #[must_use]
    pub const fn source_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Status => &["status"],
            Self::Assignee => &["assignedTo", "assignee", "assignedName"],
            Self::Priority => &["priority"],
            Self::Tags => &["tags"],
            Self::DueDate => &["dueDate"],
            Self::TaskType => &["type"],
            Self::CreatedBy => &["createdBy"],
            Self::DateClosed => &["closedDate"],
            Self::DateCreated => &["createdAt"],
            Self::Unrecognized(_) => &[],
        }
    }

    /// Strict fields reject records with no value instead of letting them through.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self, Self::Status | Self::Priority)
    }

    /// Whether clause values for this field are dates.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::DueDate | Self::DateClosed | Self::DateCreated)
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalField {
    type Err = QueryError;

    /// Never fails: unknown names become [`LogicalField::Unrecognized`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_known(s).unwrap_or_else(|| Self::Unrecognized(s.trim().to_string())))
    }
}

impl Serialize for LogicalField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogicalField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse_known(&name).unwrap_or(Self::Unrecognized(name)))
    }
}

/// The value a record holds for a logical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    List(Vec<&'a str>),
}

impl<'a> FieldValue<'a> {
    /// Empty after trimming, or no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Textual form; lists are joined with `", "`.
    #[must_use]
    pub fn to_text(&self) -> Cow<'a, str> {
        match self {
            Self::Absent => Cow::Borrowed(""),
            Self::Text(text) => Cow::Borrowed(text),
            Self::List(items) => Cow::Owned(items.join(", ")),
        }
    }

    /// Individual values: a text value is a single item.
    #[must_use]
    pub fn items(&self) -> Vec<&'a str> {
        match self {
            Self::Absent => Vec::new(),
            Self::Text(text) => vec![*text],
            Self::List(items) => items.clone(),
        }
    }
}
