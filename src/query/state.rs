//! User-editable query state: search text, filter clauses, sort.

use super::field::LogicalField;
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How a clause joins the clauses before it.
///
/// Only shown to the user: every active clause must hold, whatever its
/// combinator says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction. Defaults to descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Orient a natural (ascending) ordering.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(QueryError::InvalidSortDirection {
                direction: s.to_string(),
            }),
        }
    }
}

/// Identifier of a filter clause, unique within one [`QueryState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClauseId(pub u64);

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of the filter builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub id: ClauseId,
    #[serde(default)]
    pub field: Option<LogicalField>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub combinator: Combinator,
}

impl FilterClause {
    fn empty(id: ClauseId) -> Self {
        Self {
            id,
            field: None,
            value: String::new(),
            combinator: Combinator::And,
        }
    }

    /// A clause takes part in filtering only once it has a field and a value.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.field.is_some() && !self.value.trim().is_empty()
    }
}

/// Partial update for a [`FilterClause`]; unset parts are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClausePatch {
    field: Option<Option<LogicalField>>,
    value: Option<String>,
    combinator: Option<Combinator>,
}

impl ClausePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field: LogicalField) -> Self {
        self.field = Some(Some(field));
        self
    }

    #[must_use]
    pub fn clear_field(mut self) -> Self {
        self.field = Some(None);
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = Some(combinator);
        self
    }

    fn apply(self, clause: &mut FilterClause) {
        if let Some(field) = self.field {
            clause.field = field;
        }
        if let Some(value) = self.value {
            clause.value = value;
        }
        if let Some(combinator) = self.combinator {
            clause.combinator = combinator;
        }
    }
}

/// The query configuration shared by the list and search views.
///
/// The clause list is never empty: removing or resetting the last clause
/// leaves one empty clause behind. Clause ids are not reused until the id
/// counter runs out, at which point the live clauses are renumbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredState")]
pub struct QueryState {
    search_text: String,
    clauses: Vec<FilterClause>,
    sort_field: LogicalField,
    sort_direction: SortDirection,
    next_clause_id: u64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    /// Default sort field.
    pub const DEFAULT_SORT_FIELD: LogicalField = LogicalField::Assignee;

    /// Empty search, one empty clause, sorted by assignee descending.
    #[must_use]
    pub fn new() -> Self {
        let mut state = Self {
            search_text: String::new(),
            clauses: Vec::with_capacity(1),
            sort_field: Self::DEFAULT_SORT_FIELD,
            sort_direction: SortDirection::default(),
            next_clause_id: 1,
        };
        state.reset_clauses();
        state
    }

    fn fresh_clause(&mut self) -> FilterClause {
        let id = ClauseId(self.next_clause_id);
        self.next_clause_id = match self.next_clause_id.checked_add(1) {
            Some(next) => next,
            None => {
                debug!("Clause id counter exhausted, renumbering clauses");
                self.renumber_clauses();
                return self.fresh_clause();
            }
        };
        FilterClause::empty(id)
    }

    /// Give the current clauses ids `1..=n` in list order.
    fn renumber_clauses(&mut self) {
        let mut next = 1;
        for clause in &mut self.clauses {
            clause.id = ClauseId(next);
            next += 1;
        }
        self.next_clause_id = next;
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    #[must_use]
    pub const fn sort_field(&self) -> &LogicalField {
        &self.sort_field
    }

    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Replace the search text verbatim.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Append an empty `AND` clause and return its id.
    pub fn add_clause(&mut self) -> ClauseId {
        let clause = self.fresh_clause();
        let id = clause.id;
        self.clauses.push(clause);
        id
    }

    /// Remove the clause with `id`. Returns `false` if no clause has that id.
    pub fn remove_clause(&mut self, id: ClauseId) -> bool {
        let before = self.clauses.len();
        self.clauses.retain(|clause| clause.id != id);
        if self.clauses.len() == before {
            return false;
        }
        if self.clauses.is_empty() {
            let clause = self.fresh_clause();
            self.clauses.push(clause);
        }
        true
    }

    /// Merge `patch` into the clause with `id`. Returns `false` if no clause has that id.
    pub fn update_clause(&mut self, id: ClauseId, patch: ClausePatch) -> bool {
        match self.clauses.iter_mut().find(|clause| clause.id == id) {
            Some(clause) => {
                patch.apply(clause);
                true
            }
            None => false,
        }
    }

    /// Replace all clauses with one empty clause. Search and sort are kept.
    pub fn reset_clauses(&mut self) {
        let clause = self.fresh_clause();
        self.clauses.clear();
        self.clauses.push(clause);
    }

    /// Clear search, restore the default sort, and reset clauses.
    pub fn reset_all(&mut self) {
        self.search_text.clear();
        self.sort_field = Self::DEFAULT_SORT_FIELD;
        self.sort_direction = SortDirection::default();
        self.reset_clauses();
    }

    pub fn set_sort_field(&mut self, field: LogicalField) {
        self.sort_field = field;
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    /// Whether any clause is active.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.clauses.iter().any(FilterClause::is_active)
    }

    /// Active clauses, in list order.
    pub fn active_clauses(&self) -> impl Iterator<Item = &FilterClause> {
        self.clauses.iter().filter(|clause| clause.is_active())
    }
}

/// Serialized form of [`QueryState`]; repaired into a valid state on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredState {
    search_text: String,
    clauses: Vec<FilterClause>,
    sort_field: LogicalField,
    sort_direction: SortDirection,
    next_clause_id: u64,
}

impl Default for StoredState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            clauses: Vec::new(),
            sort_field: QueryState::DEFAULT_SORT_FIELD,
            sort_direction: SortDirection::default(),
            next_clause_id: 1,
        }
    }
}

impl From<StoredState> for QueryState {
    fn from(stored: StoredState) -> Self {
        let max_id = stored.clauses.iter().map(|clause| clause.id.0).max().unwrap_or(0);
        let mut state = Self {
            search_text: stored.search_text,
            clauses: stored.clauses,
            sort_field: stored.sort_field,
            sort_direction: stored.sort_direction,
            next_clause_id: stored.next_clause_id.max(max_id.saturating_add(1)),
        };
        let mut seen = HashSet::new();
        if !state.clauses.iter().all(|clause| seen.insert(clause.id)) {
            debug!("Duplicate clause ids in stored state, renumbering");
            state.renumber_clauses();
        }
        if state.clauses.is_empty() {
            state.reset_clauses();
        }
        state
    }
}
