//! Subcommand implementations.
//!
//! Every command that runs the executor builds its [`QueryState`] the same
//! way: start from the saved query file or the configured defaults, then
//! apply the search text, filter clauses and sort flags through a
//! [`QueryStore`].

pub mod count;
pub mod fields;
pub mod list;
pub mod search;

use crate::cli::QueryArgs;
use crate::config::Settings;
use crate::error::{QueryError, Result};
use crate::format::{TextFormatOptions, terminal_width};
use crate::query::{
    ClauseId, ClausePatch, Combinator, LogicalField, QueryState, QueryStore, SortDirection,
};
use crate::util::normalize_date_value;
use regex::Regex;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static CLAUSE_SPEC: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<field>[^=]*?)\s*=(?P<value>.*)$"));

/// A filter clause parsed from a `<Field>=<value>` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSpec {
    pub field: LogicalField,
    pub value: String,
    pub combinator: Combinator,
}

/// Parse a `<Field>=<value>` clause flag.
///
/// The field must name a known logical field. Date field values are
/// normalized to `YYYY-MM-DD`; a blank value is kept and leaves the clause
/// inactive.
///
/// # Errors
///
/// Returns [`QueryError::InvalidClause`] when the flag has no `=` or no field
/// name, [`QueryError::UnknownField`] for an unknown field, and
/// [`QueryError::InvalidDate`] for a date value that cannot be read.
pub fn parse_clause_spec(spec: &str, combinator: Combinator) -> Result<ClauseSpec> {
    let pattern = CLAUSE_SPEC
        .as_ref()
        .map_err(|err| anyhow::anyhow!("clause pattern failed to compile: {err}"))?;
    let captures = pattern
        .captures(spec)
        .ok_or_else(|| QueryError::invalid_clause(spec, "expected <Field>=<value>"))?;

    let name = &captures["field"];
    if name.is_empty() {
        return Err(QueryError::invalid_clause(spec, "missing field name"));
    }
    let field = parse_field(name)?;

    let raw = captures["value"].trim();
    let value = if field.is_date() && !raw.is_empty() {
        normalize_date_value(raw, field.as_str())?
    } else {
        raw.to_string()
    };

    Ok(ClauseSpec {
        field,
        value,
        combinator,
    })
}

/// Parse a field name, rejecting names that are not logical fields.
///
/// # Errors
///
/// Returns [`QueryError::UnknownField`] for unrecognized names.
pub fn parse_field(name: &str) -> Result<LogicalField> {
    LogicalField::parse_known(name).ok_or_else(|| QueryError::unknown_field(name.trim()))
}

/// Build the query state for a command.
///
/// # Errors
///
/// Returns an error if the query file cannot be read, or a clause, sort
/// field or date value is invalid.
pub fn build_query(
    args: &QueryArgs,
    search: Option<&str>,
    settings: &Settings,
) -> Result<Arc<QueryState>> {
    let base = match &args.query_file {
        Some(path) => load_query_file(path)?,
        None => {
            let mut state = QueryState::new();
            state.set_sort_field(settings.sort_field.clone());
            state.set_sort_direction(settings.sort_direction);
            state
        }
    };

    let clauses = args
        .filters
        .iter()
        .map(|spec| parse_clause_spec(spec, Combinator::And))
        .chain(
            args.or_filters
                .iter()
                .map(|spec| parse_clause_spec(spec, Combinator::Or)),
        )
        .collect::<Result<Vec<_>>>()?;
    let sort_field = args.sort.as_deref().map(parse_field).transpose()?;
    let sort_direction = sort_direction_flag(args);

    let store = QueryStore::new(base);
    store.update(|state| {
        if let Some(text) = search {
            state.set_search_text(text);
        }
        for clause in clauses {
            let id = blank_clause(state).unwrap_or_else(|| state.add_clause());
            state.update_clause(
                id,
                ClausePatch::new()
                    .field(clause.field)
                    .value(clause.value)
                    .combinator(clause.combinator),
            );
        }
        if let Some(field) = sort_field {
            state.set_sort_field(field);
        }
        if let Some(direction) = sort_direction {
            state.set_sort_direction(direction);
        }
    });

    let state = store.snapshot();
    debug!(
        search = state.search_text(),
        active_clauses = state.active_clauses().count(),
        sort_field = %state.sort_field(),
        sort_direction = %state.sort_direction(),
        "Built query"
    );
    Ok(state)
}

/// Read a query state saved as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a query state.
pub fn load_query_file(path: &Path) -> Result<QueryState> {
    let contents = fs::read_to_string(path)?;
    let state = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), "Loaded query file");
    Ok(state)
}

/// Text options for the current terminal.
#[must_use]
pub fn text_options(settings: &Settings) -> TextFormatOptions {
    let max_width = settings
        .max_width
        .or_else(|| io::stdout().is_terminal().then(terminal_width));
    TextFormatOptions {
        use_color: settings.color.use_color(),
        max_width,
    }
}

const fn sort_direction_flag(args: &QueryArgs) -> Option<SortDirection> {
    if args.asc {
        Some(SortDirection::Ascending)
    } else if args.desc {
        Some(SortDirection::Descending)
    } else {
        None
    }
}

/// First clause with neither field nor value, reused before appending.
fn blank_clause(state: &QueryState) -> Option<ClauseId> {
    state
        .clauses()
        .iter()
        .find(|clause| clause.field.is_none() && clause.value.trim().is_empty())
        .map(|clause| clause.id)
}
