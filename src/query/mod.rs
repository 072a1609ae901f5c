//! The record query engine.
//!
//! A [`QueryState`] describes what the user wants to see; [`execute`] and
//! [`execute_grouped`] turn it into a view over borrowed records:
//!
//! 1. search (free text over title, description, people, status, priority, tags)
//! 2. filter (every active clause must hold)
//! 3. sort (stable, collation order)
//! 4. group (optional, by the sort field)
//!
//! None of these stages fail. Records decoded with malformed fields are
//! let through filters, kept out of search results, and sorted as empty.

mod accessor;
mod collate;
mod executor;
mod field;
mod predicate;
mod state;
mod store;

pub use accessor::{DEFAULT_TASK_TYPE, resolve};
pub use collate::{CollationKey, collation_key, compare};
pub use executor::{
    Groups, QueryResult, SEARCH_KEYS, execute, execute_grouped, filter, group, group_key, search,
    sort,
};
pub use field::{FieldValue, LogicalField};
pub use predicate::{matches, matches_all};
pub use state::{ClauseId, ClausePatch, Combinator, FilterClause, QueryState, SortDirection};
pub use store::QueryStore;
