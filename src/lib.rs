//! `bug_query` - a query engine for heterogeneous bug-record collections.
//!
//! Records arrive in whatever shape the producing API chose. The engine
//! decodes them into a typed [`Record`](model::Record), then applies a
//! [`QueryState`](query::QueryState) (search text, filter clauses, sort
//! field and direction) to produce an ordered, optionally grouped view.
//!
//! ```
//! use bug_query::model::Record;
//! use bug_query::query::{ClausePatch, LogicalField, QueryState, execute};
//! use serde_json::json;
//!
//! let records: Vec<Record> = [
//!     json!({"id": "1", "title": "Login broken", "status": "Open"}),
//!     json!({"id": "2", "title": "Typo", "status": "Closed"}),
//! ]
//! .iter()
//! .map(Record::from_value)
//! .collect();
//!
//! let mut state = QueryState::new();
//! let id = state.clauses()[0].id;
//! state.update_clause(id, ClausePatch::new().field(LogicalField::Status).value("open"));
//!
//! let result = execute(&records, &state);
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.records[0].id, "1");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod query;
pub mod util;

pub use error::{ErrorCode, QueryError, Result, StructuredError};
pub use model::Record;
pub use query::{QueryResult, QueryState, QueryStore};
