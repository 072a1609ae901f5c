//! Shared query state for concurrent consumers.

use super::state::QueryState;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Holds the current [`QueryState`] for every view that renders it.
///
/// Readers take immutable snapshots without locking. Writers are serialized
/// and publish a whole new state at once, so a snapshot never shows half of
/// an update.
#[derive(Debug)]
pub struct QueryStore {
    current: ArcSwap<QueryState>,
    writer: Mutex<()>,
    version: AtomicU64,
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new(QueryState::new())
    }
}

impl QueryStore {
    #[must_use]
    pub fn new(state: QueryState) -> Self {
        Self {
            current: ArcSwap::from_pointee(state),
            writer: Mutex::new(()),
            version: AtomicU64::new(0),
        }
    }

    /// The current state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<QueryState> {
        self.current.load_full()
    }

    /// Apply `f` to a copy of the current state and publish the result.
    ///
    /// If `f` panics nothing is published.
    pub fn update<R>(&self, f: impl FnOnce(&mut QueryState) -> R) -> R {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = QueryState::clone(&self.current.load());
        let result = f(&mut next);
        self.current.store(Arc::new(next));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(version, "Published query state");
        result
    }

    /// Number of updates published so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
