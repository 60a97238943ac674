//! Search-as-you-type.
//!
//! Keystrokes reschedule a pending search; only once the input has been
//! quiet for the configured period does the catalog get queried.

mod debounce;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::catalog::{Catalog, Track};

pub use debounce::Debouncer;

/// What a debounced search produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The input was blank; any shown results should be cleared.
    Cleared,
    Results { query: String, tracks: Vec<Track> },
    Failed { query: String, error: String },
}

/// Runs catalog searches for the latest input after a quiet period.
pub struct DebouncedSearch {
    debouncer: Debouncer<String>,
}

impl DebouncedSearch {
    pub fn new<C, F>(catalog: Arc<C>, quiet: Duration, mut on_outcome: F) -> Self
    where
        C: Catalog + Send + Sync + ?Sized + 'static,
        F: FnMut(SearchOutcome) + Send + 'static,
    {
        let debouncer = Debouncer::new(quiet, move |query: String| {
            on_outcome(run_search(catalog.as_ref(), &query));
        });
        Self { debouncer }
    }

    /// The search box changed; restart the quiet period with `query`.
    pub fn input(&self, query: &str) {
        self.debouncer.schedule(query.to_string());
    }

    /// Forget any pending search.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}

pub fn run_search<C: Catalog + ?Sized>(catalog: &C, query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::Cleared;
    }

    debug!(query, "searching catalog");
    match catalog.search(query) {
        Ok(tracks) => SearchOutcome::Results {
            query: query.to_string(),
            tracks,
        },
        Err(e) => SearchOutcome::Failed {
            query: query.to_string(),
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests;
