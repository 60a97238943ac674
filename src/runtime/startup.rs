use std::error::Error;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use tracing::info;

use crate::catalog::{Catalog, CatalogError, Track};
use crate::engine::Engine;
use crate::player::PlaybackController;
use crate::search::{DebouncedSearch, SearchOutcome};

/// Queue every catalog track and start the first. Returns the queue length.
pub fn queue_library<E: Engine, C: Catalog + ?Sized>(
    controller: &mut PlaybackController<E>,
    catalog: &C,
) -> Result<usize, CatalogError> {
    let tracks = catalog.all_tracks()?;
    Ok(queue_tracks(controller, tracks))
}

/// Queue the tracks matching `query`, going through the same debounced path
/// as a search box. A blank query queues the whole library.
pub fn queue_search<E, C>(
    controller: &mut PlaybackController<E>,
    catalog: Arc<C>,
    query: &str,
    quiet: Duration,
) -> Result<usize, Box<dyn Error>>
where
    E: Engine,
    C: Catalog + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel();
    let search = DebouncedSearch::new(catalog.clone(), quiet, move |outcome| {
        let _ = tx.send(outcome);
    });
    search.input(query);

    match rx.recv()? {
        SearchOutcome::Cleared => Ok(queue_library(controller, catalog.as_ref())?),
        SearchOutcome::Results { query, tracks } => {
            info!(%query, matches = tracks.len(), "search results");
            Ok(queue_tracks(controller, tracks))
        }
        SearchOutcome::Failed { query, error } => {
            Err(format!("search for {query:?} failed: {error}").into())
        }
    }
}

fn queue_tracks<E: Engine>(controller: &mut PlaybackController<E>, tracks: Vec<Track>) -> usize {
    let count = tracks.len();
    if let Some(first) = tracks.first().cloned() {
        controller.play(first, tracks);
    }
    count
}
