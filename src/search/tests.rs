use super::*;
use crate::catalog::{CatalogError, Playlist, TrackId, filter_tracks};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

struct Fixed {
    tracks: Vec<Track>,
    searches: AtomicUsize,
    offline: bool,
}

impl Fixed {
    fn new(titles: &[&str]) -> Self {
        let tracks = titles
            .iter()
            .map(|title| Track {
                id: TrackId::new(*title),
                title: (*title).to_string(),
                artist: String::new(),
                album: String::new(),
                duration: None,
                media: format!("{title}.mp3"),
                cover_art: None,
            })
            .collect();
        Self {
            tracks,
            searches: AtomicUsize::new(0),
            offline: false,
        }
    }
}

impl Catalog for Fixed {
    fn all_tracks(&self) -> Result<Vec<Track>, CatalogError> {
        Ok(self.tracks.clone())
    }

    fn playlists(&self) -> Result<Vec<Playlist>, CatalogError> {
        Ok(Vec::new())
    }

    fn playlist(&self, id: &str) -> Result<Playlist, CatalogError> {
        Err(CatalogError::PlaylistNotFound(id.to_string()))
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(CatalogError::Io {
                path: "/library".into(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            });
        }
        filter_tracks(&self.tracks, query)
    }
}

const QUIET: Duration = Duration::from_millis(40);
const PATIENCE: Duration = Duration::from_millis(1_000);

#[test]
fn debouncer_fires_once_with_latest_value() {
    let (tx, rx) = mpsc::channel();
    let d = Debouncer::new(QUIET, move |v: u32| {
        let _ = tx.send(v);
    });

    d.schedule(1);
    d.schedule(2);
    d.schedule(3);

    assert_eq!(rx.recv_timeout(PATIENCE).unwrap(), 3);
    assert!(rx.recv_timeout(QUIET * 3).is_err());
}

#[test]
fn debouncer_cancel_discards_pending_value() {
    let (tx, rx) = mpsc::channel();
    let d = Debouncer::new(QUIET, move |v: &'static str| {
        let _ = tx.send(v);
    });

    d.schedule("stale");
    d.cancel();
    assert!(rx.recv_timeout(QUIET * 3).is_err());

    d.schedule("fresh");
    assert_eq!(rx.recv_timeout(PATIENCE).unwrap(), "fresh");
}

#[test]
fn dropping_debouncer_discards_pending_value() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    let d = Debouncer::new(Duration::from_secs(5), move |v: u8| {
        sink.lock().unwrap().push(v);
    });
    d.schedule(9);
    drop(d);
    assert!(fired.lock().unwrap().is_empty());
}

#[test]
fn typing_burst_runs_a_single_search() {
    let catalog = Arc::new(Fixed::new(&["Sunrise", "Sunset", "Midnight"]));
    let (tx, rx) = mpsc::channel();
    let search = DebouncedSearch::new(catalog.clone(), QUIET, move |outcome| {
        let _ = tx.send(outcome);
    });

    search.input("s");
    search.input("su");
    search.input("sun");

    match rx.recv_timeout(PATIENCE).unwrap() {
        SearchOutcome::Results { query, tracks } => {
            assert_eq!(query, "sun");
            assert_eq!(tracks.len(), 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(catalog.searches.load(Ordering::SeqCst), 1);
}

#[test]
fn blank_input_clears_without_querying() {
    let catalog = Arc::new(Fixed::new(&["Sunrise"]));
    let (tx, rx) = mpsc::channel();
    let search = DebouncedSearch::new(catalog.clone(), QUIET, move |outcome| {
        let _ = tx.send(outcome);
    });

    search.input("   ");
    assert_eq!(rx.recv_timeout(PATIENCE).unwrap(), SearchOutcome::Cleared);
    assert_eq!(catalog.searches.load(Ordering::SeqCst), 0);
}

#[test]
fn cancelled_search_never_runs() {
    let catalog = Arc::new(Fixed::new(&["Sunrise"]));
    let (tx, rx) = mpsc::channel();
    let search = DebouncedSearch::new(catalog.clone(), QUIET, move |outcome| {
        let _ = tx.send(outcome);
    });

    search.input("sun");
    search.cancel();
    assert!(rx.recv_timeout(QUIET * 3).is_err());
    assert_eq!(catalog.searches.load(Ordering::SeqCst), 0);
}

#[test]
fn catalog_failures_are_reported_not_raised() {
    let mut fixed = Fixed::new(&["Sunrise"]);
    fixed.offline = true;

    let outcome = run_search(&fixed, " sun ");
    assert_eq!(
        outcome,
        SearchOutcome::Failed {
            query: "sun".into(),
            error: "failed to read /library: connection refused".into(),
        }
    );
}
