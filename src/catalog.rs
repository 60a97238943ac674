//! Track catalog: the records playback is launched from.
//!
//! The controller never talks to a catalog itself; callers resolve tracks
//! and queues through a [`Catalog`] and hand them to the player. A remote
//! API client and the directory-backed [`LocalCatalog`] both fit behind the
//! same trait.

mod error;
mod local;
mod model;
mod query;

pub use error::CatalogError;
pub use local::LocalCatalog;
pub use model::{Playlist, Track, TrackId, make_display};
pub use query::{filter_tracks, normalize_query};

/// Read access to songs and playlists.
pub trait Catalog {
    /// Every track, in catalog order.
    fn all_tracks(&self) -> Result<Vec<Track>, CatalogError>;

    /// Every playlist with its tracks.
    fn playlists(&self) -> Result<Vec<Playlist>, CatalogError>;

    /// A single playlist by id, tracks in position order.
    fn playlist(&self, id: &str) -> Result<Playlist, CatalogError>;

    /// Tracks whose title, artist or album contain `query` (case-insensitive).
    ///
    /// A blank query is rejected with [`CatalogError::EmptyQuery`].
    fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError>;
}

#[cfg(test)]
mod tests;
