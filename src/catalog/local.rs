use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::Catalog;
use super::error::CatalogError;
use super::model::{Playlist, Track, TrackId};
use super::query::filter_tracks;

/// A catalog backed by a directory of audio files.
///
/// Track ids and media locators are paths relative to the library root, so
/// the root doubles as the media base address. Each immediate subdirectory is
/// a playlist holding the tracks found beneath it.
pub struct LocalCatalog {
    root: PathBuf,
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
}

impl LocalCatalog {
    /// Scan `root` once and index what was found.
    pub fn open(root: &Path, settings: &LibrarySettings) -> Result<Self, CatalogError> {
        let meta = fs::metadata(root).map_err(|source| CatalogError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(CatalogError::NotADirectory(root.to_path_buf()));
        }

        let tracks = scan(root, settings);
        let playlists = group_playlists(&tracks);
        debug!(
            root = %root.display(),
            tracks = tracks.len(),
            playlists = playlists.len(),
            "library scanned"
        );

        Ok(Self {
            root: root.to_path_buf(),
            tracks,
            playlists,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Catalog for LocalCatalog {
    fn all_tracks(&self) -> Result<Vec<Track>, CatalogError> {
        Ok(self.tracks.clone())
    }

    fn playlists(&self) -> Result<Vec<Playlist>, CatalogError> {
        Ok(self.playlists.clone())
    }

    fn playlist(&self, id: &str) -> Result<Playlist, CatalogError> {
        self.playlists
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::PlaylistNotFound(id.to_string()))
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError> {
        filter_tracks(&self.tracks, query)
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// `a/b/c.mp3` style locator for `path` below `root`.
///
/// Paths with a component that is not valid UTF-8 have no locator.
pub(super) fn relative_locator(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for c in rel.components() {
        match c {
            Component::Normal(s) => parts.push(s.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn read_track(root: &Path, path: &Path) -> Option<Track> {
    let locator = relative_locator(root, path)?;

    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = String::new();
    let mut album = String::new();
    let mut duration = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration = Some(tagged.properties().duration());

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                title = v.trim().to_string();
            }
            if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                artist = v.trim().to_string();
            }
            if let Some(v) = tag.album().filter(|v| !v.trim().is_empty()) {
                album = v.trim().to_string();
            }
        }
    }

    Some(Track {
        id: TrackId::new(locator.clone()),
        title,
        artist,
        album,
        duration,
        media: locator,
        cover_art: None,
    })
}

pub(super) fn scan(root: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .filter_map(|e| read_track(root, e.path()))
        .collect();

    tracks.sort_by_key(|t| t.display().to_lowercase());
    tracks
}

/// Group tracks by their top-level directory. Tracks directly in the root
/// belong to no playlist.
pub(super) fn group_playlists(tracks: &[Track]) -> Vec<Playlist> {
    let mut groups: BTreeMap<&str, Vec<Track>> = BTreeMap::new();
    for track in tracks {
        if let Some((dir, _)) = track.media.split_once('/') {
            groups.entry(dir).or_default().push(track.clone());
        }
    }

    groups
        .into_iter()
        .map(|(dir, tracks)| Playlist {
            id: dir.to_string(),
            name: dir.to_string(),
            description: None,
            tracks,
        })
        .collect()
}
