//! Free-text matching shared by catalog implementations.

use super::error::CatalogError;
use super::model::Track;

/// Trim `query`, rejecting it when nothing is left.
pub fn normalize_query(query: &str) -> Result<String, CatalogError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyQuery);
    }
    Ok(trimmed.to_lowercase())
}

fn matches(track: &Track, needle: &str) -> bool {
    [&track.title, &track.artist, &track.album]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Tracks whose title, artist or album contain `query`, in input order.
pub fn filter_tracks(tracks: &[Track], query: &str) -> Result<Vec<Track>, CatalogError> {
    let needle = normalize_query(query)?;
    Ok(tracks
        .iter()
        .filter(|t| matches(t, &needle))
        .cloned()
        .collect())
}
