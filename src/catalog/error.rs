use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("search query is required")]
    EmptyQuery,

    #[error("playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("library root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The backing storage could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
