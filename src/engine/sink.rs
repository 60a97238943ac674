//! Utilities for turning a resolved media resource into a `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

/// Map a resolved resource to a local path.
///
/// Plain paths and `file://` URLs are playable; other schemes belong to a
/// streaming layer this engine does not have.
pub(super) fn local_path(resource: &str) -> Result<PathBuf, EngineError> {
    if let Some(rest) = resource.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if resource.contains("://") {
        return Err(EngineError::Unsupported(resource.to_string()));
    }
    Ok(PathBuf::from(resource))
}

/// A paused sink positioned at `start_at`, plus the decoder's total length if it knows it.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}
