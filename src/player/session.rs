use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Track, TrackId};

/// Snapshot of the shared "now playing" state.
///
/// The controller is the only writer; observers get clones. The queue is
/// shared so snapshots stay cheap while playback ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// The track the engine is loaded with.
    pub current_track: Option<Track>,
    /// Tracks reachable with next/previous.
    pub queue: Arc<[Track]>,
    /// Position of `current_track` in `queue`.
    pub current_index: usize,
    pub is_playing: bool,
    pub position: Duration,
    /// Reported by the engine once the media's metadata is read.
    pub duration: Option<Duration>,
    pub volume: f32,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            current_track: None,
            queue: Arc::from(Vec::<Track>::new()),
            current_index: 0,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

impl PlaybackSession {
    pub fn is_loaded(&self) -> bool {
        self.current_track.is_some()
    }

    /// Whether `id` is the loaded track, playing or not.
    pub fn is_current(&self, id: &TrackId) -> bool {
        self.current_track.as_ref().is_some_and(|t| &t.id == id)
    }

    /// Whether `id` is the loaded track and audio is running.
    pub fn is_playing_track(&self, id: &TrackId) -> bool {
        self.is_playing && self.is_current(id)
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.queue.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0 && !self.queue.is_empty()
    }

    /// Elapsed fraction of the track in `0.0..=1.0`; 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
