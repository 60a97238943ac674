//! Engine commands, events and errors.

use std::time::Duration;

use thiserror::Error;

/// Identifies one `load`. Events from an earlier load carry an older id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

/// An event and the load it was produced for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineNotice {
    pub load: LoadId,
    pub event: EngineEvent,
}

/// Notifications from the engine to its single subscriber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Playback progressed to this position.
    TimeUpdate(Duration),
    /// The loaded media's total length became known.
    DurationKnown(Duration),
    /// The loaded media played through to the end.
    Ended,
}

#[derive(Debug)]
pub(super) enum EngineCmd {
    Load { load: LoadId, resource: String },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    /// Stop the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("unsupported media resource: {0}")]
    Unsupported(String),

    #[error("audio thread exited")]
    ThreadGone,
}
