//! The audio engine seam.
//!
//! The controller drives exactly one [`Engine`] with fire-and-forget
//! commands and consumes its [`EngineNotice`]s one at a time. [`RodioEngine`]
//! is the real implementation; tests substitute a recording fake.

mod handle;
mod sink;
mod thread;
mod types;

use std::time::Duration;

pub use handle::RodioEngine;
pub use types::{EngineError, EngineEvent, EngineNotice, LoadId};

/// Commands the controller issues to the audio engine.
///
/// None of these block or report failure: problems are logged by the
/// implementation and the session keeps its last known state.
pub trait Engine {
    /// Replace whatever is loaded with `resource`, paused at the start.
    ///
    /// Every later event for this media is stamped with the returned id;
    /// ids of successive loads differ.
    fn load(&mut self, resource: &str) -> LoadId;
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to `position` in the loaded media.
    fn seek(&mut self, position: Duration);
    /// Apply a volume in `0.0..=1.0`; it persists across loads.
    fn set_volume(&mut self, volume: f32);
    /// Release the output, optionally fading out first.
    fn shutdown(&mut self, _fade_out: Duration) {}
}
