//! The playback session controller.
//!
//! One [`PlaybackController`] owns the audio engine and the single
//! [`PlaybackSession`]. Views never touch the engine: they read snapshots
//! (by subscription or through the shared [`SessionHandle`]) and issue
//! commands, directly or as [`PlayerCmd`]s over a [`PlayerRemote`].

mod broadcast;
mod command;
mod controller;
mod session;
mod time;

pub use broadcast::SessionHandle;
pub use command::{ControlCmd, PlayerCmd, PlayerRemote};
pub use controller::PlaybackController;
pub use session::PlaybackSession;
pub use time::{format_duration, format_time};
