//! `cadence`: the playback side of a music-streaming client.
//!
//! A single [`player::PlaybackController`] owns the audio engine and the
//! shared "now playing" session. Views, the MPRIS bridge and anything else
//! that cares about playback observe session snapshots and send commands;
//! none of them touch the engine.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod logging;
pub mod media;
pub mod mpris;
pub mod player;
pub mod runtime;
pub mod search;
