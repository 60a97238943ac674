use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::catalog::TrackId;
use crate::player::{PlaybackSession, format_duration, format_time};

/// Log track changes and play/pause transitions as they are broadcast.
pub fn spawn(sessions: Receiver<PlaybackSession>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut last: Option<(Option<TrackId>, bool)> = None;
        for session in sessions {
            let key = (
                session.current_track.as_ref().map(|t| t.id.clone()),
                session.is_playing,
            );
            if last.as_ref() == Some(&key) {
                continue;
            }

            if let Some(track) = &session.current_track {
                info!(
                    state = if session.is_playing { "playing" } else { "paused" },
                    position = %format_time(session.position.as_secs_f64()),
                    length = %format_duration(session.duration.or(track.duration)),
                    queue = %format!("{}/{}", session.current_index + 1, session.queue.len()),
                    "{}",
                    track.display()
                );
            }
            last = Some(key);
        }
    })
}
