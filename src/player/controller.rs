use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::{Track, TrackId};
use crate::engine::{Engine, EngineEvent, EngineNotice, LoadId};
use crate::media::MediaResolver;

use super::broadcast::{Broadcaster, SessionHandle};
use super::command::PlayerCmd;
use super::session::PlaybackSession;

/// Owner of the audio engine and the one playback session.
///
/// Every command is applied synchronously and never fails: out-of-range
/// arguments are clamped, commands that make no sense in the current state
/// are ignored. After each state change the whole session is published to
/// every observer.
pub struct PlaybackController<E: Engine> {
    engine: E,
    resolver: MediaResolver,
    session: PlaybackSession,
    broadcaster: Broadcaster,
    // Events stamped with any other load belong to media already replaced.
    loaded: Option<LoadId>,
}

impl<E: Engine> PlaybackController<E> {
    /// Take ownership of `engine` and start an empty session at `volume`.
    pub fn new(mut engine: E, resolver: MediaResolver, volume: f32) -> Self {
        let volume = if volume.is_nan() {
            1.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        engine.set_volume(volume);

        let session = PlaybackSession {
            volume,
            ..PlaybackSession::default()
        };
        let broadcaster = Broadcaster::new(&session);

        Self {
            engine,
            resolver,
            session,
            broadcaster,
            loaded: None,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn snapshot(&self) -> PlaybackSession {
        self.session.clone()
    }

    /// Shared latest snapshot for polling readers.
    pub fn session_handle(&self) -> SessionHandle {
        self.broadcaster.handle()
    }

    /// Receive every future snapshot, starting with the current one.
    pub fn subscribe(&mut self) -> Receiver<PlaybackSession> {
        self.broadcaster.subscribe(&self.session)
    }

    /// Observers still connected as of the last broadcast.
    pub fn observer_count(&self) -> usize {
        self.broadcaster.subscriber_count()
    }

    /// The engine load the session currently follows.
    pub fn current_load(&self) -> Option<LoadId> {
        self.loaded
    }

    pub fn is_current(&self, id: &TrackId) -> bool {
        self.session.is_current(id)
    }

    pub fn is_playing_track(&self, id: &TrackId) -> bool {
        self.session.is_playing_track(id)
    }

    fn publish(&mut self) {
        self.broadcaster.publish(&self.session);
    }

    /// Play `track`. A non-empty `queue` replaces the session queue.
    ///
    /// Re-playing the loaded track resumes it instead of reloading.
    pub fn play(&mut self, track: Track, queue: Vec<Track>) {
        if !queue.is_empty() {
            let index = match queue.iter().position(|t| t.id == track.id) {
                Some(i) => i,
                None => {
                    warn!(
                        track = %track.id,
                        queue_len = queue.len(),
                        "track is not in the supplied queue; using index 0"
                    );
                    0
                }
            };
            self.session.queue = queue.into();
            self.session.current_index = index;
        } else if let Some(i) = self.session.queue.iter().position(|t| t.id == track.id) {
            self.session.current_index = i;
        }

        self.start(track);
    }

    /// Load `track` unless it is already loaded, then play.
    fn start(&mut self, track: Track) {
        if self.session.is_current(&track.id) {
            debug!(track = %track.id, "track already loaded; resuming");
        } else {
            let resource = self.resolver.resolve_track(&track);
            info!(track = %track.id, title = %track.display(), %resource, "loading track");
            self.loaded = Some(self.engine.load(&resource));
            self.session.current_track = Some(track);
            self.session.position = Duration::ZERO;
            self.session.duration = None;
        }

        self.engine.play();
        self.session.is_playing = true;
        self.publish();
    }

    pub fn pause(&mut self) {
        if !self.session.is_playing || !self.session.is_loaded() {
            return;
        }
        self.engine.pause();
        self.session.is_playing = false;
        self.publish();
    }

    /// Continue the loaded track from where it is.
    pub fn resume(&mut self) {
        if self.session.is_playing || !self.session.is_loaded() {
            return;
        }
        self.engine.play();
        self.session.is_playing = true;
        self.publish();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.session.is_playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Song-list row click: pause `track` if it is the one playing,
    /// otherwise play it with the list as the queue.
    pub fn play_or_pause(&mut self, track: Track, queue: Vec<Track>) {
        if self.session.is_playing_track(&track.id) {
            self.pause();
        } else {
            self.play(track, queue);
        }
    }

    /// Advance within the queue. Does nothing on the last track.
    pub fn next(&mut self) {
        if !self.session.has_next() {
            return;
        }
        let index = self.session.current_index + 1;
        let track = self.session.queue[index].clone();
        self.session.current_index = index;
        self.start(track);
    }

    /// Step back within the queue. Does nothing on the first track.
    pub fn previous(&mut self) {
        if !self.session.has_previous() {
            return;
        }
        let index = (self.session.current_index - 1).min(self.session.queue.len() - 1);
        let track = self.session.queue[index].clone();
        self.session.current_index = index;
        self.start(track);
    }

    /// Jump to `seconds`, clamped to the track. The position updates at
    /// once rather than waiting for the engine to confirm.
    pub fn seek(&mut self, seconds: f64) {
        if !self.session.is_loaded() {
            return;
        }
        let mut target = if seconds.is_nan() { 0.0 } else { seconds.max(0.0) };
        if let Some(d) = self.session.duration {
            target = target.min(d.as_secs_f64());
        }
        // Unknown duration and an infinite target: nothing sensible to seek to.
        let Ok(position) = Duration::try_from_secs_f64(target) else {
            return;
        };

        self.engine.seek(position);
        self.session.position = position;
        self.publish();
    }

    /// Seek to `fraction` of the duration, for progress-bar clicks.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let Some(d) = self.session.duration else {
            return;
        };
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(d.as_secs_f64() * fraction);
    }

    /// Set the volume, clamped to `0.0..=1.0`. It carries over to later tracks.
    pub fn set_volume(&mut self, level: f32) {
        if level.is_nan() {
            return;
        }
        let level = level.clamp(0.0, 1.0);
        self.engine.set_volume(level);
        self.session.volume = level;
        self.publish();
    }

    /// Fold one engine event into the session.
    ///
    /// Events produced for an earlier load are dropped: a new load
    /// supersedes everything the previous media still had in flight.
    pub fn handle_event(&mut self, notice: EngineNotice) {
        if !self.session.is_loaded() {
            return;
        }
        if self.loaded != Some(notice.load) {
            debug!(load = ?notice.load, event = ?notice.event, "dropping stale engine event");
            return;
        }
        match notice.event {
            EngineEvent::TimeUpdate(at) => {
                self.session.position = match self.session.duration {
                    Some(d) => at.min(d),
                    None => at,
                };
                self.publish();
            }
            EngineEvent::DurationKnown(d) => {
                self.session.duration = Some(d);
                self.session.position = self.session.position.min(d);
                self.publish();
            }
            EngineEvent::Ended => {
                if self.session.has_next() {
                    self.next();
                } else {
                    debug!("end of queue reached");
                    self.session.is_playing = false;
                    if let Some(d) = self.session.duration {
                        self.session.position = d;
                    }
                    self.publish();
                }
            }
        }
    }

    /// Apply a command received from an observer.
    pub fn dispatch(&mut self, cmd: PlayerCmd) {
        debug!(?cmd, "player command");
        match cmd {
            PlayerCmd::Play { track, queue } => self.play(track, queue),
            PlayerCmd::PlayOrPause { track, queue } => self.play_or_pause(track, queue),
            PlayerCmd::Resume => self.resume(),
            PlayerCmd::Pause => self.pause(),
            PlayerCmd::TogglePlayPause => self.toggle_play_pause(),
            PlayerCmd::Next => self.next(),
            PlayerCmd::Previous => self.previous(),
            PlayerCmd::Seek(seconds) => self.seek(seconds),
            PlayerCmd::SeekFraction(fraction) => self.seek_fraction(fraction),
            PlayerCmd::SetVolume(level) => self.set_volume(level),
        }
    }

    /// Stop audio for good, fading out over `fade_out`.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.engine.shutdown(fade_out);
        if self.session.is_playing {
            self.session.is_playing = false;
            self.publish();
        }
    }
}
