use std::sync::mpsc::{self, Receiver, SendError, Sender};

use crate::catalog::Track;

/// The controller's command surface as data, for observers on other threads.
#[derive(Debug, Clone)]
pub enum PlayerCmd {
    /// Play `track`; a non-empty `queue` replaces the session queue.
    Play { track: Track, queue: Vec<Track> },
    /// Song-list click: pause if `track` is playing, otherwise play it with `queue`.
    PlayOrPause { track: Track, queue: Vec<Track> },
    /// Resume the loaded track.
    Resume,
    Pause,
    TogglePlayPause,
    Next,
    Previous,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    /// Seek to a fraction of the track's duration.
    SeekFraction(f64),
    SetVolume(f32),
}

/// Messages accepted by the application's control loop.
#[derive(Debug, Clone)]
pub enum ControlCmd {
    Player(PlayerCmd),
    Quit,
}

/// Cloneable sender any observer can hold to drive playback.
#[derive(Debug, Clone)]
pub struct PlayerRemote {
    tx: Sender<ControlCmd>,
}

impl PlayerRemote {
    /// A remote plus the receiving end for the control loop.
    pub fn channel() -> (Self, Receiver<ControlCmd>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<ControlCmd>> {
        self.tx.send(ControlCmd::Player(cmd))
    }

    /// Ask the control loop to shut down.
    pub fn quit(&self) -> Result<(), SendError<ControlCmd>> {
        self.tx.send(ControlCmd::Quit)
    }
}
