//! MPRIS bridge on the D-Bus session bus.
//!
//! Media keys, desktop widgets and `playerctl` see the session through this
//! observer and drive it with the same commands as any other view.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::player::{PlaybackSession, PlayerCmd, PlayerRemote};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.cadence";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Status {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Default)]
struct SharedState {
    status: Status,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    volume: f64,
    track_id: Option<OwnedObjectPath>,
}

/// Latest session as seen by the bus interfaces.
#[derive(Clone)]
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

fn micros(d: Duration) -> i64 {
    i64::try_from(d.as_micros()).unwrap_or(i64::MAX)
}

impl MprisHandle {
    /// Mirror `session` into what the bus reports.
    pub fn update(&self, session: &PlaybackSession) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };

        s.status = match (&session.current_track, session.is_playing) {
            (None, _) => Status::Stopped,
            (Some(_), true) => Status::Playing,
            (Some(_), false) => Status::Paused,
        };
        s.position_micros = micros(session.position);
        s.volume = f64::from(session.volume);

        match &session.current_track {
            Some(track) => {
                s.title = Some(track.title.clone());
                s.artist = if track.artist.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![track.artist.clone()]
                };
                s.album = Some(track.album.clone()).filter(|a| !a.trim().is_empty());
                s.url = Some(track.media.clone());
                s.length_micros = session.duration.or(track.duration).map(micros);
                s.track_id = ObjectPath::try_from(format!(
                    "{OBJECT_PATH}/track/{}",
                    session.current_index
                ))
                .ok()
                .map(OwnedObjectPath::from);
            }
            None => {
                s.title = None;
                s.artist.clear();
                s.album = None;
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

struct RootIface {
    remote: PlayerRemote,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // Headless: nothing to raise.
    }

    fn quit(&self) {
        let _ = self.remote.quit();
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cadence"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    remote: PlayerRemote,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn send(&self, cmd: PlayerCmd) {
        if self.remote.send(cmd).is_err() {
            debug!("MPRIS: control loop is gone");
        }
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.send(PlayerCmd::Next);
    }

    fn previous(&self) {
        self.send(PlayerCmd::Previous);
    }

    fn play(&self) {
        self.send(PlayerCmd::Resume);
    }

    fn pause(&self) {
        self.send(PlayerCmd::Pause);
    }

    fn play_pause(&self) {
        self.send(PlayerCmd::TogglePlayPause);
    }

    fn stop(&self) {
        // The session has no stopped state; stopping keeps the track loaded.
        self.send(PlayerCmd::Pause);
    }

    /// Relative seek, in microseconds.
    fn seek(&self, offset: i64) {
        let current = self.state.lock().map(|s| s.position_micros).unwrap_or(0);
        let target = current.saturating_add(offset);
        self.send(PlayerCmd::Seek(target as f64 / 1_000_000.0));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.status {
            Status::Stopped => "Stopped",
            Status::Playing => "Playing",
            Status::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(1.0)
    }

    #[zbus(property)]
    fn set_volume(&mut self, value: f64) {
        self.send(PlayerCmd::SetVolume(value as f32));
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        put("xesam:title", Value::from(s.title.clone().unwrap_or_default()));
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Register the MPRIS service and keep it fed with `sessions`.
///
/// Runs on two background threads: one serving the bus, one folding
/// snapshots into the shared state. A missing session bus is logged and
/// otherwise ignored.
pub fn spawn_mpris(remote: PlayerRemote, sessions: Receiver<PlaybackSession>) -> MprisHandle {
    let handle = MprisHandle {
        state: Arc::new(Mutex::new(SharedState {
            volume: 1.0,
            ..SharedState::default()
        })),
    };

    let follower = handle.clone();
    std::thread::spawn(move || {
        for session in sessions {
            follower.update(&session);
        }
    });

    let state_for_thread = handle.state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    RootIface {
                        remote: remote.clone(),
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        remote,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            debug!("MPRIS: registered {BUS_NAME}");
            // Keep the service alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    });

    handle
}

#[cfg(test)]
mod tests;
