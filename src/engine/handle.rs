use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use super::Engine;
use super::thread::spawn_audio_thread;
use super::types::{EngineCmd, EngineError, EngineNotice, LoadId};

/// The `rodio` engine: a dedicated audio thread owning the output stream.
///
/// Commands are queued to the thread and never block. Events come back on
/// the receiver returned by [`RodioEngine::spawn`], which belongs to whoever
/// owns the controller.
pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
    loads: u64,
}

impl RodioEngine {
    /// Start the audio thread. `tick` is how often position updates are emitted.
    pub fn spawn(tick: Duration) -> Result<(Self, Receiver<EngineNotice>), EngineError> {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (events_tx, events_rx) = mpsc::channel::<EngineNotice>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), EngineError>>(1);

        let join = spawn_audio_thread(rx, events_tx, ready_tx, tick.max(Duration::from_millis(1)));
        ready_rx.recv().map_err(|_| EngineError::ThreadGone)??;

        let engine = Self {
            tx,
            join: Mutex::new(Some(join)),
            loads: 0,
        };
        Ok((engine, events_rx))
    }

    fn send(&self, cmd: EngineCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(command = ?e.0, "audio thread is gone; command dropped");
        }
    }

    /// Fade out, stop and join the audio thread. Later calls do nothing.
    pub fn quit_softly(&self, fade_out: Duration) {
        let Ok(mut join) = self.join.lock() else {
            return;
        };
        if let Some(h) = join.take() {
            let _ = self.tx.send(EngineCmd::Quit {
                fade_out_ms: millis(fade_out),
            });
            let _ = h.join();
        }
    }
}

pub(super) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Engine for RodioEngine {
    fn load(&mut self, resource: &str) -> LoadId {
        self.loads += 1;
        let load = LoadId(self.loads);
        self.send(EngineCmd::Load {
            load,
            resource: resource.to_string(),
        });
        load
    }

    fn play(&mut self) {
        self.send(EngineCmd::Play);
    }

    fn pause(&mut self) {
        self.send(EngineCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(EngineCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(EngineCmd::SetVolume(volume));
    }

    fn shutdown(&mut self, fade_out: Duration) {
        self.quit_softly(fade_out);
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.quit_softly(Duration::ZERO);
    }
}
