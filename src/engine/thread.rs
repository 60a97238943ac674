use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::sink::{create_sink_at, local_path};
use super::types::{EngineCmd, EngineError, EngineEvent, EngineNotice, LoadId};

/// Everything the audio thread owns besides the output stream.
struct AudioState {
    sink: Option<Sink>,
    path: Option<PathBuf>,
    paused: bool,
    volume: f32,
    // Elapsed = accumulated + time since `started_at` while playing.
    started_at: Option<Instant>,
    accumulated: Duration,
    ended_sent: bool,
    // Stamped on every event so the subscriber can drop stale ones.
    load: LoadId,
    events: Sender<EngineNotice>,
}

impl AudioState {
    fn new(events: Sender<EngineNotice>) -> Self {
        Self {
            sink: None,
            path: None,
            paused: true,
            volume: 1.0,
            started_at: None,
            accumulated: Duration::ZERO,
            ended_sent: false,
            load: LoadId(0),
            events,
        }
    }

    fn emit(&self, event: EngineEvent) {
        // The subscriber going away only happens during shutdown.
        let _ = self.events.send(EngineNotice {
            load: self.load,
            event,
        });
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn stop_current(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.ended_sent = false;
    }

    fn load(&mut self, stream: &OutputStream, load: LoadId, resource: &str) {
        self.stop_current();
        self.load = load;
        self.path = None;
        self.paused = true;

        let volume = self.volume;
        let opened = local_path(resource).and_then(|path| {
            let (sink, total) = create_sink_at(stream, &path, Duration::ZERO, volume)?;
            Ok((path, sink, total))
        });
        match opened {
            Ok((path, sink, total)) => {
                debug!(path = %path.display(), "media loaded");
                self.sink = Some(sink);
                self.path = Some(path);
                if let Some(total) = total {
                    self.emit(EngineEvent::DurationKnown(total));
                }
            }
            Err(e) => warn!(resource, error = %e, "failed to load media"),
        }
    }

    /// Rebuild the sink at `at`, keeping the current transport state.
    fn reopen_at(&mut self, stream: &OutputStream, at: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        match create_sink_at(stream, &path, at, self.volume) {
            Ok((sink, _)) => {
                if self.paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                self.accumulated = at;
                self.ended_sent = false;
                self.emit(EngineEvent::TimeUpdate(at));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to reopen media");
                self.started_at = None;
                self.paused = true;
            }
        }
    }

    fn play(&mut self, stream: &OutputStream) {
        if !self.paused {
            return;
        }
        // A drained sink plays from the top again.
        if self.sink.as_ref().is_some_and(|s| s.empty()) {
            self.reopen_at(stream, Duration::ZERO);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    /// Periodic work: report progress, or the end of the media.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if s.empty() {
            if !self.ended_sent {
                self.pause();
                self.ended_sent = true;
                self.emit(EngineEvent::Ended);
            }
        } else {
            self.emit(EngineEvent::TimeUpdate(self.elapsed()));
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || self.paused {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<EngineCmd>,
    events: Sender<EngineNotice>,
    ready: SyncSender<Result<(), EngineError>>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(EngineError::NoOutputDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped; keep shutdown quiet.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut state = AudioState::new(events);
        let mut last_tick = Instant::now();

        loop {
            let wait = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(cmd) => match cmd {
                    EngineCmd::Load { load, resource } => state.load(&stream, load, &resource),
                    EngineCmd::Play => state.play(&stream),
                    EngineCmd::Pause => state.pause(),
                    EngineCmd::Seek(to) => state.reopen_at(&stream, to),
                    EngineCmd::SetVolume(v) => state.set_volume(v),
                    EngineCmd::Quit { fade_out_ms } => {
                        state.fade_out(fade_out_ms);
                        state.stop_current();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= tick {
                state.tick();
                last_tick = Instant::now();
            }
        }
        debug!("audio thread stopped");
    })
}
