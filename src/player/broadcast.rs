//! Snapshot fan-out to observers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use super::session::PlaybackSession;

/// Latest snapshot, for readers that poll instead of subscribing.
pub type SessionHandle = Arc<Mutex<PlaybackSession>>;

pub(super) struct Broadcaster {
    latest: SessionHandle,
    subscribers: Vec<Sender<PlaybackSession>>,
}

impl Broadcaster {
    pub(super) fn new(initial: &PlaybackSession) -> Self {
        Self {
            latest: Arc::new(Mutex::new(initial.clone())),
            subscribers: Vec::new(),
        }
    }

    pub(super) fn handle(&self) -> SessionHandle {
        self.latest.clone()
    }

    /// New subscriber; it receives `current` straight away.
    pub(super) fn subscribe(&mut self, current: &PlaybackSession) -> Receiver<PlaybackSession> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(current.clone());
        self.subscribers.push(tx);
        rx
    }

    /// Every observer gets the same whole snapshot. Subscribers whose
    /// receiver was dropped are forgotten.
    pub(super) fn publish(&mut self, snapshot: &PlaybackSession) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = snapshot.clone();
        }
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    pub(super) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
