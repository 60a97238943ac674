use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

enum Signal<T> {
    Schedule(T),
    Cancel,
}

/// A cancellable delayed action.
///
/// [`schedule`](Self::schedule) (re)starts the quiet period with a new value;
/// when the period passes with no further schedule, the action runs once
/// with the latest value. Dropping the debouncer discards anything pending
/// and stops its worker thread.
pub struct Debouncer<T: Send + 'static> {
    tx: Option<Sender<Signal<T>>>,
    join: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(quiet: Duration, mut action: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Signal<T>>();

        let join = thread::spawn(move || {
            let mut pending: Option<(T, Instant)> = None;
            loop {
                let received = match pending.as_ref() {
                    Some((_, deadline)) => {
                        rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                    }
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };

                match received {
                    Ok(Signal::Schedule(value)) => pending = Some((value, Instant::now() + quiet)),
                    Ok(Signal::Cancel) => pending = None,
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some((value, _)) = pending.take() {
                            action(value);
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            tx: Some(tx),
            join: Some(join),
        }
    }

    pub fn schedule(&self, value: T) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Signal::Schedule(value));
        }
    }

    pub fn cancel(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Signal::Cancel);
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.tx.take();
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
