//! Background Poller
//! Cancellable poll-then-wait loop feeding fresh snapshots to the UI thread.

use super::model::Data;
use super::source::DataSource;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Result of a single poll, tagged with its position in the poll sequence.
#[derive(Debug)]
pub enum PollEvent {
    Snapshot { seq: u64, data: Data },
    Failed { seq: u64, message: String },
}

impl PollEvent {
    pub fn seq(&self) -> u64 {
        match self {
            PollEvent::Snapshot { seq, .. } | PollEvent::Failed { seq, .. } => *seq,
        }
    }
}

/// Handle to a running poll task. Dropping it cancels the task.
pub struct PollHandle {
    events: Receiver<PollEvent>,
    cancel_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Start polling `source`.
    ///
    /// Each cycle waits `interval`, then fetches. The next wait starts only
    /// after the fetch resolved, so requests never overlap. The loop ends
    /// after a snapshot that carries the stop flag, or on cancellation.
    /// `notify` runs after every delivered event (used to wake the UI).
    pub fn spawn<F>(mut source: Box<dyn DataSource>, interval: Duration, notify: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (event_tx, events) = mpsc::channel();
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let thread = thread::spawn(move || {
            let location = source.describe();
            tracing::info!(%location, ?interval, "Polling started");
            let mut seq = 0u64;

            loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        tracing::info!(%location, "Polling cancelled");
                        return;
                    }
                }

                seq += 1;
                let result = source.fetch();

                // A result that resolves after cancellation is never applied.
                if !matches!(cancel_rx.try_recv(), Err(TryRecvError::Empty)) {
                    tracing::info!(%location, seq, "Polling cancelled during request");
                    return;
                }

                let (event, stop) = match result {
                    Ok(data) => {
                        let stop = data.is_stopped();
                        tracing::debug!(seq, points = data.train.len(), stop, "Snapshot received");
                        (PollEvent::Snapshot { seq, data }, stop)
                    }
                    Err(err) => {
                        tracing::debug!(seq, error = %err, "Poll failed");
                        (
                            PollEvent::Failed {
                                seq,
                                message: err.to_string(),
                            },
                            false,
                        )
                    }
                };

                if event_tx.send(event).is_err() {
                    return;
                }
                notify();

                if stop {
                    tracing::info!(%location, seq, "Stop signal received, polling finished");
                    return;
                }
            }
        });

        Self {
            events,
            cancel_tx: Some(cancel_tx),
            thread: Some(thread),
        }
    }

    /// Drain every event delivered since the last call.
    pub fn try_events(&self) -> Vec<PollEvent> {
        self.events.try_iter().collect()
    }

    /// Whether the background loop has exited (stop signal or cancellation).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the loop to exit. Does not cancel it.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Poll thread panicked");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        // The thread is left to finish its in-flight request on its own.
        self.cancel();
    }
}
