//! Worker thread that fires debounced values.

use super::slot::DebounceSlot;
use crate::error::Result;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// An owned, cancelable debounce timer.
///
/// Each `schedule` call supersedes the previous pending value and restarts
/// the quiet period. Once the period elapses the last value is handed to the
/// fire callback on the worker thread. Dropping the timer discards whatever
/// is still pending and joins the worker.
pub struct DebounceTimer<V> {
    sender: Option<Sender<V>>,
    worker: Option<JoinHandle<()>>,
    /// Scheduled values not yet fired, superseded or cancelled.
    outstanding: Arc<AtomicUsize>,
}

impl<V: Send + 'static> DebounceTimer<V> {
    /// Start the worker thread.
    pub fn spawn<F>(delay: Duration, fire: F) -> Result<Self>
    where
        F: FnMut(V) + Send + 'static,
    {
        let (sender, receiver) = unbounded();
        let outstanding = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&outstanding);

        let worker = thread::Builder::new()
            .name("rewind-debounce".to_string())
            .spawn(move || run(receiver, delay, counter, fire))?;

        tracing::debug!(?delay, "debounce timer started");

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            outstanding,
        })
    }

    /// Schedule `value`, replacing any pending one.
    pub fn schedule(&self, value: V) {
        if let Some(sender) = &self.sender {
            self.outstanding.fetch_add(1, Ordering::SeqCst);
            if sender.send(value).is_err() {
                // Worker is gone; nothing will ever resolve this value
                self.outstanding.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    /// Whether a scheduled value is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.outstanding.load(Ordering::SeqCst) > 0
    }
}

impl<V> Drop for DebounceTimer<V> {
    fn drop(&mut self) {
        // Disconnecting the channel tells the worker to cancel and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("debounce worker panicked");
            }
        }
    }
}

fn run<V, F>(receiver: Receiver<V>, delay: Duration, outstanding: Arc<AtomicUsize>, mut fire: F)
where
    F: FnMut(V),
{
    let mut slot = DebounceSlot::new(delay);

    loop {
        let received = match slot.deadline() {
            Some(deadline) => receiver.recv_deadline(deadline),
            // Idle, or holding a value that is never due
            None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(value) => {
                if slot.schedule(value, Instant::now()).is_some() {
                    outstanding.fetch_sub(1, Ordering::SeqCst);
                    tracing::trace!("debounce window restarted");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(value) = slot.take_due(Instant::now()) {
                    fire(value);
                    outstanding.fetch_sub(1, Ordering::SeqCst);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                if slot.cancel().is_some() {
                    outstanding.fetch_sub(1, Ordering::SeqCst);
                    tracing::debug!("pending debounced value cancelled");
                }
                break;
            }
        }
    }

    tracing::debug!("debounce timer stopped");
}
