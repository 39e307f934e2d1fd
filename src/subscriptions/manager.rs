//! Subscription manager for broadcasting history changes.

use crate::types::{ActionKind, State};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::{
    DropReason, HistoryEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription<T> {
    config: SubscriptionConfig,
    sender: Sender<HistoryEvent<T>>,
}

impl<T> Subscription<T> {
    /// Try to send an event. Returns the drop reason if the subscriber must go.
    fn try_send(&self, event: HistoryEvent<T>) -> Result<(), DropReason> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DropReason::BufferOverflow),
            Err(TrySendError::Disconnected(_)) => Err(DropReason::Disconnected),
        }
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager<T> {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription<T>>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl<T: Clone> SubscriptionManager<T> {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    ///
    /// `current` is delivered first when the config asks for it.
    pub fn subscribe(
        &self,
        config: SubscriptionConfig,
        current: &Arc<State<T>>,
    ) -> SubscriptionHandle<T> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        // A zero-capacity channel would reject every try_send
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        if config.emit_current {
            let _ = sender.try_send(HistoryEvent::Current {
                state: Arc::clone(current),
            });
        }

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        tracing::debug!(subscription = id.0, "subscribed to history changes");

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Best effort
            let _ = sub.sender.try_send(HistoryEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Broadcast a state replacement to matching subscriptions.
    pub fn broadcast_change(&self, kind: ActionKind, checkpoint: bool, state: &Arc<State<T>>) {
        let event = HistoryEvent::Changed {
            kind,
            checkpoint,
            state: Arc::clone(state),
        };

        self.broadcast(|sub| sub.config.filter.accepts(kind), event);
    }

    /// Internal broadcast helper. Drops subscribers that fail to receive.
    fn broadcast<F>(&self, filter: F, event: HistoryEvent<T>)
    where
        F: Fn(&Subscription<T>) -> bool,
    {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if filter(sub) {
                    if let Err(reason) = sub.try_send(event.clone()) {
                        to_remove.push((*id, reason));
                    }
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for (id, reason) in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    tracing::warn!(subscription = id.0, ?reason, "dropping history subscriber");
                    // Might fail, that's ok
                    let _ = sub.sender.try_send(HistoryEvent::Dropped { reason });
                }
            }
        }
    }
}

impl<T: Clone> Default for SubscriptionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
