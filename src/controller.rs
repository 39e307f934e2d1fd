//! History controller tying the reducer, debounce timer and subscriptions
//! together.

use crate::debounce::DebounceTimer;
use crate::error::Result;
use crate::state::reduce;
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Action, State, UndoOptions};
use parking_lot::RwLock;
use std::sync::Arc;

/// State shared between the controller and its debounce worker.
struct Shared<T> {
    /// Current snapshot. Replaced, never mutated.
    state: RwLock<Arc<State<T>>>,

    subscriptions: SubscriptionManager<T>,
}

impl<T: Clone + PartialEq> Shared<T> {
    /// Reduce the current state with `action` and swap in the result.
    ///
    /// Returns false when the action was a no-op.
    fn dispatch(&self, action: Action<T>) -> bool {
        let kind = action.kind();
        let checkpoint = action.is_checkpoint();

        let mut current = self.state.write();
        let next = reduce(&*current, action);

        if Arc::ptr_eq(&*current, &next) {
            tracing::trace!(%kind, "history action was a no-op");
            return false;
        }

        *current = Arc::clone(&next);

        // Still under the write lock so subscribers see changes in order
        self.subscriptions.broadcast_change(kind, checkpoint, &next);

        tracing::debug!(
            %kind,
            checkpoint,
            past = next.past.len(),
            future = next.future.len(),
            "history state replaced"
        );
        true
    }
}

/// Owns the history of one value.
///
/// Provides:
/// - Immediate writes (`set`, `reset`)
/// - Debounced writes (`set_debounced`)
/// - Guarded navigation (`undo`, `redo`)
/// - Change subscriptions
///
/// Every instance has its own state and its own debounce timer. Dropping
/// the controller cancels a pending debounced write.
pub struct HistoryController<T> {
    shared: Arc<Shared<T>>,

    /// Pending debounced write: the value and its checkpoint tag.
    timer: DebounceTimer<(T, bool)>,
}

impl<T> HistoryController<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a controller with optional initial value.
    ///
    /// Fails only if the debounce worker thread cannot be started.
    pub fn new(initial: Option<T>, options: UndoOptions) -> Result<Self> {
        let debounce = options.debounce_time;
        let shared = Arc::new(Shared {
            state: RwLock::new(Arc::new(State::new(initial, options))),
            subscriptions: SubscriptionManager::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let timer = DebounceTimer::spawn(debounce, move |(new_present, checkpoint): (T, bool)| {
            worker_shared.dispatch(Action::Set {
                new_present,
                checkpoint,
            });
        })?;

        Ok(Self { shared, timer })
    }

    /// Create a controller starting from `initial`.
    pub fn with_initial(initial: T, options: UndoOptions) -> Result<Self> {
        Self::new(Some(initial), options)
    }

    // --- Writes ---

    /// Write a new present value immediately.
    pub fn set(&self, new_present: T) {
        self.set_with_checkpoint(new_present, false);
    }

    /// Write a new present value immediately, tagging it as a checkpoint.
    pub fn set_with_checkpoint(&self, new_present: T, checkpoint: bool) {
        self.shared.dispatch(Action::Set {
            new_present,
            checkpoint,
        });
    }

    /// Write a new present value once `debounce_time` passes without
    /// another debounced write. Only the last value is applied.
    pub fn set_debounced(&self, new_present: T) {
        self.set_debounced_with_checkpoint(new_present, false);
    }

    /// Debounced write carrying a checkpoint tag.
    pub fn set_debounced_with_checkpoint(&self, new_present: T, checkpoint: bool) {
        self.timer.schedule((new_present, checkpoint));
    }

    /// Drop all history and start again from `new_present`.
    pub fn reset(&self, new_present: T) {
        self.shared.dispatch(Action::reset(new_present));
    }

    // --- Navigation ---

    /// Step back one entry. Does nothing when there is no past.
    pub fn undo(&self) {
        if self.can_undo() {
            self.shared.dispatch(Action::Undo);
        }
    }

    /// Step forward one entry. Does nothing when there is no future.
    pub fn redo(&self) {
        if self.can_redo() {
            self.shared.dispatch(Action::Redo);
        }
    }

    // --- Queries ---

    pub fn can_undo(&self) -> bool {
        self.shared.state.read().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.shared.state.read().can_redo()
    }

    /// Current snapshot. Stays valid (and unchanged) after later transitions.
    pub fn state(&self) -> Arc<State<T>> {
        Arc::clone(&*self.shared.state.read())
    }

    /// Clone of the current present value.
    pub fn present(&self) -> Option<T> {
        self.shared.state.read().present.clone()
    }

    pub fn options(&self) -> UndoOptions {
        self.shared.state.read().options.clone()
    }

    /// Whether a debounced write is waiting for its quiet period.
    pub fn has_pending(&self) -> bool {
        self.timer.is_pending()
    }

    // --- Subscriptions ---

    /// Subscribe to state replacements.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle<T> {
        // Hold the read lock so no change slips between snapshot and registration
        let state = self.shared.state.read();
        self.shared.subscriptions.subscribe(config, &*state)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.shared.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.shared.subscriptions.subscription_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::HistoryEvent;
    use crate::types::ActionKind;
    use std::time::Duration;

    fn controller(initial: i32) -> HistoryController<i32> {
        HistoryController::with_initial(initial, UndoOptions::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let ctl = controller(10);
        let state = ctl.state();

        assert_eq!(state.present, Some(10));
        assert!(state.past.is_empty());
        assert!(state.future.is_empty());
        assert!(!ctl.can_undo());
        assert!(!ctl.can_redo());
    }

    #[test]
    fn test_no_initial_value() {
        let ctl: HistoryController<i32> =
            HistoryController::new(None, UndoOptions::default()).unwrap();
        assert_eq!(ctl.present(), None);
    }

    #[test]
    fn test_flags_follow_state() {
        let ctl = controller(0);
        ctl.set(1);
        assert!(ctl.can_undo());
        assert!(!ctl.can_redo());

        ctl.undo();
        assert!(!ctl.can_undo());
        assert!(ctl.can_redo());
    }

    #[test]
    fn test_guarded_navigation_is_silent() {
        let ctl = controller(3);
        let before = ctl.state();

        ctl.undo();
        ctl.redo();

        assert!(Arc::ptr_eq(&before, &ctl.state()));
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let ctl = controller(1);
        let before = ctl.state();
        ctl.set(2);

        assert_eq!(before.present, Some(1));
        assert_eq!(ctl.present(), Some(2));
    }

    #[test]
    fn test_noop_writes_broadcast_nothing() {
        let ctl = controller(1);
        let handle = ctl.subscribe(SubscriptionConfig::default());

        ctl.set(1);
        ctl.undo();
        assert!(handle.try_recv().is_err());

        ctl.set(2);
        match handle.try_recv().unwrap() {
            HistoryEvent::Changed {
                kind, checkpoint, ..
            } => {
                assert_eq!(kind, ActionKind::Set);
                assert!(!checkpoint);
            }
            other => panic!("Expected Changed event, got {:?}", other),
        }
    }

    #[test]
    fn test_checkpoint_reaches_subscribers() {
        let ctl = controller(1);
        let handle = ctl.subscribe(SubscriptionConfig::default());

        ctl.set_with_checkpoint(2, true);

        assert!(matches!(
            handle.try_recv().unwrap(),
            HistoryEvent::Changed {
                checkpoint: true,
                ..
            }
        ));
    }

    #[test]
    fn test_debounced_write_applies_later() {
        let ctl = HistoryController::with_initial(
            100,
            UndoOptions::default().with_debounce(Duration::from_millis(100)),
        )
        .unwrap();
        let handle = ctl.subscribe(SubscriptionConfig::default());

        ctl.set_debounced(50);
        assert!(ctl.has_pending());
        assert_eq!(ctl.present(), Some(100));

        handle.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(ctl.present(), Some(50));
        assert_eq!(ctl.state().past, vec![Some(100)]);
    }
}
