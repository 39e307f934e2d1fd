//! Deadline bookkeeping for a single debounced value.

use std::time::{Duration, Instant};

/// Holds at most one pending value and the instant it becomes due.
///
/// Scheduling while a value is pending replaces it and restarts the
/// quiet period (trailing edge). A delay too large to represent as an
/// `Instant` leaves the value pending with no deadline.
#[derive(Debug)]
pub struct DebounceSlot<V> {
    delay: Duration,
    pending: Option<(V, Option<Instant>)>,
}

impl<V> DebounceSlot<V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Store `value` as the pending one, due `delay` after `now`.
    ///
    /// Returns the value it superseded, if any.
    pub fn schedule(&mut self, value: V, now: Instant) -> Option<V> {
        self.pending
            .replace((value, now.checked_add(self.delay)))
            .map(|(old, _)| old)
    }

    /// When the pending value becomes due.
    ///
    /// None when nothing is pending or the value is never due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and_then(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<V> {
        match self.pending {
            Some((_, Some(deadline))) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Discard the pending value without firing it.
    pub fn cancel(&mut self) -> Option<V> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
