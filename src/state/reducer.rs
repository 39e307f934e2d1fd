//! History reducer.

use crate::types::{Action, State};
use std::sync::Arc;

/// Apply an action to a state snapshot.
///
/// Returns a new snapshot, or a clone of the same `Arc` when the action is a
/// no-op (undo with no past, redo with no future, or a write of the value
/// already present). Callers can use `Arc::ptr_eq` to detect "unchanged".
pub fn reduce<T>(state: &Arc<State<T>>, action: Action<T>) -> Arc<State<T>>
where
    T: Clone + PartialEq,
{
    match action {
        Action::Undo => {
            let Some((previous, rest)) = state.past.split_last() else {
                return Arc::clone(state);
            };

            let mut future = Vec::with_capacity(state.future.len() + 1);
            future.push(state.present.clone());
            future.extend_from_slice(&state.future);

            Arc::new(State {
                past: rest.to_vec(),
                present: previous.clone(),
                future,
                options: state.options.clone(),
            })
        }

        Action::Redo => {
            let Some((next, rest)) = state.future.split_first() else {
                return Arc::clone(state);
            };

            let mut past = Vec::with_capacity(state.past.len() + 1);
            past.extend_from_slice(&state.past);
            past.push(state.present.clone());

            Arc::new(State {
                past,
                present: next.clone(),
                future: rest.to_vec(),
                options: state.options.clone(),
            })
        }

        // The checkpoint tag is metadata only
        Action::Set { new_present, .. } => {
            if state.present.as_ref() == Some(&new_present) {
                return Arc::clone(state);
            }

            Arc::new(State {
                past: push_capped(&state.past, state.present.clone(), state.options.max_history),
                present: Some(new_present),
                future: Vec::new(),
                options: state.options.clone(),
            })
        }

        Action::Reset { new_present } => Arc::new(State {
            past: Vec::new(),
            present: Some(new_present),
            future: Vec::new(),
            options: state.options.clone(),
        }),
    }
}

/// Append `present` to `past`, evicting the oldest entries so the result
/// never holds more than `max` entries.
fn push_capped<T: Clone>(
    past: &[Option<T>],
    present: Option<T>,
    max: Option<usize>,
) -> Vec<Option<T>> {
    match max {
        Some(0) => Vec::new(),
        Some(max) if past.len() >= max => {
            let keep = max - 1;
            let mut next = Vec::with_capacity(max);
            next.extend_from_slice(&past[past.len() - keep..]);
            next.push(present);
            next
        }
        _ => {
            let mut next = Vec::with_capacity(past.len() + 1);
            next.extend_from_slice(past);
            next.push(present);
            next
        }
    }
}
