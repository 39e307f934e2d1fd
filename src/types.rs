//! Core types for history tracking.

use crate::error::{HistoryError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// History configuration, fixed when a controller is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UndoOptions {
    /// Maximum number of past entries (None = unbounded).
    ///
    /// `Some(0)` keeps no past entries at all.
    pub max_history: Option<usize>,

    /// Quiet period before a debounced write is applied.
    /// Serialized as whole milliseconds.
    #[serde(with = "duration_ms")]
    pub debounce_time: Duration,

    /// Declares that the host tags writes with checkpoints.
    /// Reserved; transitions ignore it.
    pub use_checkpoints: bool,
}

impl Default for UndoOptions {
    fn default() -> Self {
        Self {
            max_history: None,
            debounce_time: Duration::ZERO,
            use_checkpoints: false,
        }
    }
}

impl UndoOptions {
    /// Cap the number of retained past entries.
    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = Some(max);
        self
    }

    /// Set the debounce quiet period.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_time = debounce;
        self
    }

    /// Parse options supplied by a host, e.g. `{"maxHistory": 5, "debounceTime": 250}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HistoryError::InvalidOptions(e.to_string()))
    }
}

mod duration_ms {
    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom("duration does not fit in u64 milliseconds"))?;
        s.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Immutable history snapshot.
///
/// Never mutated once shared: every transition builds a new value and the
/// controller swaps the `Arc` it holds.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State<T> {
    /// Superseded present values, oldest first.
    pub past: Vec<Option<T>>,

    /// The active value (None until something has been set).
    pub present: Option<T>,

    /// Values undone away from present, nearest redo first.
    pub future: Vec<Option<T>>,

    pub options: UndoOptions,
}

impl<T> State<T> {
    /// Fresh state with no history.
    pub fn new(initial: Option<T>, options: UndoOptions) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            options,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("past", &self.past)
            .field("present", &self.present)
            .field("future", &self.future)
            .field("options", &self.options)
            .finish()
    }
}

/// A requested history transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Action<T> {
    /// Step back one entry.
    Undo,

    /// Step forward one entry.
    Redo,

    /// Write a new present value, discarding the redo branch.
    Set {
        #[serde(rename = "newPresent")]
        new_present: T,
        /// Checkpoint tag for the write. Carried through to events only.
        #[serde(rename = "historyCheckpoint", default)]
        checkpoint: bool,
    },

    /// Clear all history and start again from a new present value.
    Reset {
        #[serde(rename = "newPresent")]
        new_present: T,
    },
}

impl<T> Action<T> {
    pub fn set(new_present: T) -> Self {
        Action::Set {
            new_present,
            checkpoint: false,
        }
    }

    pub fn reset(new_present: T) -> Self {
        Action::Reset { new_present }
    }

    /// The payload-free tag of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Undo => ActionKind::Undo,
            Action::Redo => ActionKind::Redo,
            Action::Set { .. } => ActionKind::Set,
            Action::Reset { .. } => ActionKind::Reset,
        }
    }

    /// Whether this action was tagged as a checkpoint write.
    pub fn is_checkpoint(&self) -> bool {
        matches!(self, Action::Set { checkpoint: true, .. })
    }
}

impl<T: DeserializeOwned> Action<T> {
    /// Parse an action supplied by a host, e.g. `{"type": "SET", "newPresent": 3}`.
    ///
    /// Unknown action types are rejected here and never reach the reducer.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HistoryError::InvalidAction(e.to_string()))
    }
}

/// Action tag without payload, used in events and filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Undo,
    Redo,
    Set,
    Reset,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Undo => "undo",
            ActionKind::Redo => "redo",
            ActionKind::Set => "set",
            ActionKind::Reset => "reset",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = UndoOptions::default();
        assert_eq!(options.max_history, None);
        assert_eq!(options.debounce_time, Duration::ZERO);
        assert!(!options.use_checkpoints);
    }

    #[test]
    fn test_options_from_json() {
        let options = UndoOptions::from_json(r#"{"maxHistory": 5, "debounceTime": 250}"#).unwrap();
        assert_eq!(options.max_history, Some(5));
        assert_eq!(options.debounce_time, Duration::from_millis(250));

        // Missing fields fall back to defaults
        let options = UndoOptions::from_json("{}").unwrap();
        assert_eq!(options, UndoOptions::default());
    }

    #[test]
    fn test_options_reject_negative_cap() {
        let result = UndoOptions::from_json(r#"{"maxHistory": -1}"#);
        assert!(matches!(result, Err(HistoryError::InvalidOptions(_))));
    }

    #[test]
    fn test_action_json() {
        let action: Action<i32> =
            Action::from_json(r#"{"type": "SET", "newPresent": 3, "historyCheckpoint": true}"#)
                .unwrap();
        assert_eq!(
            action,
            Action::Set {
                new_present: 3,
                checkpoint: true
            }
        );
        assert!(action.is_checkpoint());

        let action: Action<i32> = Action::from_json(r#"{"type": "UNDO"}"#).unwrap();
        assert_eq!(action.kind(), ActionKind::Undo);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = Action::<i32>::from_json(r#"{"type": "JUMP"}"#);
        assert!(matches!(result, Err(HistoryError::InvalidAction(_))));
    }

    #[test]
    fn test_state_flags() {
        let mut state = State::new(Some(1), UndoOptions::default());
        assert!(!state.can_undo());
        assert!(!state.can_redo());

        state.past.push(Some(0));
        state.future.push(Some(2));
        assert!(state.can_undo());
        assert!(state.can_redo());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = State::new(Some("a".to_string()), UndoOptions::default().with_max_history(3));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["present"], "a");
        assert_eq!(json["options"]["maxHistory"], 3);
        assert_eq!(json["options"]["debounceTime"], 0);
    }

    #[test]
    fn test_oversized_debounce_does_not_serialize() {
        let options = UndoOptions::default().with_debounce(Duration::MAX);
        assert!(serde_json::to_string(&options).is_err());

        let options = UndoOptions::default().with_debounce(Duration::from_millis(u64::MAX));
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(UndoOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn test_state_debug_shows_options() {
        let options = UndoOptions::default()
            .with_debounce(Duration::from_millis(250))
            .with_max_history(4);
        let debug = format!("{:?}", State::new(Some(1), options));

        assert!(debug.contains("max_history: Some(4)"));
        assert!(debug.contains("debounce_time: 250ms"));
        assert!(debug.contains("use_checkpoints: false"));
    }
}
