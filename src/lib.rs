//! # Rewind
//!
//! Undo/redo history for a single value of any comparable type.
//!
//! ## Core Concepts
//!
//! - **State**: Immutable snapshot of past, present and future values
//! - **Reducer**: Pure transition from a state and an action to the next state
//! - **Controller**: Owns the current state, debounces rapid writes and
//!   notifies subscribers
//!
//! Writing a new value discards the redo branch; history is linear.
//!
//! ## Example
//!
//! ```ignore
//! use rewind::{HistoryController, UndoOptions};
//!
//! let history = HistoryController::with_initial(5, UndoOptions::default().with_max_history(50))?;
//!
//! history.set(100);
//! history.set(200);
//! history.undo();
//! assert_eq!(history.present(), Some(100));
//!
//! history.redo();
//! assert_eq!(history.present(), Some(200));
//! ```

pub mod controller;
pub mod debounce;
pub mod error;
pub mod state;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use controller::HistoryController;
pub use debounce::{DebounceSlot, DebounceTimer};
pub use error::{HistoryError, Result};
pub use state::reduce;
pub use subscriptions::{
    DropReason, HistoryEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
