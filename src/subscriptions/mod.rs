//! Subscription system for live history updates.
//!
//! Every state replacement made by a controller is broadcast to its
//! subscribers, the way a reactive store notifies its observers. No-op
//! actions (nothing changed) broadcast nothing.
//!
//! Subscriptions support:
//! - Filtering by action kind
//! - Receiving the current snapshot on subscribe
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = controller.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::navigation(),
//!     ..Default::default()
//! });
//!
//! loop {
//!     match handle.recv() {
//!         Ok(HistoryEvent::Changed { kind, state, .. }) => render(kind, &state),
//!         Ok(HistoryEvent::Dropped { .. }) | Err(_) => break,
//!         Ok(_) => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, HistoryEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
