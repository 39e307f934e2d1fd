//! Trailing-edge debouncing for history writes.
//!
//! A controller owns exactly one timer. Rapid writes collapse into a single
//! dispatch of the last value once the configured quiet period passes.

mod slot;
mod timer;

pub use slot::DebounceSlot;
pub use timer::DebounceTimer;
