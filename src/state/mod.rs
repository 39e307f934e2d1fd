//! History transitions.
//!
//! The reducer maps a state snapshot and an action to the next snapshot
//! without side effects. Past, present and future together act as a cursor
//! into one linear history; writes truncate everything after the cursor.

mod reducer;

pub use reducer::reduce;
