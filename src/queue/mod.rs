//! Queue module - patient queue lifecycle, prioritization, and fan-out.
//!
//! ## Module Organization
//!
//! - `types.rs` - QueueEntry, EntryStatus, AppointmentType, CheckInInput
//! - `error.rs` - QueueError taxonomy (stale state, busy desk, duplicates)
//! - `store.rs` - Day-scoped entry store with compare-and-swap transitions
//! - `policy.rs` - Pure prioritization function for "call next"
//! - `coordinator.rs` - QueueCoordinator: the operator-facing API
//! - `stats.rs` - Live counts and average wait time
//! - `events.rs` - Transition events and broadcast fan-out
//! - `background.rs` - Optional auto no-show sweep for unanswered calls

mod background;
mod coordinator;
mod error;
mod events;
mod policy;
mod stats;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use coordinator::QueueCoordinator;
pub use error::QueueError;
pub use events::QueueEvent;
pub use policy::{rank_waiting, select_next};
pub use stats::{compute_stats, QueueStats};
pub use types::{AppointmentType, CheckInInput, EntryId, EntryStatus, QueueEntry};
