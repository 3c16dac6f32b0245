//! Error types for queue operations.
//!
//! Guard violations are typed so callers can tell "your action was illegal"
//! (stale state, busy desk, duplicate) from "the system is unavailable"
//! (infrastructure). The engine never retries mutating operations itself.

use thiserror::Error;

use super::types::{EntryId, EntryStatus};

#[derive(Debug, Error)]
pub enum QueueError {
    /// Transition attempted from an unexpected status. The caller lost a race
    /// or holds an outdated view; refetch and decide whether to retry.
    #[error("queue entry {id} is {actual}, expected {expected}")]
    StaleState {
        id: EntryId,
        expected: EntryStatus,
        actual: EntryStatus,
    },

    /// Target service point is already bound to another non-terminal entry.
    #[error("service point '{0}' is already attending another patient")]
    ServicePointBusy(String),

    /// The appointment reference already has a non-terminal entry today.
    #[error("appointment '{0}' already has an open queue entry")]
    DuplicateCheckIn(String),

    /// Operation referenced a non-existent entry id.
    #[error("queue entry {0} not found")]
    NotFound(EntryId),

    /// Request rejected before any state change.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected storage or transport failure, distinct from domain guards.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;
