//! Statistics aggregation.
//!
//! Recomputed in O(entries-for-day) on each call; a day's queue is tens to
//! low hundreds of entries, so no incremental maintenance is needed.

use serde::Serialize;
use utoipa::ToSchema;

use super::coordinator::QueueCoordinator;
use super::types::{EntryStatus, QueueEntry};

/// Live queue counters and average wait time for the operating day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueueStats {
    pub waiting: usize,
    pub called: usize,
    pub attending: usize,
    pub completed: usize,
    pub no_show: usize,
    /// Average of `called_at - checked_in_at` over entries that have left
    /// WAITING; entries still waiting are counted above but excluded here.
    pub average_wait_minutes: f64,
}

/// Derive statistics from a day's entries. Pure, so the aggregation is
/// testable against literal entry sets.
#[must_use]
pub fn compute_stats(entries: &[QueueEntry]) -> QueueStats {
    let mut stats = QueueStats {
        waiting: 0,
        called: 0,
        attending: 0,
        completed: 0,
        no_show: 0,
        average_wait_minutes: 0.0,
    };

    let mut waited_total_secs = 0i64;
    let mut waited_count = 0u32;

    for entry in entries {
        match entry.status {
            EntryStatus::Waiting => stats.waiting += 1,
            EntryStatus::Called => stats.called += 1,
            EntryStatus::Attending => stats.attending += 1,
            EntryStatus::Completed => stats.completed += 1,
            EntryStatus::NoShow => stats.no_show += 1,
        }
        if let Some(called_at) = entry.called_at {
            waited_total_secs += (called_at - entry.checked_in_at).num_seconds();
            waited_count += 1;
        }
    }

    if waited_count > 0 {
        stats.average_wait_minutes = waited_total_secs as f64 / 60.0 / f64::from(waited_count);
    }
    stats
}

impl QueueCoordinator {
    /// Get live statistics for the operating day.
    pub async fn stats(&self) -> QueueStats {
        compute_stats(&self.snapshot_today())
    }
}
