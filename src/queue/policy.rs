//! Prioritization policy for "call next".
//!
//! Pure and deterministic: given a set of WAITING entries and a clock value,
//! the ordering is fully decided by the entries themselves, so the policy is
//! testable against literal entry sets.
//!
//! Ordering, most significant first:
//! 1. Walk-in/administrative entries past the starvation threshold, oldest
//!    first (starvation promotion).
//! 2. Scheduled appointments whose time has arrived, by scheduled time.
//! 3. Everything else FIFO by check-in time.
//! Ties broken by lower display number.

use chrono::{DateTime, Duration, Utc};

use super::types::{AppointmentType, QueueEntry};

/// Priority class, lower is served first.
fn class(entry: &QueueEntry, now: DateTime<Utc>, starvation_threshold: Duration) -> u8 {
    match entry.appointment_type {
        AppointmentType::WalkIn | AppointmentType::Administrative
            if entry.waited(now) >= starvation_threshold =>
        {
            0
        }
        AppointmentType::ScheduledAppointment if entry.is_due(now) => 1,
        _ => 2,
    }
}

/// Total ordering key for a waiting entry.
fn sort_key(
    entry: &QueueEntry,
    now: DateTime<Utc>,
    starvation_threshold: Duration,
) -> (u8, DateTime<Utc>, u32) {
    let class = class(entry, now, starvation_threshold);
    let primary = if class == 1 {
        // Due scheduled entries are served in scheduled-time order.
        entry.scheduled_time.unwrap_or(entry.checked_in_at)
    } else {
        entry.checked_in_at
    };
    (class, primary, entry.display_number)
}

/// Sort waiting entries into call order.
pub fn rank_waiting(
    waiting: &mut [QueueEntry],
    now: DateTime<Utc>,
    starvation_threshold: Duration,
) {
    waiting.sort_by_key(|e| sort_key(e, now, starvation_threshold));
}

/// Pick the single next entry to call, or None if the set is empty.
#[must_use]
pub fn select_next<'a>(
    waiting: &'a [QueueEntry],
    now: DateTime<Utc>,
    starvation_threshold: Duration,
) -> Option<&'a QueueEntry> {
    waiting
        .iter()
        .min_by_key(|e| sort_key(e, now, starvation_threshold))
}
