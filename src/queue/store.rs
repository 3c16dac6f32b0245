//! Day-scoped entry store with compare-and-swap transitions.
//!
//! Single source of truth for queue entries. Every mutation goes through
//! `transition`, a compare-and-swap on `(id, expected_status)`: the DashMap
//! shard lock serializes concurrent transitions on the same entry, so at most
//! one of two racing operators wins and the loser gets `StaleState`.
//!
//! Service point exclusivity and the duplicate check-in guard use the same
//! discipline via atomic claim maps, not a separate lock manager.

use chrono::{NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::error::{QueueError, Result};
use super::types::{EntryId, EntryStatus, QueueEntry};

/// Display number allocation state, reset on operating-day rollover.
struct DayCounter {
    date: NaiveDate,
    next: u32,
}

pub(crate) struct EntryStore {
    entries: DashMap<EntryId, QueueEntry>,
    /// service point -> entry currently bound to it. The holder may still be
    /// WAITING while its call transition is in flight.
    bindings: DashMap<String, EntryId>,
    /// appointment reference -> open (non-terminal) entry for it
    open_refs: DashMap<String, EntryId>,
    counter: Mutex<DayCounter>,
}

impl EntryStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
            bindings: DashMap::new(),
            open_refs: DashMap::new(),
            counter: Mutex::new(DayCounter {
                date: Utc::now().date_naive(),
                next: 0,
            }),
        }
    }

    /// Allocate the next display number for the given operating day.
    /// Monotonic within a day, never reused; resets on rollover.
    pub(crate) fn next_display_number(&self, today: NaiveDate) -> u32 {
        let mut counter = self.counter.lock();
        if counter.date != today {
            counter.date = today;
            counter.next = 0;
        }
        counter.next += 1;
        counter.next
    }

    pub(crate) fn insert(&self, entry: QueueEntry) {
        self.entries.insert(entry.id, entry);
    }

    pub(crate) fn get(&self, id: EntryId) -> Option<QueueEntry> {
        self.entries.get(&id).map(|e| e.clone())
    }

    /// Snapshot of all entries checked in on the given operating day.
    pub(crate) fn snapshot_day(&self, today: NaiveDate) -> Vec<QueueEntry> {
        self.entries
            .iter()
            .filter(|e| e.checked_in_at.date_naive() == today)
            .map(|e| e.clone())
            .collect()
    }

    /// Compare-and-swap transition: applies `apply` only if the entry's
    /// current status matches `expected`, otherwise fails with `StaleState`.
    /// The entry's shard lock is held for the duration, serializing
    /// concurrent transitions on the same entry.
    pub(crate) fn transition<F>(&self, id: EntryId, expected: EntryStatus, apply: F) -> Result<QueueEntry>
    where
        F: FnOnce(&mut QueueEntry),
    {
        let Some(mut entry) = self.entries.get_mut(&id) else {
            return Err(QueueError::NotFound(id));
        };
        if entry.status != expected {
            return Err(QueueError::StaleState {
                id,
                expected,
                actual: entry.status,
            });
        }
        apply(&mut entry);
        Ok(entry.clone())
    }

    /// Atomically claim a service point for an entry. Fails with
    /// `ServicePointBusy` if another non-terminal entry holds it. The holder
    /// may still be WAITING, claimed by a call whose transition has not landed
    /// yet; only a binding left behind by a terminal entry is stale and gets
    /// replaced.
    pub(crate) fn claim_service_point(&self, service_point: &str, id: EntryId) -> Result<()> {
        match self.bindings.entry(service_point.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let holder = *slot.get();
                let holder_live = self
                    .entries
                    .get(&holder)
                    .is_some_and(|e| !e.status.is_terminal());
                if holder_live {
                    Err(QueueError::ServicePointBusy(service_point.to_string()))
                } else {
                    slot.insert(id);
                    Ok(())
                }
            }
        }
    }

    /// Release a service point binding, but only if `id` still holds it.
    pub(crate) fn release_service_point(&self, service_point: &str, id: EntryId) {
        self.bindings
            .remove_if(service_point, |_, holder| *holder == id);
    }

    /// Check whether a service point is free without claiming it. Advisory
    /// only; `claim_service_point` remains the authoritative guard.
    pub(crate) fn service_point_free(&self, service_point: &str) -> bool {
        match self.bindings.get(service_point) {
            None => true,
            Some(holder) => !self
                .entries
                .get(&holder)
                .is_some_and(|e| !e.status.is_terminal()),
        }
    }

    /// Atomically claim an appointment reference for an entry, the duplicate
    /// check-in guard. A reference held by a terminal or prior-day entry is
    /// stale and gets replaced. Entries are never deleted, so a holder absent
    /// from the entry map is a check-in still in flight and counts as open.
    pub(crate) fn claim_appointment_ref(
        &self,
        appointment_ref: &str,
        id: EntryId,
        today: NaiveDate,
    ) -> Result<()> {
        match self.open_refs.entry(appointment_ref.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let holder = *slot.get();
                let holder_open = self.entries.get(&holder).is_none_or(|e| {
                    !e.status.is_terminal() && e.checked_in_at.date_naive() == today
                });
                if holder_open {
                    Err(QueueError::DuplicateCheckIn(appointment_ref.to_string()))
                } else {
                    slot.insert(id);
                    Ok(())
                }
            }
        }
    }

    /// Release an appointment reference, but only if `id` still holds it.
    pub(crate) fn release_appointment_ref(&self, appointment_ref: &str, id: EntryId) {
        self.open_refs
            .remove_if(appointment_ref, |_, holder| *holder == id);
    }
}
