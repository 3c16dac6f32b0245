//! The QueueCoordinator: operator-facing orchestration surface.
//!
//! All mutation funnels through here. Call paths combine candidate selection
//! and the WAITING->CALLED transition into per-candidate compare-and-swap
//! attempts, so two desks calling simultaneously can never claim the same
//! patient; the retry loop is bounded by the size of the waiting set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::info;

use crate::config::EngineConfig;

use super::error::{QueueError, Result};
use super::events::QueueEvent;
use super::policy;
use super::store::EntryStore;
use super::types::{CheckInInput, EntryId, EntryStatus, QueueEntry};

/// Broadcast channel capacity for transition events.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub struct QueueCoordinator {
    pub(crate) store: EntryStore,
    pub(crate) config: EngineConfig,
    pub(crate) event_tx: broadcast::Sender<QueueEvent>,
    shutdown_flag: AtomicBool,
}

impl QueueCoordinator {
    /// Create a coordinator and start its background tasks (the auto no-show
    /// sweep runs only when a called-timeout is configured).
    pub fn new(config: EngineConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let coordinator = Arc::new(Self {
            store: EntryStore::new(),
            config,
            event_tx,
            shutdown_flag: AtomicBool::new(false),
        });

        if coordinator.config.called_timeout.is_some() {
            let qc = Arc::clone(&coordinator);
            tokio::spawn(async move {
                qc.background_tasks().await;
            });
        }

        coordinator
    }

    pub fn shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Relaxed)
    }

    /// Check in a patient: allocates the next display number for the day and
    /// creates the entry in WAITING. Fails with `DuplicateCheckIn` if the
    /// appointment reference already has a non-terminal entry today.
    pub async fn check_in(&self, input: CheckInInput) -> Result<QueueEntry> {
        if input.patient_name.trim().is_empty() {
            return Err(QueueError::InvalidInput("patient_name is empty".into()));
        }

        let now = Utc::now();
        let today = now.date_naive();
        let id = EntryId::new_v4();

        // Claim the appointment reference before inserting, so two racing
        // check-ins for the same appointment cannot both pass the guard.
        if let Some(ref appointment_ref) = input.appointment_ref {
            self.store.claim_appointment_ref(appointment_ref, id, today)?;
        }

        let display_number = self.store.next_display_number(today);
        let entry = QueueEntry {
            id,
            display_number,
            patient_name: input.patient_name,
            patient_document: input.patient_document,
            is_guest: input.is_guest,
            appointment_type: input.appointment_type,
            appointment_ref: input.appointment_ref,
            doctor_name: input.doctor_name,
            speciality: input.speciality,
            scheduled_time: input.scheduled_time,
            status: EntryStatus::Waiting,
            service_point: None,
            checked_in_at: now,
            called_at: None,
            attending_at: None,
            resolved_at: None,
            last_announced_at: None,
        };
        self.store.insert(entry.clone());

        info!(
            entry_id = %entry.id,
            display_number = entry.display_number,
            patient = %entry.patient_name,
            "Patient checked in"
        );
        self.publish_transition(&entry, None, None);
        Ok(entry)
    }

    /// Call the next eligible entry to a service point. Returns `Ok(None)`
    /// when no eligible entry exists (a legitimate empty-queue result, not an
    /// error).
    ///
    /// Selection and the WAITING->CALLED transition are combined into one
    /// compare-and-swap per candidate: if the best candidate was claimed
    /// concurrently by another desk, the next-best is tried, bounded by the
    /// size of the waiting set.
    pub async fn call_next(
        &self,
        service_point: &str,
        doctor_filter: Option<&str>,
    ) -> Result<Option<QueueEntry>> {
        if service_point.trim().is_empty() {
            return Err(QueueError::InvalidInput("service_point is empty".into()));
        }
        if !self.store.service_point_free(service_point) {
            return Err(QueueError::ServicePointBusy(service_point.to_string()));
        }

        let now = Utc::now();
        let mut candidates: Vec<QueueEntry> = self
            .store
            .snapshot_day(now.date_naive())
            .into_iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .filter(|e| {
                doctor_filter.is_none_or(|doctor| e.doctor_name.as_deref() == Some(doctor))
            })
            .collect();
        policy::rank_waiting(&mut candidates, now, self.config.starvation_threshold);

        for candidate in candidates {
            match self.try_call(candidate.id, service_point).await {
                Ok(entry) => return Ok(Some(entry)),
                // Lost the race for this candidate or it vanished; try the next.
                Err(QueueError::StaleState { .. }) | Err(QueueError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Operator override of priority order: call a specific WAITING entry.
    pub async fn call_specific(&self, id: EntryId, service_point: &str) -> Result<QueueEntry> {
        if service_point.trim().is_empty() {
            return Err(QueueError::InvalidInput("service_point is empty".into()));
        }
        // Surface NotFound before the binding claim touches anything.
        let _ = self.store.get(id).ok_or(QueueError::NotFound(id))?;
        self.try_call(id, service_point).await
    }

    /// Claim the service point, then CAS the entry WAITING->CALLED. The
    /// binding is rolled back if the transition loses.
    async fn try_call(&self, id: EntryId, service_point: &str) -> Result<QueueEntry> {
        self.store.claim_service_point(service_point, id)?;

        let now = Utc::now();
        let result = self.store.transition(id, EntryStatus::Waiting, |e| {
            e.status = EntryStatus::Called;
            e.service_point = Some(service_point.to_string());
            e.called_at = Some(now);
            e.last_announced_at = Some(now);
        });

        match result {
            Ok(entry) => {
                info!(
                    entry_id = %entry.id,
                    display_number = entry.display_number,
                    service_point = %service_point,
                    "Patient called"
                );
                self.publish_transition(
                    &entry,
                    Some(EntryStatus::Waiting),
                    Some(service_point.to_string()),
                );
                Ok(entry)
            }
            Err(e) => {
                self.store.release_service_point(service_point, id);
                Err(e)
            }
        }
    }

    /// Re-announce a CALLED entry. No state change; bumps the announcement
    /// timestamp and republishes, so it is safely repeatable.
    pub async fn recall(&self, id: EntryId) -> Result<QueueEntry> {
        let now = Utc::now();
        let entry = self.store.transition(id, EntryStatus::Called, |e| {
            e.last_announced_at = Some(now);
        })?;

        info!(
            entry_id = %entry.id,
            display_number = entry.display_number,
            service_point = entry.service_point.as_deref().unwrap_or(""),
            "Patient recalled"
        );
        self.publish_transition(&entry, Some(EntryStatus::Called), entry.service_point.clone());
        Ok(entry)
    }

    /// CALLED -> ATTENDING: the patient arrived at the service point.
    pub async fn mark_attending(&self, id: EntryId) -> Result<QueueEntry> {
        let now = Utc::now();
        let entry = self.store.transition(id, EntryStatus::Called, |e| {
            e.status = EntryStatus::Attending;
            e.attending_at = Some(now);
        })?;

        info!(entry_id = %entry.id, display_number = entry.display_number, "Patient attending");
        self.publish_transition(&entry, Some(EntryStatus::Called), entry.service_point.clone());
        Ok(entry)
    }

    /// ATTENDING -> COMPLETED. Terminal; releases the service point.
    pub async fn mark_completed(&self, id: EntryId) -> Result<QueueEntry> {
        let now = Utc::now();
        let mut freed_point = None;
        let entry = self.store.transition(id, EntryStatus::Attending, |e| {
            e.status = EntryStatus::Completed;
            e.resolved_at = Some(now);
            freed_point = e.service_point.take();
        })?;

        self.release_entry_claims(&entry, freed_point.as_deref());
        info!(entry_id = %entry.id, display_number = entry.display_number, "Attention completed");
        self.publish_transition(&entry, Some(EntryStatus::Attending), freed_point);
        Ok(entry)
    }

    /// CALLED -> NO_SHOW. Terminal; releases the service point.
    pub async fn mark_no_show(&self, id: EntryId) -> Result<QueueEntry> {
        let now = Utc::now();
        let mut freed_point = None;
        let entry = self.store.transition(id, EntryStatus::Called, |e| {
            e.status = EntryStatus::NoShow;
            e.resolved_at = Some(now);
            freed_point = e.service_point.take();
        })?;

        self.release_entry_claims(&entry, freed_point.as_deref());
        info!(entry_id = %entry.id, display_number = entry.display_number, "Marked as no-show");
        self.publish_transition(&entry, Some(EntryStatus::Called), freed_point);
        Ok(entry)
    }

    /// Release bindings held by a now-terminal entry. Must run after the
    /// transition guard is dropped.
    fn release_entry_claims(&self, entry: &QueueEntry, freed_point: Option<&str>) {
        if let Some(point) = freed_point {
            self.store.release_service_point(point, entry.id);
        }
        if let Some(ref appointment_ref) = entry.appointment_ref {
            self.store.release_appointment_ref(appointment_ref, entry.id);
        }
    }

    /// Fetch a single entry. Operator UIs use this to refetch after a
    /// stale-state conflict.
    pub async fn lookup(&self, id: EntryId) -> Result<QueueEntry> {
        self.store.get(id).ok_or(QueueError::NotFound(id))
    }

    /// Today's WAITING entries in call order.
    pub async fn list_waiting(&self) -> Vec<QueueEntry> {
        let now = Utc::now();
        let mut waiting: Vec<QueueEntry> = self
            .store
            .snapshot_day(now.date_naive())
            .into_iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .collect();
        policy::rank_waiting(&mut waiting, now, self.config.starvation_threshold);
        waiting
    }

    /// Today's CALLED and ATTENDING entries, most recently called first.
    pub async fn list_active(&self) -> Vec<QueueEntry> {
        let mut active: Vec<QueueEntry> = self
            .store
            .snapshot_day(Utc::now().date_naive())
            .into_iter()
            .filter(|e| e.status.is_active())
            .collect();
        active.sort_by(|a, b| b.called_at.cmp(&a.called_at));
        active
    }

    /// Today's entries regardless of status. Used by the statistics
    /// aggregator and the background sweep.
    pub(crate) fn snapshot_today(&self) -> Vec<QueueEntry> {
        self.store.snapshot_day(Utc::now().date_naive())
    }
}
