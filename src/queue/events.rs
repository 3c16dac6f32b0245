//! Transition events and broadcast fan-out.
//!
//! Every successful transition is published on a broadcast channel so
//! operator panels and display boards update without polling. Slow or absent
//! subscribers never block the coordinator; the channel drops the oldest
//! events for lagging receivers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use super::coordinator::QueueCoordinator;
use super::types::{EntryId, EntryStatus, QueueEntry};

/// A queue state change, as seen by observers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueueEvent {
    #[schema(value_type = Uuid)]
    pub entry_id: EntryId,
    pub display_number: u32,
    /// None for check-in (entry creation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_status: Option<EntryStatus>,
    pub new_status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_point: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl QueueCoordinator {
    /// Subscribe to queue transition events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<QueueEvent> {
        self.event_tx.subscribe()
    }

    /// Publish a transition event. Only allocates when there are listeners.
    pub(crate) fn publish_transition(
        &self,
        entry: &QueueEntry,
        old_status: Option<EntryStatus>,
        service_point: Option<String>,
    ) {
        if self.event_tx.receiver_count() == 0 {
            return;
        }
        let _ = self.event_tx.send(QueueEvent {
            entry_id: entry.id,
            display_number: entry.display_number,
            old_status,
            new_status: entry.status,
            service_point,
            timestamp: Utc::now(),
        });
    }
}
