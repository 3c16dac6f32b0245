//! Core queue entry types.
//!
//! A QueueEntry is one patient's position in today's queue. Appointment
//! context (doctor, speciality, scheduled time) is copied in at check-in and
//! never re-fetched; the appointment subsystem owns the live data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique queue entry identifier.
pub type EntryId = Uuid;

/// How the patient entered the queue. Drives prioritization and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    ScheduledAppointment,
    WalkIn,
    Administrative,
}

/// Lifecycle state of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Checked in, waiting to be called.
    Waiting,
    /// Announced to a service point, operator has not confirmed arrival.
    Called,
    /// Patient arrived and is being attended.
    Attending,
    /// Attention finished. Terminal.
    Completed,
    /// Patient did not show up after being called. Terminal.
    NoShow,
}

impl EntryStatus {
    /// Check if this is a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::NoShow)
    }

    /// Check if the patient is announced or being attended ("now serving").
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Called | Self::Attending)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Called => write!(f, "called"),
            Self::Attending => write!(f, "attending"),
            Self::Completed => write!(f, "completed"),
            Self::NoShow => write!(f, "no_show"),
        }
    }
}

/// One patient's position in today's queue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueueEntry {
    #[schema(value_type = Uuid)]
    pub id: EntryId,
    /// Human-facing number, unique and monotonic within an operating day.
    pub display_number: u32,
    pub patient_name: String,
    pub patient_document: Option<String>,
    /// Guest entries represent patients without a full record yet.
    pub is_guest: bool,
    pub appointment_type: AppointmentType,
    /// External appointment reference; guards against double check-in.
    pub appointment_ref: Option<String>,
    pub doctor_name: Option<String>,
    pub speciality: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub status: EntryStatus,
    /// Desk or room currently handling the entry. Set on CALLED, cleared on
    /// terminal states.
    pub service_point: Option<String>,
    pub checked_in_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub attending_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Bumped on every announcement, including recalls.
    pub last_announced_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    /// Time spent waiting since check-in.
    #[must_use]
    pub fn waited(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.checked_in_at
    }

    /// Check if a scheduled appointment's time has arrived.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        matches!(self.appointment_type, AppointmentType::ScheduledAppointment)
            && self.scheduled_time.is_some_and(|t| t <= now)
    }
}

/// Check-in request: everything the appointment subsystem supplies when a
/// patient arrives.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckInInput {
    pub patient_name: String,
    #[serde(default)]
    pub patient_document: Option<String>,
    #[serde(default)]
    pub is_guest: bool,
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub appointment_ref: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}
