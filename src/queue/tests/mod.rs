//! Queue engine tests.

mod concurrent;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::EngineConfig;

use super::*;

fn setup() -> Arc<QueueCoordinator> {
    QueueCoordinator::new(EngineConfig::default())
}

fn setup_with(config: EngineConfig) -> Arc<QueueCoordinator> {
    QueueCoordinator::new(config)
}

fn walk_in(name: &str) -> CheckInInput {
    CheckInInput {
        patient_name: name.to_string(),
        patient_document: None,
        is_guest: false,
        appointment_type: AppointmentType::WalkIn,
        appointment_ref: None,
        doctor_name: None,
        speciality: None,
        scheduled_time: None,
    }
}

fn scheduled(name: &str, at: DateTime<Utc>) -> CheckInInput {
    CheckInInput {
        patient_name: name.to_string(),
        patient_document: None,
        is_guest: false,
        appointment_type: AppointmentType::ScheduledAppointment,
        appointment_ref: None,
        doctor_name: None,
        speciality: None,
        scheduled_time: Some(at),
    }
}

/// Literal waiting entry for policy and statistics tests.
fn waiting_entry(
    display_number: u32,
    appointment_type: AppointmentType,
    checked_in_at: DateTime<Utc>,
) -> QueueEntry {
    QueueEntry {
        id: Uuid::new_v4(),
        display_number,
        patient_name: format!("patient-{display_number}"),
        patient_document: None,
        is_guest: false,
        appointment_type,
        appointment_ref: None,
        doctor_name: None,
        speciality: None,
        scheduled_time: None,
        status: EntryStatus::Waiting,
        service_point: None,
        checked_in_at,
        called_at: None,
        attending_at: None,
        resolved_at: None,
        last_announced_at: None,
    }
}
