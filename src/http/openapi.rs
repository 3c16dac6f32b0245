//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::queue::{AppointmentType, CheckInInput, EntryStatus, QueueEntry, QueueEvent, QueueStats};

use super::types::{CallNextRequest, CallRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "attendq API",
        description = "Patient queue and calling engine: check-in, prioritized calling, \
                       lifecycle transitions, live statistics, and a push channel for \
                       display boards and operator panels."
    ),
    paths(
        super::entries::check_in,
        super::entries::call_next,
        super::entries::call_specific,
        super::entries::recall,
        super::entries::mark_attending,
        super::entries::mark_completed,
        super::entries::mark_no_show,
        super::views::list_waiting,
        super::views::list_active,
        super::views::get_stats,
        super::views::get_entry,
        super::views::health_check,
    ),
    components(schemas(
        QueueEntry,
        EntryStatus,
        AppointmentType,
        CheckInInput,
        CallNextRequest,
        CallRequest,
        QueueStats,
        QueueEvent,
    )),
    tags(
        (name = "Queue", description = "Patient queue operations"),
        (name = "System", description = "Service health")
    )
)]
pub struct ApiDoc;
