//! Mutating queue HTTP handlers: check-in and the calling lifecycle.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::queue::{CheckInInput, QueueEntry};

use super::types::{queue_error_response, ApiResponse, AppState, CallNextRequest, CallRequest};

/// Check in a patient.
///
/// Creates a WAITING entry with the next display number for the day.
#[utoipa::path(
    post,
    path = "/queue/check-in",
    tag = "Queue",
    request_body = CheckInInput,
    responses(
        (status = 201, description = "Entry created in WAITING", body = QueueEntry),
        (status = 409, description = "Appointment already has an open entry"),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn check_in(State(qc): State<AppState>, Json(input): Json<CheckInInput>) -> Response {
    match qc.check_in(input).await {
        Ok(entry) => (StatusCode::CREATED, ApiResponse::success(entry)).into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Call the next eligible patient to a service point.
///
/// Applies the prioritization policy; 204 means the queue is empty for this
/// service point, which is not an error.
#[utoipa::path(
    post,
    path = "/queue/call-next",
    tag = "Queue",
    request_body = CallNextRequest,
    responses(
        (status = 200, description = "Entry transitioned to CALLED", body = QueueEntry),
        (status = 204, description = "No eligible waiting entry"),
        (status = 409, description = "Service point already attending another patient")
    )
)]
pub async fn call_next(State(qc): State<AppState>, Json(req): Json<CallNextRequest>) -> Response {
    match qc.call_next(&req.service_point, req.doctor.as_deref()).await {
        Ok(Some(entry)) => ApiResponse::success(entry).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Call a specific waiting patient, overriding priority order.
#[utoipa::path(
    post,
    path = "/queue/{id}/call",
    tag = "Queue",
    params(("id" = Uuid, Path, description = "Queue entry id")),
    request_body = CallRequest,
    responses(
        (status = 200, description = "Entry transitioned to CALLED", body = QueueEntry),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry not WAITING, or service point busy")
    )
)]
pub async fn call_specific(
    State(qc): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CallRequest>,
) -> Response {
    match qc.call_specific(id, &req.service_point).await {
        Ok(entry) => ApiResponse::success(entry).into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Re-announce a called patient. Idempotent; the status stays CALLED.
#[utoipa::path(
    post,
    path = "/queue/{id}/recall",
    tag = "Queue",
    params(("id" = Uuid, Path, description = "Queue entry id")),
    responses(
        (status = 200, description = "Entry re-announced", body = QueueEntry),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry not CALLED")
    )
)]
pub async fn recall(State(qc): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match qc.recall(id).await {
        Ok(entry) => ApiResponse::success(entry).into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Mark a called patient as arrived and being attended.
#[utoipa::path(
    post,
    path = "/queue/{id}/attending",
    tag = "Queue",
    params(("id" = Uuid, Path, description = "Queue entry id")),
    responses(
        (status = 200, description = "Entry transitioned to ATTENDING", body = QueueEntry),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry not CALLED")
    )
)]
pub async fn mark_attending(State(qc): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match qc.mark_attending(id).await {
        Ok(entry) => ApiResponse::success(entry).into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Complete the attention. Terminal; frees the service point.
#[utoipa::path(
    post,
    path = "/queue/{id}/complete",
    tag = "Queue",
    params(("id" = Uuid, Path, description = "Queue entry id")),
    responses(
        (status = 200, description = "Entry transitioned to COMPLETED", body = QueueEntry),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry not ATTENDING")
    )
)]
pub async fn mark_completed(State(qc): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match qc.mark_completed(id).await {
        Ok(entry) => ApiResponse::success(entry).into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Mark a called patient who never showed up. Terminal; frees the service
/// point.
#[utoipa::path(
    post,
    path = "/queue/{id}/no-show",
    tag = "Queue",
    params(("id" = Uuid, Path, description = "Queue entry id")),
    responses(
        (status = 200, description = "Entry transitioned to NO_SHOW", body = QueueEntry),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry not CALLED")
    )
)]
pub async fn mark_no_show(State(qc): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match qc.mark_no_show(id).await {
        Ok(entry) => ApiResponse::success(entry).into_response(),
        Err(e) => queue_error_response(e),
    }
}
