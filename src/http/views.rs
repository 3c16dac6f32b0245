//! Read-only queue HTTP handlers: listings, statistics, health.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::queue::{QueueEntry, QueueStats};

use super::types::{queue_error_response, ApiResponse, AppState};

/// List today's waiting entries in call order.
#[utoipa::path(
    get,
    path = "/queue/waiting",
    tag = "Queue",
    responses(
        (status = 200, description = "Waiting entries, prioritization order", body = [QueueEntry])
    )
)]
pub async fn list_waiting(State(qc): State<AppState>) -> Json<ApiResponse<Vec<QueueEntry>>> {
    ApiResponse::success(qc.list_waiting().await)
}

/// List today's called and attending entries ("now serving").
#[utoipa::path(
    get,
    path = "/queue/active",
    tag = "Queue",
    responses(
        (status = 200, description = "Called and attending entries", body = [QueueEntry])
    )
)]
pub async fn list_active(State(qc): State<AppState>) -> Json<ApiResponse<Vec<QueueEntry>>> {
    ApiResponse::success(qc.list_active().await)
}

/// Get live queue statistics for the operating day.
#[utoipa::path(
    get,
    path = "/queue/stats",
    tag = "Queue",
    responses(
        (status = 200, description = "Counts per status and average wait", body = QueueStats)
    )
)]
pub async fn get_stats(State(qc): State<AppState>) -> Json<ApiResponse<QueueStats>> {
    ApiResponse::success(qc.stats().await)
}

/// Fetch a single entry. Operator UIs refetch here after a conflict.
#[utoipa::path(
    get,
    path = "/queue/{id}",
    tag = "Queue",
    params(("id" = Uuid, Path, description = "Queue entry id")),
    responses(
        (status = 200, description = "Current entry state", body = QueueEntry),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn get_entry(State(qc): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match qc.lookup(id).await {
        Ok(entry) => ApiResponse::success(entry).into_response(),
        Err(e) => queue_error_response(e),
    }
}

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
