//! HTTP API request and response types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::queue::{QueueCoordinator, QueueError};

/// Shared application state.
pub type AppState = Arc<QueueCoordinator>;

/// Call-next request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CallNextRequest {
    pub service_point: String,
    /// Restrict selection to entries for this doctor (doctor-scoped desks).
    #[serde(default)]
    pub doctor: Option<String>,
}

/// Call-specific request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CallRequest {
    pub service_point: String,
}

/// Generic API response wrapper.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            ok: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(msg: impl Into<String>) -> Json<Self> {
        Json(Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        })
    }
}

/// Map a queue error onto a wire response. Domain guard violations surface
/// as 4xx so the operator UI can distinguish them from infrastructure 5xx.
pub fn queue_error_response(err: QueueError) -> Response {
    let status = match err {
        QueueError::NotFound(_) => StatusCode::NOT_FOUND,
        QueueError::StaleState { .. }
        | QueueError::ServicePointBusy(_)
        | QueueError::DuplicateCheckIn(_) => StatusCode::CONFLICT,
        QueueError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        QueueError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, ApiResponse::<()>::error(err.to_string())).into_response()
}
