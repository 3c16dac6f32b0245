//! HTTP API module.
//!
//! REST endpoints for the queue coordinator plus the push channel (SSE and
//! WebSocket) that keeps operator panels and display boards current without
//! polling.

mod entries;
mod events;
mod openapi;
mod types;
mod views;
mod websocket;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::AppState;

/// Create CORS layer based on environment configuration.
/// Set CORS_ALLOW_ORIGIN for production (comma-separated list of origins);
/// unset allows all origins (development mode).
fn create_cors_layer() -> CorsLayer {
    let allowed_origins = std::env::var("CORS_ALLOW_ORIGIN").ok();

    match allowed_origins {
        Some(origins) if !origins.is_empty() && origins != "*" => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        }
        _ => CorsLayer::permissive(),
    }
}

/// Create the HTTP router with all API routes.
pub fn create_router(state: AppState) -> Router {
    let cors = create_cors_layer();

    let api_routes = Router::new()
        // Queue lifecycle
        .route("/queue/check-in", post(entries::check_in))
        .route("/queue/call-next", post(entries::call_next))
        .route("/queue/{id}/call", post(entries::call_specific))
        .route("/queue/{id}/recall", post(entries::recall))
        .route("/queue/{id}/attending", post(entries::mark_attending))
        .route("/queue/{id}/complete", post(entries::mark_completed))
        .route("/queue/{id}/no-show", post(entries::mark_no_show))
        // Read-only views
        .route("/queue/waiting", get(views::list_waiting))
        .route("/queue/active", get(views::list_active))
        .route("/queue/stats", get(views::get_stats))
        .route("/queue/{id}", get(views::get_entry))
        // Push channel
        .route("/events", get(events::sse_events))
        .route("/events/{service_point}", get(events::sse_service_point_events))
        .route("/ws", get(websocket::ws_handler))
        // Health
        .route("/health", get(views::health_check))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .layer(cors)
}

#[cfg(test)]
mod tests;
