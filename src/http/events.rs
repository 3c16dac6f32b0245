//! Server-Sent Events (SSE) HTTP handlers.
//!
//! Push channel for the transition events of the queue coordinator, consumed
//! by operator panels and display boards instead of polling.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};

use crate::queue::QueueEvent;

use super::types::AppState;

/// SSE stream for all queue transition events.
pub async fn sse_events(
    State(qc): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = qc.subscribe_events();
    let stream = tokio_stream::wrappers::BroadcastStream::new(rx).filter_map(
        |result: Result<QueueEvent, _>| async move {
            result.ok().map(|event| {
                Ok(Event::default()
                    .event("transition")
                    .json_data(&event)
                    .unwrap_or_default())
            })
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// SSE stream filtered to a single service point (per-desk display board).
pub async fn sse_service_point_events(
    State(qc): State<AppState>,
    Path(service_point): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = qc.subscribe_events();
    let stream = tokio_stream::wrappers::BroadcastStream::new(rx).filter_map(
        move |result: Result<QueueEvent, _>| {
            let service_point = service_point.clone();
            async move {
                result.ok().and_then(|event| {
                    if event.service_point.as_deref() == Some(service_point.as_str()) {
                        Some(Ok(Event::default()
                            .event("transition")
                            .json_data(&event)
                            .unwrap_or_default()))
                    } else {
                        None
                    }
                })
            }
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}
