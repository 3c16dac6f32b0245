//! WebSocket HTTP handlers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use tokio::sync::broadcast;
use tokio::time::interval;

use super::types::AppState;

/// Maximum concurrent WebSocket connections.
const MAX_WS_CONNECTIONS: usize = 100;

/// Global WebSocket connection counter.
static WS_CONNECTION_COUNT: AtomicUsize = AtomicUsize::new(0);

/// WebSocket handler for queue transition events.
pub async fn ws_handler(State(qc): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    if WS_CONNECTION_COUNT.load(Ordering::Relaxed) >= MAX_WS_CONNECTIONS {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Too many WebSocket connections",
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| handle_websocket(socket, qc))
}

async fn handle_websocket(mut socket: WebSocket, qc: AppState) {
    WS_CONNECTION_COUNT.fetch_add(1, Ordering::Relaxed);

    let mut rx = qc.subscribe_events();
    let mut ping_interval = interval(Duration::from_secs(30));

    loop {
        tokio::select! {
            // Server heartbeat - ping every 30s
            _ = ping_interval.tick() => {
                if socket.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            // Forward transition events to the client
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if socket.send(Message::Text(json.into())).await.is_err() {
                                break; // Client disconnected
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        // Slow client, skip silently
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }

            // Handle incoming messages (close, pings)
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    WS_CONNECTION_COUNT.fetch_sub(1, Ordering::Relaxed);
}
