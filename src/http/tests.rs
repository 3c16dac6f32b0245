//! HTTP wire contract tests, run against the full router in memory.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::EngineConfig;
use crate::queue::QueueCoordinator;

use super::create_router;

fn test_router() -> Router {
    create_router(QueueCoordinator::new(EngineConfig::default()))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn check_in(router: &Router, name: &str) -> Value {
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/queue/check-in",
            json!({ "patient_name": name, "appointment_type": "walk_in" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

#[tokio::test]
async fn test_check_in_creates_waiting_entry() {
    let router = test_router();

    let body = check_in(&router, "Ana Souza").await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["status"], "waiting");
    assert_eq!(body["data"]["patient_name"], "Ana Souza");
    assert!(body["data"]["display_number"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_check_in_rejects_blank_name() {
    let router = test_router();

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/queue/check-in",
            json!({ "patient_name": "  ", "appointment_type": "walk_in" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_call_next_empty_queue_returns_no_content() {
    let router = test_router();

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/queue/call-next",
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_call_next_returns_called_entry() {
    let router = test_router();
    let created = check_in(&router, "Bruno Lima").await;

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/queue/call-next",
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["id"], created["data"]["id"]);
    assert_eq!(body["data"]["status"], "called");
    assert_eq!(body["data"]["service_point"], "Desk1");
}

#[tokio::test]
async fn test_busy_service_point_is_conflict() {
    let router = test_router();
    check_in(&router, "Carla Dias").await;
    check_in(&router, "Diego Reis").await;

    let first = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/queue/call-next",
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(json_request(
            Method::POST,
            "/queue/call-next",
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = read_json(second).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_lifecycle_transitions_over_the_wire() {
    let router = test_router();
    let created = check_in(&router, "Elisa Prado").await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/call"),
            json!({ "service_point": "Desk2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/recall"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["status"], "called");

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/attending"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["status"], "attending");

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/complete"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["status"], "completed");

    // Terminal entries reject further transitions with a conflict.
    let response = router
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/attending"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_no_show_over_the_wire() {
    let router = test_router();
    let created = check_in(&router, "Fabio Cunha").await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/call"),
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();

    let response = router
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/no-show"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["status"], "no_show");
}

#[tokio::test]
async fn test_unknown_entry_is_not_found() {
    let router = test_router();
    let id = uuid::Uuid::new_v4();

    let response = router
        .clone()
        .oneshot(get_request(&format!("/queue/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(json_request(
            Method::POST,
            &format!("/queue/{id}/call"),
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_waiting_and_active_views() {
    let router = test_router();
    check_in(&router, "Gina Matos").await;
    check_in(&router, "Hugo Paiva").await;

    let response = router
        .clone()
        .oneshot(get_request("/queue/waiting"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/queue/call-next",
            json!({ "service_point": "Desk1" }),
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(get_request("/queue/waiting"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = router.oneshot(get_request("/queue/active")).await.unwrap();
    let body = read_json(response).await;
    let active = body["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["status"], "called");
}

#[tokio::test]
async fn test_stats_endpoint() {
    let router = test_router();
    check_in(&router, "Iris Nunes").await;

    let response = router.oneshot(get_request("/queue/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["waiting"], 1);
    assert_eq!(body["data"]["completed"], 0);
    assert!(body["data"]["average_wait_minutes"].is_number());
}

#[tokio::test]
async fn test_duplicate_check_in_is_conflict() {
    let router = test_router();

    let input = json!({
        "patient_name": "Joana Brito",
        "appointment_type": "scheduled_appointment",
        "appointment_ref": "appt-42"
    });

    let first = router
        .clone()
        .oneshot(json_request(Method::POST, "/queue/check-in", input.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .oneshot(json_request(Method::POST, "/queue/check-in", input))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[test]
fn test_openapi_document_describes_id_fields() {
    use utoipa::OpenApi;

    let doc = serde_json::to_value(super::openapi::ApiDoc::openapi()).unwrap();
    let schemas = &doc["components"]["schemas"];
    assert_eq!(schemas["QueueEntry"]["properties"]["id"]["format"], "uuid");
    assert_eq!(
        schemas["QueueEvent"]["properties"]["entry_id"]["format"],
        "uuid"
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router();

    let response = router.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
