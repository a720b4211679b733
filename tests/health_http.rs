mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::http::{request, response_json};

#[tokio::test]
async fn it_health_check_reports_ok() {
    let app = spawn_test_server().await;

    let resp = request(&app.app, Method::GET, "/health", None, &[]).await;
    let (status, _, body) = response_json(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"]["healthy"], true);
}

#[tokio::test]
async fn it_liveness_and_readiness_are_200() {
    let app = spawn_test_server().await;

    let live = request(&app.app, Method::GET, "/health/live", None, &[]).await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = request(&app.app, Method::GET, "/health/ready", None, &[]).await;
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn it_database_health_reports_latency() {
    let app = spawn_test_server().await;

    let resp = request(&app.app, Method::GET, "/health/database", None, &[]).await;
    let (status, _, body) = response_json(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], true);
    assert!(body["latencyUs"].is_number());
}

#[tokio::test]
async fn it_unknown_route_is_json_404() {
    let app = spawn_test_server().await;

    let resp = request(&app.app, Method::GET, "/nope", None, &[]).await;
    let (status, headers, body) = response_json(resp).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(headers.get("x-request-id").is_some());
}
