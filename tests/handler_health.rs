mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = common::create_test_app();
    let server = app.server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["rate_limiter"]["status"], "ok");
    assert_eq!(json["checks"]["visit_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_store_size() {
    let app = common::create_test_app();
    let server = app.server();

    server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let json = server.get("/health").await.json::<serde_json::Value>();
    assert_eq!(json["checks"]["store"]["message"], "1 links stored");
}

#[tokio::test]
async fn test_health_degraded_when_visit_queue_closed() {
    let common::TestApp { state, visits, .. } = common::create_test_app();
    drop(visits);

    let server = axum_test::TestServer::new(tinylink::routes::build_router(state)).unwrap();
    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["visit_queue"]["status"], "error");
}
