mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{body_bytes, body_json, TestApp};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.request(get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "health-records-service");
}

#[tokio::test]
async fn readiness_reports_store_status() {
    let app = TestApp::spawn().await;

    let response = app.request(get("/ready")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["checks"]["store"], "up");
}

#[tokio::test]
async fn metrics_are_exposed_as_text() {
    let app = TestApp::spawn().await;
    app.request(get("/health")).await;

    let response = app.request(get("/metrics")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(!text.contains("<html"));
}

#[tokio::test]
async fn openapi_document_lists_the_api() {
    let app = TestApp::spawn().await;

    let response = app.request(get("/.well-known/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/reports"].is_object());
    assert!(body["paths"]["/share-links"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn swagger_ui_can_load_its_assets() {
    let app = TestApp::spawn().await;

    let response = app.request(get("/docs/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let csp = response.headers()["content-security-policy"].to_str().unwrap();
    assert!(csp.contains("script-src 'self' 'unsafe-inline'"));
    assert!(!csp.contains("default-src 'none'"));
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
}

#[tokio::test]
async fn api_routes_keep_the_strict_policy() {
    let app = TestApp::spawn().await;

    let response = app.request(get("/health")).await;

    assert_eq!(
        response.headers()["content-security-policy"],
        "default-src 'none'; frame-ancestors 'none'"
    );
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(response.headers()["cache-control"], "no-store");
}
