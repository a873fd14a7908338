//! Health endpoints, static assets and the fallback

mod common;

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn test_livez() {
    let mut app = TestApp::new().await;

    let response = app.get("/_status/livez").await;
    assert_eq!(response.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_readyz() {
    let mut app = TestApp::new().await;

    let response = app.get("/_status/readyz").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_version() {
    let mut app = TestApp::new().await;

    let response = app.get("/_status/version").await;
    assert_eq!(response.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(json["version"].is_string());
    assert!(json["build_profile"].is_string());
}

#[tokio::test]
async fn test_stylesheet_is_embedded() {
    let mut app = TestApp::new().await;

    let response = app.get("/static/style.css").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), "text/css");

    let response = app.get("/static/missing.css").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unrouted_path_is_not_found() {
    let mut app = TestApp::new().await;

    let response = app.get_with_accept("/a/b/c", "application/json").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["msg"], "not found");

    let response = app.get_with_accept("/a/b/c", "text/html").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.content_type(), "text/html;charset=utf-8");
}
