//! Integration tests for application signatures and bearer tokens.

use http::StatusCode;
use serde_json::json;

use notihub_auth::AppSigner;
use notihub_core::types::id::UserId;

use crate::helpers::{APP_ID, APP_SECRET, TestApp, record};

fn list_path(user: UserId) -> String {
    format!("/api/v1/notifications?user_uuid={}", user)
}

#[tokio::test]
async fn test_unsigned_batch_is_unauthorized() {
    let app = TestApp::with_auth();
    let user = UserId::new();

    let response = app
        .put_batch(&json!([record(user, "a", "one", "2022-10-01T00:00:00Z")]))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some(50002100));
}

#[tokio::test]
async fn test_signed_batch_is_stored() {
    let app = TestApp::with_auth();
    let user = UserId::new();

    let response = app
        .put_signed(&json!([record(user, "a", "one", "2022-10-01T00:00:00Z")]))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let token = app.token_for(user);
    let response = app.get(&list_path(user), Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["meta"]["total"], json!(1));
}

#[tokio::test]
async fn test_signature_over_other_body_is_rejected() {
    let app = TestApp::with_auth();
    let body = serde_json::to_vec(&json!([record(
        UserId::new(),
        "a",
        "one",
        "2022-10-01T00:00:00Z"
    )]))
    .expect("body");
    let signature = AppSigner::sign(APP_SECRET, b"[]");

    let response = app
        .send(
            "PUT",
            "/api/v1/notifications/batch",
            body,
            &[("APPID", APP_ID.to_string()), ("APPSIGNATURE", signature)],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some(50002100));
}

#[tokio::test]
async fn test_read_requires_credentials() {
    let app = TestApp::with_auth();

    let response = app.get(&list_path(UserId::new()), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some(50002100));
}

#[tokio::test]
async fn test_token_for_other_user_is_rejected() {
    let app = TestApp::with_auth();
    let token = app.token_for(UserId::new());

    let response = app.get(&list_path(UserId::new()), Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_app_identity_may_read() {
    let app = TestApp::with_auth();
    let signature = AppSigner::sign(APP_SECRET, b"");

    let response = app
        .send(
            "GET",
            &format!("/api/v1/notifications/count?user_uuid={}", UserId::new()),
            Vec::new(),
            &[("APPID", APP_ID.to_string()), ("APPSIGNATURE", signature)],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["count"], json!(0));
}

#[tokio::test]
async fn test_health_is_open() {
    let app = TestApp::with_auth();

    let response = app.get("/api/v1/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
}
