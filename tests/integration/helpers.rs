//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::Duration;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use notihub_api::AppState;
use notihub_auth::{AppSigner, JwtEncoder};
use notihub_core::config::{AppConfig, AppCredential};
use notihub_core::types::id::UserId;
use notihub_database::QueryPipeline;
use notihub_database::repositories::MemoryStore;
use notihub_service::TracingAuditSink;

/// Application registered when auth is enabled.
pub const APP_ID: &str = "ranking";
/// Its shared secret.
pub const APP_SECRET: &str = "ranking-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application on the memory backend with auth disabled
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with auth enabled and one registered app
    pub fn with_auth() -> Self {
        let mut config = AppConfig::default();
        config.auth.enabled = true;
        config.auth.jwt_secret = "integration-jwt-secret".to_string();
        config.auth.apps = vec![AppCredential {
            app_id: APP_ID.to_string(),
            secret: APP_SECRET.to_string(),
        }];
        Self::with_config(config)
    }

    fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new(QueryPipeline::new(
            config.query.searchable_fields.clone(),
        )));
        let state = AppState::new(config.clone(), store, Arc::new(TracingAuditSink));
        Self {
            router: notihub_api::build_router(state),
            config,
        }
    }

    /// Issue a bearer token for `user`
    pub fn token_for(&self, user: UserId) -> String {
        JwtEncoder::new(&self.config.auth)
            .issue(user, Duration::minutes(5))
            .expect("Failed to issue token")
    }

    /// PUT a batch, signing it as the registered app
    pub async fn put_signed(&self, records: &Value) -> TestResponse {
        let body = serde_json::to_vec(records).expect("Failed to serialize body");
        let signature = AppSigner::sign(APP_SECRET, &body);
        self.send(
            "PUT",
            "/api/v1/notifications/batch",
            body,
            &[("APPID", APP_ID.to_string()), ("APPSIGNATURE", signature)],
        )
        .await
    }

    /// PUT a batch without credentials
    pub async fn put_batch(&self, records: &Value) -> TestResponse {
        let body = serde_json::to_vec(records).expect("Failed to serialize body");
        self.send("PUT", "/api/v1/notifications/batch", body, &[])
            .await
    }

    /// GET `path`, optionally with a bearer token
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let headers: Vec<(&str, String)> = token
            .map(|t| vec![("Authorization", format!("Bearer {}", t))])
            .unwrap_or_default();
        self.send("GET", path, Vec::new(), &headers).await
    }

    /// Make an HTTP request to the test app
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Vec<u8>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }

        let req = req
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The first error code of a failure envelope
    pub fn error_code(&self) -> Option<u64> {
        self.body["error"][0]["code"].as_u64()
    }
}

/// A complete notification record
pub fn record(user: UserId, uuid: &str, name: &str, created_at: &str) -> Value {
    json!({
        "user_uuid": user,
        "category": "cat1",
        "uuid": uuid,
        "name": name,
        "description": "d",
        "created_at": created_at,
    })
}

/// Percent-encode a query-string value
pub fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
