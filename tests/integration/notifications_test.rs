//! Integration tests for the write, list and count endpoints.

use http::StatusCode;
use serde_json::{Value, json};

use notihub_core::types::id::UserId;

use crate::helpers::{TestApp, encode, record};

fn user() -> UserId {
    "2593ede0-2301-4480-a452-752f03dcfab0"
        .parse()
        .expect("valid uuid")
}

fn list_path(user: UserId, extra: &str) -> String {
    format!("/api/v1/notifications?user_uuid={}{}", user, extra)
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|r| r["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// 25 records named n00..n24, one per day starting 2022-10-01.
async fn seed_25(app: &TestApp, user: UserId) {
    let records: Vec<Value> = (0..25)
        .map(|i| {
            let day = chrono::NaiveDate::from_ymd_opt(2022, 10, 1).expect("date")
                + chrono::Days::new(i);
            record(
                user,
                &format!("uuid-{:02}", i),
                &format!("n{:02}", i),
                &format!("{}T08:00:00Z", day),
            )
        })
        .collect();
    let response = app.put_batch(&Value::Array(records)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_write_then_read_first_record() {
    let app = TestApp::new();
    let u1 = user();

    let response = app
        .put_batch(&json!([record(u1, "X", "alice", "2022-10-02T12:43:46Z")]))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true, "data": null}));

    let response = app.get(&list_path(u1, "&page=1&per_page=10"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(
        response.body["meta"],
        json!({"per_page": 10, "current_page": 1, "from": 1, "to": 1, "last_page": 1, "total": 1})
    );
    let first = &response.body["data"][0];
    assert_eq!(first["id"], json!(0));
    assert_eq!(first["name"], json!("alice"));
    assert_eq!(first["uuid"], json!("X"));
    assert_eq!(first["user_uuid"], json!(u1.to_string()));
}

#[tokio::test]
async fn test_unknown_fields_round_trip() {
    let app = TestApp::new();
    let u1 = user();
    let mut rec = record(u1, "X", "alice", "2022-10-02T12:43:46Z");
    rec["priority"] = json!("high");

    app.put_batch(&json!([rec])).await;
    let response = app.get(&list_path(u1, ""), None).await;
    assert_eq!(response.body["data"][0]["priority"], json!("high"));
}

#[tokio::test]
async fn test_missing_user_uuid_is_wrong_request() {
    let app = TestApp::new();

    let response = app.get("/api/v1/notifications?page=1", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some(50002300));
    assert_eq!(response.body["success"], json!(false));

    let response = app.get("/api/v1/notifications/count", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some(50002300));
}

#[tokio::test]
async fn test_invalid_paging_is_wrong_request() {
    let app = TestApp::new();
    for extra in ["&per_page=0", "&page=abc", "&order=sideways"] {
        let response = app.get(&list_path(user(), extra), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", extra);
        assert_eq!(response.error_code(), Some(50002300), "{}", extra);
    }
}

#[tokio::test]
async fn test_unknown_user_reads_empty_page() {
    let app = TestApp::new();

    let response = app.get(&list_path(user(), ""), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!([]));
    assert_eq!(
        response.body["meta"],
        json!({"per_page": 10, "current_page": 1, "from": 0, "to": 0, "last_page": 1, "total": 0})
    );
}

#[tokio::test]
async fn test_pagination_meta() {
    let app = TestApp::new();
    let u1 = user();
    seed_25(&app, u1).await;

    let response = app
        .get(&list_path(u1, "&page=3&per_page=10&sort_by=name&order=asc"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["meta"],
        json!({"per_page": 10, "current_page": 3, "from": 21, "to": 25, "last_page": 3, "total": 25})
    );
    assert_eq!(names(&response.body), ["n20", "n21", "n22", "n23", "n24"]);

    let response = app.get(&list_path(u1, "&page=4&per_page=10"), None).await;
    assert_eq!(response.body["data"], json!([]));
    assert_eq!(response.body["meta"]["from"], json!(0));
    assert_eq!(response.body["meta"]["to"], json!(0));
    assert_eq!(response.body["meta"]["last_page"], json!(3));
    assert_eq!(response.body["meta"]["total"], json!(25));
}

#[tokio::test]
async fn test_default_sort_is_newest_first() {
    let app = TestApp::new();
    let u1 = user();
    seed_25(&app, u1).await;

    let response = app.get(&list_path(u1, "&per_page=3"), None).await;
    assert_eq!(names(&response.body), ["n24", "n23", "n22"]);
}

#[tokio::test]
async fn test_daytime_and_list_filters() {
    let app = TestApp::new();
    let u1 = user();
    seed_25(&app, u1).await;

    let filter = json!([
        {"field": "created_at", "type": "daytime", "value": {"from": "2022-10-03", "to": "2022-10-06"}},
        {"field": "uuid", "type": "list", "value": ["uuid-02", "uuid-05", "uuid-09"]}
    ]);
    let extra = format!("&sort_by=name&order=asc&filter={}", encode(&filter.to_string()));
    let response = app.get(&list_path(u1, &extra), None).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(names(&response.body), ["n02", "n05"]);
    assert_eq!(response.body["meta"]["total"], json!(2));
}

#[tokio::test]
async fn test_empty_filter_object_matches_everything() {
    let app = TestApp::new();
    let u1 = user();
    seed_25(&app, u1).await;

    let extra = format!("&filter={}", encode("{}"));
    let response = app.get(&list_path(u1, &extra), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["meta"]["total"], json!(25));
}

#[tokio::test]
async fn test_bad_filter_is_wrong_request() {
    let app = TestApp::new();
    let u1 = user();
    seed_25(&app, u1).await;

    let reversed = json!({"field": "created_at", "type": "daytime", "value": {"from": "2022-10-06", "to": "2022-10-03"}});
    for raw in [reversed.to_string(), "not json".to_string(), r#"{"field":"uuid","type":"range","value":[]}"#.to_string()] {
        let extra = format!("&filter={}", encode(&raw));
        let response = app.get(&list_path(u1, &extra), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", raw);
        assert_eq!(response.error_code(), Some(50002300), "{}", raw);
    }
}

#[tokio::test]
async fn test_search_and_count() {
    let app = TestApp::new();
    let u1 = user();
    app.put_batch(&json!([
        record(u1, "a", "weekly digest", "2022-10-01T00:00:00Z"),
        record(u1, "b", "new rank", "2022-10-02T00:00:00Z"),
        record(u1, "c", "digest ready", "2022-10-03T00:00:00Z"),
    ]))
    .await;

    let response = app.get(&list_path(u1, "&search=digest"), None).await;
    assert_eq!(names(&response.body), ["digest ready", "weekly digest"]);

    let path = format!("/api/v1/notifications/count?user_uuid={}&search=digest", u1);
    let response = app.get(&path, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true, "data": {"count": 2}}));

    let path = format!("/api/v1/notifications/count?user_uuid={}", u1);
    let response = app.get(&path, None).await;
    assert_eq!(response.body["data"]["count"], json!(3));
}

#[tokio::test]
async fn test_rewrite_is_idempotent_and_users_are_partitioned() {
    let app = TestApp::new();
    let u1 = user();
    let u2 = UserId::new();
    let batch = json!([
        record(u1, "a", "one", "2022-10-01T00:00:00Z"),
        record(u2, "a", "other", "2022-10-01T00:00:00Z"),
        record(u1, "b", "two", "2022-10-02T00:00:00Z"),
    ]);

    app.put_batch(&batch).await;
    let response = app.put_batch(&batch).await;
    assert_eq!(response.status, StatusCode::OK);

    let count = |user: UserId| format!("/api/v1/notifications/count?user_uuid={}", user);
    assert_eq!(app.get(&count(u1), None).await.body["data"]["count"], json!(2));
    assert_eq!(app.get(&count(u2), None).await.body["data"]["count"], json!(1));
}

#[tokio::test]
async fn test_malformed_batch_is_wrong_request() {
    let app = TestApp::new();

    let response = app.put_batch(&json!({"not": "an array"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some(50002300));

    let response = app.put_batch(&json!([{"user_uuid": user(), "name": "x"}])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
