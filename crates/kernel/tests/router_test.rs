#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP surface tests that run without a database.
//!
//! The store behind [`TestApp::offline`] is unreachable, so these cover
//! everything decided before a connection is needed plus the failure path.

mod common;

use axum::http::{StatusCode, header};

use common::{TestApp, body_string};

#[tokio::test]
async fn title_initials_list() {
    let app = TestApp::offline();
    let value = app
        .get_json("/api/browse/title-initials", StatusCode::OK)
        .await;

    let initials: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(initials.len(), 27);
    assert_eq!(initials[0], "0-9");
    assert_eq!(initials[1], "A");
    assert_eq!(initials[26], "Z");
}

#[tokio::test]
async fn invalid_initial_is_rejected_before_the_store() {
    let app = TestApp::offline();
    let value = app
        .get_json("/api/search?initial=abc", StatusCode::BAD_REQUEST)
        .await;

    assert_eq!(value["code"], "INVALID_QUERY");
    assert!(value["message"].as_str().unwrap().contains("initial"));
}

#[tokio::test]
async fn unreachable_store_is_reported_without_detail() {
    let app = TestApp::offline();
    let value = app
        .get_json("/api/search?title=alien", StatusCode::INTERNAL_SERVER_ERROR)
        .await;

    assert_eq!(value["code"], "STORE_UNAVAILABLE");
    let message = value["message"].as_str().unwrap();
    assert_eq!(message, "catalog store is unavailable");
    assert!(!message.contains("127.0.0.1"));
}

#[tokio::test]
async fn single_lookups_fail_as_store_unavailable() {
    let app = TestApp::offline();
    for uri in ["/api/movies/tt0094859", "/api/stars/nm0000001", "/api/genres"] {
        let value = app.get_json(uri, StatusCode::INTERNAL_SERVER_ERROR).await;
        assert_eq!(value["code"], "STORE_UNAVAILABLE", "{uri}");
    }
}

#[tokio::test]
async fn health_reports_unreachable_store() {
    let app = TestApp::offline();
    let value = app
        .get_json("/health", StatusCode::SERVICE_UNAVAILABLE)
        .await;

    assert_eq!(value["status"], "unhealthy");
    assert_eq!(value["postgres"], false);
}

#[tokio::test]
async fn metrics_count_errors_by_code() {
    let app = TestApp::offline();
    app.get("/api/search?initial=%25%25").await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("catalog_request_errors_total"), "{body}");
    assert!(body.contains("code=\"INVALID_QUERY\""), "{body}");
    assert!(body.contains("endpoint=\"search\""), "{body}");
}

#[tokio::test]
async fn json_responses_have_json_content_type() {
    let app = TestApp::offline();
    let response = app.get("/api/browse/title-initials").await;
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::offline();
    let response = app.get("/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
