//! Mock server tests for the reqwest transport.
//!
//! These tests use wiremock to simulate a CSRF-protected API and check what
//! actually goes over the wire.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ward_core::{
    ApiClient, ApiConfig, BaseUrl, CredentialKey, CredentialStore, Error, MemoryStore,
    TokenFetchError, TransportError,
};
use ward_http::{TransportConfig, connect, connect_with};

/// Helper to build an API config pointing at a mock server.
fn mock_config(server: &MockServer) -> ApiConfig {
    // HTTP is allowed for loopback hosts
    ApiConfig::new(BaseUrl::new(server.uri()).unwrap())
}

fn client(server: &MockServer, store: &MemoryStore) -> ApiClient {
    connect(mock_config(server), Arc::new(store.clone())).unwrap()
}

async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

fn xsrf_headers(requests: &[wiremock::Request], request_path: &str) -> Vec<Option<String>> {
    requests
        .iter()
        .filter(|r| r.url.path() == request_path)
        .map(|r| {
            r.headers
                .get("x-xsrf-token")
                .map(|v| v.to_str().unwrap().to_string())
        })
        .collect()
}

// ============================================================================
// Header attachment
// ============================================================================

#[tokio::test]
async fn test_get_sends_bearer_and_cached_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer abc"))
        .and(header("x-xsrf-token", "cached-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "alice" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.set_session_token("abc");
    store.set(CredentialKey::AntiforgeryToken, "cached-token".to_string());

    let response = client(&server, &store).get("/profile").await.unwrap();

    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["name"], "alice");
}

#[tokio::test]
async fn test_get_without_credentials_sends_no_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    client(&server, &store).get("/public").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("x-xsrf-token").is_none());
}

#[tokio::test]
async fn test_post_fetches_fresh_token_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(header("x-xsrf-token", "fresh"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "name": "widget" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.set(CredentialKey::AntiforgeryToken, "stale".to_string());

    let response = client(&server, &store)
        .post("/items", &json!({ "name": "widget" }))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.get(CredentialKey::AntiforgeryToken).as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_post_proceeds_when_token_endpoint_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let response = client(&server, &store).delete("/items/1").await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(xsrf_headers(&requests, "/api/items/1"), [None]);
}

// ============================================================================
// Retry on anti-forgery rejection
// ============================================================================

#[tokio::test]
async fn test_forbidden_get_is_retried_with_new_token() {
    let server = MockServer::start().await;

    mount_token(&server, "t-new", 1).await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(header("x-xsrf-token", "t-old"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "bad token" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(header("x-xsrf-token", "t-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.set(CredentialKey::AntiforgeryToken, "t-old".to_string());

    let response = client(&server, &store).get("/items").await.unwrap();

    let items: Vec<u32> = response.json().unwrap();
    assert_eq!(items, [1, 2]);
    assert_eq!(store.get(CredentialKey::AntiforgeryToken).as_deref(), Some("t-new"));
}

#[tokio::test]
async fn test_forbidden_post_is_retried_once() {
    let server = MockServer::start().await;

    mount_token(&server, "t1", 1).await;
    mount_token(&server, "t2", 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/items/1"))
        .and(header("x-xsrf-token", "t1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/items/1"))
        .and(header("x-xsrf-token", "t2"))
        .and(body_json(json!({ "name": "renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.set_session_token("abc");

    let response = client(&server, &store)
        .put("/items/1", &json!({ "name": "renamed" }))
        .await
        .unwrap();

    assert!(response.is_success());
    let requests = server.received_requests().await.unwrap();
    for request in requests.iter().filter(|r| r.url.path() == "/api/items/1") {
        assert_eq!(request.headers["authorization"], "Bearer abc");
    }
}

#[tokio::test]
async fn test_repeated_forbidden_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/items/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "Forbidden" })))
        .expect(2)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let err = client(&server, &store)
        .patch("/items/1", &json!({}))
        .await
        .unwrap_err();

    assert!(err.is_authorization_rejected());
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(err.to_string().contains("Forbidden"));
}

#[tokio::test]
async fn test_retry_refresh_failure_surfaces_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.set(CredentialKey::AntiforgeryToken, "stale".to_string());

    let err = client(&server, &store).get("/items").await.unwrap_err();

    assert!(matches!(
        err,
        Error::TokenFetch(TokenFetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR
        })
    ));
    assert_eq!(store.get(CredentialKey::AntiforgeryToken).as_deref(), Some("stale"));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no such item" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let err = client(&server, &store).get("/missing").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    let response = err.response().unwrap();
    assert_eq!(response.text(), r#"{"message":"no such item"}"#);
}

// ============================================================================
// Token endpoint
// ============================================================================

#[tokio::test]
async fn test_token_endpoint_server_error_leaves_store_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.set(CredentialKey::AntiforgeryToken, "keep".to_string());

    let client = client(&server, &store);
    let supplier = ward_core::AntiforgeryTokenSupplier::new(
        client.transport().clone(),
        Arc::new(store.clone()),
        client.config().csrf_token_url().unwrap(),
    );

    let err = supplier.refresh().await.unwrap_err();

    assert!(matches!(
        err,
        TokenFetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR
        }
    ));
    assert_eq!(store.get(CredentialKey::AntiforgeryToken).as_deref(), Some("keep"));
}

#[tokio::test]
async fn test_custom_token_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/xsrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "custom" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/items"))
        .and(header("x-xsrf-token", "custom"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_api_prefix("/v1")
        .with_csrf_token_path("/auth/xsrf");
    let store = MemoryStore::new();
    let client = connect(config, Arc::new(store)).unwrap();

    client.post("/items", &json!({})).await.unwrap();
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    let config = ApiConfig::new(BaseUrl::new("http://127.0.0.1:1").unwrap());
    let client = connect(config, Arc::new(MemoryStore::new())).unwrap();

    let err = client.get("/items").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Connection { .. })
    ));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Some(Duration::from_millis(200)));
    let client = connect_with(mock_config(&server), transport, Arc::new(MemoryStore::new()))
        .unwrap();

    let err = client.get("/slow").await.unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
}
