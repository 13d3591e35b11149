//! Session lifecycle tests
//!
//! Login, the startup session check, registration and logout against a
//! mocked backend, asserting on both the session state and what ends up in
//! token storage.

mod common;

use common::{dead_base_url, session, session_at, user_json};
use instabot::auth::store::{FileTokenStore, TokenStore};
use instabot::utils::config::ApiConfig;
use instabot::views::DashboardView;
use instabot::{guard, ApiClient, AppError, AuthState, LoginRequest, Session};
use instabot::auth::GuardDecision;
use instabot::types::RegisterRequest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn alice() -> LoginRequest {
    LoginRequest {
        username: "alice".into(),
        password: "secret".into(),
    }
}

async fn mount_login_ok(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": token, "token_type": "bearer"})),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_greets_user() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, None);

    mount_login_ok(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "alice")))
        .expect(1)
        .mount(&server)
        .await;

    session.login(&alice()).await.unwrap();

    assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
    let snapshot = session.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.user().map(|u| u.username.as_str()), Some("alice"));
    assert!(matches!(guard(&snapshot), GuardDecision::Allow(_)));

    let dashboard = DashboardView::new(session.clone());
    assert_eq!(dashboard.greeting().as_deref(), Some("Welcome, alice"));
}

#[tokio::test]
async fn test_invalid_credentials_persist_nothing() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, None);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "alice")))
        .expect(0)
        .mount(&server)
        .await;

    let err = session.login(&alice()).await.unwrap_err();

    assert_eq!(err.detail(), Some("Incorrect username or password"));
    assert!(store.load().unwrap().is_none());
    assert!(session.user().is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_login_without_token_in_response() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, None);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})))
        .mount(&server)
        .await;

    let err = session.login(&alice()).await.unwrap_err();
    assert!(matches!(err, AppError::MissingToken));
    assert!(store.load().unwrap().is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_login_persists_token_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join(".instabot").join("session.json");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&token_path));
    let api = ApiClient::new(
        &ApiConfig {
            base_url: format!("{}/api", server.uri()),
            timeout_secs: None,
        },
        tokens,
    )
    .unwrap();
    let session = Session::new(api);

    mount_login_ok(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "alice")))
        .mount(&server)
        .await;

    session.login(&alice()).await.unwrap();

    let raw = std::fs::read_to_string(&token_path).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, json!({"token": "abc123"}));

    // A fresh process picks the session back up from disk.
    let reopened = FileTokenStore::new(&token_path);
    assert_eq!(reopened.load().unwrap().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_subscribers_see_login() {
    let server = MockServer::start().await;
    let (session, _) = session(&server, None);
    let mut rx = session.subscribe();

    mount_login_ok(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "alice")))
        .mount(&server)
        .await;

    session.login(&alice()).await.unwrap();

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert!(seen.is_authenticated());
}

// ============================================================================
// Session check
// ============================================================================

#[tokio::test]
async fn test_check_without_token_makes_no_request() {
    let server = MockServer::start().await;
    let (session, _) = session(&server, None);

    let snapshot = session.check_auth().await;

    assert_eq!(snapshot.state, AuthState::Anonymous);
    assert!(!snapshot.loading);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_token_is_cleared_and_check_converges() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, Some("stale"));

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let first = session.check_auth().await;
    assert_eq!(first.state, AuthState::Expired);
    assert!(first.user().is_none());
    assert!(store.load().unwrap().is_none());

    let second = session.check_auth().await;
    assert_eq!(second, first);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_server_error_keeps_token() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, Some("abc123"));

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let snapshot = session.check_auth().await;

    assert!(matches!(snapshot.state, AuthState::Unreachable(_)));
    assert!(snapshot.user().is_none());
    assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_transport_failure_keeps_token() {
    let (session, store) = session_at(&dead_base_url(), Some("abc123"));

    let snapshot = session.check_auth().await;

    assert!(matches!(snapshot.state, AuthState::Unreachable(_)));
    assert!(!snapshot.loading);
    assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
    assert_eq!(guard(&snapshot), GuardDecision::Redirect(instabot::Route::Login));
}

#[tokio::test]
async fn test_unreadable_token_file_does_not_block_login() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("session.json");
    std::fs::write(&token_path, "garbage").unwrap();

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&token_path));
    let api = ApiClient::new(
        &ApiConfig {
            base_url: format!("{}/api", server.uri()),
            timeout_secs: None,
        },
        tokens,
    )
    .unwrap();
    let session = Session::new(api);

    let snapshot = session.check_auth().await;
    assert_eq!(snapshot.state, AuthState::Anonymous);
    assert!(!token_path.exists());

    mount_login_ok(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "alice")))
        .mount(&server)
        .await;

    session.login(&alice()).await.unwrap();
    assert!(session.snapshot().is_authenticated());
}

// ============================================================================
// Abandoned operations
// ============================================================================

#[tokio::test]
async fn test_abandoned_login_clears_loading() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, None);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "abc123"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = tokio::time::timeout(Duration::from_millis(50), session.login(&alice())).await;
    assert!(result.is_err());

    let snapshot = session.snapshot();
    assert!(!snapshot.loading);
    assert!(store.load().unwrap().is_none());
    assert_eq!(guard(&snapshot), GuardDecision::Redirect(instabot::Route::Login));
}

#[tokio::test]
async fn test_abandoned_check_clears_loading() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, Some("abc123"));

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(1, "alice"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    assert!(session.is_loading());
    let result = tokio::time::timeout(Duration::from_millis(50), session.check_auth()).await;
    assert!(result.is_err());

    assert!(!session.is_loading());
    assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_abandoned_register_clears_loading() {
    let server = MockServer::start().await;
    let (session, _) = session(&server, None);

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(2, "bob"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let data = RegisterRequest {
        username: "bob".into(),
        email: "bob@example.com".into(),
        password: "hunter22".into(),
    };
    let result = tokio::time::timeout(Duration::from_millis(50), session.register(&data)).await;
    assert!(result.is_err());
    assert!(!session.is_loading());
}

// ============================================================================
// Register / logout
// ============================================================================

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, None);

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(2, "bob")))
        .expect(1)
        .mount(&server)
        .await;

    let user = session
        .register(&RegisterRequest {
            username: "bob".into(),
            email: "bob@example.com".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.username, "bob");
    assert!(store.load().unwrap().is_none());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn test_register_conflict_surfaces_detail() {
    let server = MockServer::start().await;
    let (session, _) = session(&server, None);

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Username already registered"})),
        )
        .mount(&server)
        .await;

    let err = session
        .register(&RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.detail(), Some("Username already registered"));
}

#[tokio::test]
async fn test_logout_is_local() {
    let server = MockServer::start().await;
    let (session, store) = session(&server, Some("abc123"));

    session.logout();

    assert!(store.load().unwrap().is_none());
    assert_eq!(session.snapshot().state, AuthState::Anonymous);
    assert!(server.received_requests().await.unwrap().is_empty());
}
