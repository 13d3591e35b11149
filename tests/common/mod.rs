//! Shared fixtures for the integration tests.
//!
//! Every test gets its own `MockServer` standing in for the backend; the
//! client is pointed at `<mock>/api` the same way it is pointed at the
//! hosted backend.

#![allow(dead_code)]

use instabot::auth::store::{MemoryTokenStore, TokenStore};
use instabot::utils::config::ApiConfig;
use instabot::{ApiClient, Session};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

/// Session against `server` plus a handle on its token store.
pub fn session(server: &MockServer, token: Option<&str>) -> (Session, Arc<MemoryTokenStore>) {
    session_at(&format!("{}/api", server.uri()), token)
}

/// Base URL on which nothing is listening.
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}

/// Session against an arbitrary base URL.
pub fn session_at(base_url: &str, token: Option<&str>) -> (Session, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let tokens: Arc<dyn TokenStore> = store.clone();
    let api = ApiClient::new(
        &ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: Some(5),
        },
        tokens,
    )
    .expect("client should build");
    (Session::new(api), store)
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "created_at": "2024-03-01T09:00:00"
    })
}

pub fn bot_json(id: i64, name: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "instagram_account_id": format!("178414001234567{:02}", id),
        "instagram_username": "mybusiness",
        "is_active": active,
        "created_at": "2024-03-09T14:30:00.123456",
        "updated_at": null
    })
}

pub fn keyword_json(id: i64, chatbot_id: i64, trigger: &str, response: &str) -> Value {
    json!({
        "id": id,
        "chatbot_id": chatbot_id,
        "trigger": trigger,
        "response": response,
        "is_active": true,
        "created_at": "2024-03-10T08:00:00"
    })
}
