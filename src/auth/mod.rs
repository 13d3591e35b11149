//! Session, token storage and route guard
//!
//! This module owns the only client state that outlives a view: the bearer
//! token on disk and the in-memory session built from it.
//!
//! # Module Structure
//!
//! - [`auth::store`](crate::auth::store) - Token persistence (file or memory)
//! - [`auth::session`](crate::auth::session) - Explicit session context and its transitions
//! - [`auth::guard`](crate::auth::guard) - Protected-route decision
//!
//! # Session lifecycle
//!
//! ```text
//! Unchecked --check_auth--> Anonymous            (no token)
//!                       \-> Authenticated(user)  (/auth/me ok)
//!                       \-> Expired              (401/403, token cleared)
//!                       \-> Unreachable(reason)  (network/5xx, token kept)
//! any --logout--> Anonymous
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use instabot::auth::{FileTokenStore, Session};
//! use instabot::api::ApiClient;
//!
//! let tokens = Arc::new(FileTokenStore::new(".instabot/session.json"));
//! let api = ApiClient::new(&config.api, tokens)?;
//! let session = Session::new(api);
//! session.check_auth().await;
//! ```

/// Protected-route decision.
pub mod guard;
/// Explicit session context.
pub mod session;
/// Bearer token persistence.
pub mod store;

pub use guard::{guard, GuardDecision};
pub use session::{AuthState, Session, SessionSnapshot};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
