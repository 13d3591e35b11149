//! # Instabot - console for the Instagram auto-reply platform
//!
//! Client side of a multi-tenant platform where users link Instagram
//! business accounts to chatbots that answer direct messages using keyword
//! rules. This crate talks to the platform's REST API; it does not host the
//! backend or receive webhooks.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a terminal console** - Run the `instabot` binary
//! 2. **As a library** - Drive the API client, session and view models from
//!    your own front end
//!
//! ### Basic Example
//!
//! ```rust,no_run
//! use instabot::{ApiClient, FileTokenStore, LoginRequest, Session};
//! use instabot::utils::config::ApiConfig;
//! use std::sync::Arc;
//!
//! # async fn demo() -> instabot::Result<()> {
//! let tokens = Arc::new(FileTokenStore::new(".instabot/session.json"));
//! let api = ApiClient::new(&ApiConfig::default(), tokens)?;
//! let session = Session::new(api);
//!
//! session
//!     .login(&LoginRequest {
//!         username: "alice".into(),
//!         password: "secret".into(),
//!     })
//!     .await?;
//!
//! for bot in session.api().chatbots().list().await? {
//!     println!("{} ({})", bot.name, bot.instagram_account_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST client with bearer-token and error interceptors
//! - [`auth`] - Token storage, session lifecycle and route guard
//! - [`views`] - Headless view models for each console screen
//! - [`app`] - Routes and the terminal console shell
//! - [`cli`] - Command line parsing and colored output
//! - [`types`] - Records, request payloads and errors
//! - [`utils`] - Configuration and logging

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// REST API client and resource namespaces.
pub mod api;
/// Console shell and route table.
pub mod app;
/// Token storage, session and route guard.
pub mod auth;
/// Command line interface.
pub mod cli;
/// Core types (records, requests, errors).
pub mod types;
/// Configuration and logging.
pub mod utils;
/// View models for the console screens.
pub mod views;

// Re-export commonly used types
pub use api::ApiClient;
pub use app::routes::Route;
pub use app::Console;
pub use auth::{guard, AuthState, FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use types::{
    AppError, Chatbot, Keyword, LoginRequest, NewChatbot, NewKeyword, RegisterRequest, Result,
    User,
};
pub use utils::config::ConsoleConfig;
