//! REST API client
//!
//! Thin call-through layer over the platform backend. Every function maps
//! exactly one endpoint and verb to a request; there is no business logic,
//! retry or caching here.
//!
//! # Module Structure
//!
//! - [`api::client`](crate::api::client) - Configured HTTP client and interceptors
//! - [`api::auth`](crate::api::auth) - Authentication endpoints
//! - [`api::chatbots`](crate::api::chatbots) - Chatbot endpoints
//! - [`api::keywords`](crate::api::keywords) - Keyword rule endpoints
//!
//! # API Endpoints
//!
//! ## Authentication (`/auth`)
//! - `POST /auth/register` - Register new user
//! - `POST /auth/login` - Login and receive a bearer token
//! - `GET /auth/me` - Current user
//!
//! ## Chatbots (`/chatbots`)
//! - `GET /chatbots` - List the user's chatbots
//! - `GET /chatbots/{id}` - One chatbot
//! - `POST /chatbots` - Create a chatbot
//! - `PUT /chatbots/{id}` - Partial update (name, active flag, ...)
//! - `DELETE /chatbots/{id}` - Delete a chatbot
//!
//! ## Keywords
//! - `GET /chatbots/{id}/keywords` - Rules of one chatbot
//! - `POST /keywords` - Create a rule
//! - `PUT /keywords/{id}` - Update a rule
//! - `DELETE /keywords/{id}` - Delete a rule
//!
//! # Authentication
//!
//! Every endpoint except register and login requires the header:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Authentication endpoints.
pub mod auth;
/// Chatbot endpoints.
pub mod chatbots;
/// HTTP client wrapper.
pub mod client;
/// Keyword rule endpoints.
pub mod keywords;

pub use client::ApiClient;
