//! Configured HTTP client shared by every resource namespace.

use crate::auth::store::TokenStore;
use crate::types::{AppError, ErrorBody, Result};
use crate::utils::config::ApiConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// HTTP client wrapper with a fixed base URL and JSON defaults.
///
/// Two interceptors wrap every call:
/// - outbound: the bearer token is read from the [`TokenStore`] on each
///   request and attached as `Authorization: Bearer <token>` when present;
/// - inbound: successful responses pass through, failures are logged and
///   returned unchanged.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Base URL every path is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token storage the outbound interceptor reads from.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> super::auth::AuthApi<'_> {
        super::auth::AuthApi::new(self)
    }

    /// Chatbot endpoints.
    pub fn chatbots(&self) -> super::chatbots::ChatbotApi<'_> {
        super::chatbots::ChatbotApi::new(self)
    }

    /// Keyword endpoints.
    pub fn keywords(&self) -> super::keywords::KeywordApi<'_> {
        super::keywords::KeywordApi::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(self.request(Method::GET, path)?).await?;
        decode(resp).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .send(self.request(Method::POST, path)?.json(body))
            .await?;
        decode(resp).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::PUT, path)?.json(body)).await?;
        decode(resp).await
    }

    /// DELETE; the response body, if any, is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Outbound interceptor: resolve the URL and attach the bearer token.
    ///
    /// An unreadable token is treated as no token, so login still works.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method.clone(), &url);

        let token = self.tokens.load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable stored token");
            None
        });
        match token {
            Some(token) => {
                debug!(%method, %url, "Sending request with bearer token");
                Ok(builder.header(AUTHORIZATION, format!("Bearer {}", token)))
            }
            None => {
                debug!(%method, %url, "Sending request without token");
                Ok(builder)
            }
        }
    }

    /// Inbound interceptor: log failures without altering them.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, "API request failed before a response arrived");
                return Err(AppError::from(e));
            }
        };

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message());

        if status.is_server_error() {
            error!(status = status.as_u16(), %url, body = %body, "API error");
        } else {
            warn!(status = status.as_u16(), %url, body = %body, "API error");
        }

        Err(AppError::from_status(status.as_u16(), detail))
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
}
