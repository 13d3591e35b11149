use super::client::ApiClient;
use crate::types::{LoginRequest, RegisterRequest, Result, TokenResponse, User};

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/register`
    pub async fn register(&self, data: &RegisterRequest) -> Result<User> {
        self.client.post("/auth/register", data).await
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse> {
        self.client.post("/auth/login", credentials).await
    }

    /// `GET /auth/me` (bearer required)
    pub async fn me(&self) -> Result<User> {
        self.client.get("/auth/me").await
    }
}
