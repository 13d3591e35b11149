use crate::api::ApiClient;
use crate::auth::store::TokenStore;
use crate::types::{AppError, LoginRequest, RegisterRequest, Result, TokenResponse, User};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Where the session stands after the most recent transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The startup session check has not completed yet
    Unchecked,
    /// No token is stored
    Anonymous,
    /// The stored token was accepted by `/auth/me`
    Authenticated(User),
    /// The backend rejected the stored token; it has been cleared
    Expired,
    /// The backend could not be reached; the token is kept for a later check
    Unreachable(String),
}

/// Point-in-time view of the session, as consumed by the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current authentication state
    pub state: AuthState,
    /// A session operation is in flight
    pub loading: bool,
}

impl SessionSnapshot {
    /// State before the first session check: unchecked and loading.
    pub fn initial() -> Self {
        Self {
            state: AuthState::Unchecked,
            loading: true,
        }
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Shorthand for `user().is_some()`.
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// Explicit session context.
///
/// Constructed once at start, initialized by [`Session::check_auth`], torn
/// down by [`Session::logout`]. Cheap to clone; clones share state. Every
/// transition is published to [`Session::subscribe`]rs.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionSnapshot>,
}

impl Session {
    /// New session over `api`, sharing its token store.
    pub fn new(api: ApiClient) -> Self {
        let tokens = api.token_store();
        let (state, _) = watch::channel(SessionSnapshot::initial());
        Self {
            inner: Arc::new(SessionInner { api, tokens, state }),
        }
    }

    /// API client bound to this session's token store.
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<User> {
        self.snapshot().user().cloned()
    }

    /// Whether a session operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Exchange the stored token for the current user.
    ///
    /// Never fails: a rejected token is cleared and the state becomes
    /// [`AuthState::Expired`]; a transport or server failure keeps the token
    /// and yields [`AuthState::Unreachable`].
    pub async fn check_auth(&self) -> SessionSnapshot {
        let _loading = self.begin_loading();
        let was_expired = matches!(self.inner.state.borrow().state, AuthState::Expired);

        let next = match self.inner.tokens.load() {
            Ok(None) if was_expired => AuthState::Expired,
            Ok(None) => AuthState::Anonymous,
            Ok(Some(_)) => match self.inner.api.auth().me().await {
                Ok(user) => {
                    info!(username = %user.username, "Session established");
                    AuthState::Authenticated(user)
                }
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "Session check could not reach the backend, keeping token");
                    AuthState::Unreachable(e.to_string())
                }
                Err(e) => {
                    info!(error = %e, "Stored token rejected, clearing it");
                    self.clear_token();
                    AuthState::Expired
                }
            },
            Err(e) => {
                error!(error = %e, "Failed to read stored token, clearing it");
                self.clear_token();
                AuthState::Anonymous
            }
        };

        self.inner.state.send_modify(|s| {
            s.state = next;
            s.loading = false;
        });
        self.snapshot()
    }

    /// Log in, persist the returned token and re-run the session check.
    ///
    /// Errors (usually invalid credentials) propagate unchanged; nothing is
    /// persisted in that case.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse> {
        let _loading = self.begin_loading();
        let result = self.try_login(credentials).await;
        if let Err(e) = &result {
            warn!(username = %credentials.username, error = %e, "Login failed");
        }
        result
    }

    async fn try_login(&self, credentials: &LoginRequest) -> Result<TokenResponse> {
        let response = self.inner.api.auth().login(credentials).await?;

        let token = response
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)?;

        self.inner.tokens.save(token)?;
        info!(username = %credentials.username, "Token stored");

        self.check_auth().await;
        Ok(response)
    }

    /// Register a new account. The stored session is not touched.
    pub async fn register(&self, data: &RegisterRequest) -> Result<User> {
        let _loading = self.begin_loading();
        self.inner.api.auth().register(data).await
    }

    /// Forget the token and the user. No network call.
    pub fn logout(&self) {
        self.clear_token();
        self.inner.state.send_modify(|s| {
            s.state = AuthState::Anonymous;
            s.loading = false;
        });
        info!("Logged out");
    }

    fn clear_token(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            error!(error = %e, "Failed to clear stored token");
        }
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.inner.state.send_modify(|s| s.loading = true);
        LoadingGuard {
            state: &self.inner.state,
        }
    }
}

/// Clears `loading` when dropped, including when the operation's future is
/// dropped mid-request.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }
}
