//! View models for each console screen
//!
//! A view owns the state of one mounted screen: the records it fetched, its
//! form fields, its error line and modal state. Actions never return errors.
//! Failures are turned into an `error` line or a blocking alert and leave
//! the view in its previous stable state. What an action asks of the shell
//! (alert, navigation) comes back as [`Effects`].
//!
//! Every request a view issues runs inside its [`ViewScope`]. Unmounting the
//! view (or dropping it) cancels the scope, and any response arriving after
//! that point is discarded.

/// Bot detail screen with the keyword modal.
pub mod bot_detail;
/// Create-bot form.
pub mod create_bot;
/// Chatbot list.
pub mod dashboard;
/// Login form.
pub mod login;
/// Registration form.
pub mod register;

pub use bot_detail::{BotDetailView, KeywordForm, KeywordModal};
pub use create_bot::{CreateBotForm, CreateBotView};
pub use dashboard::{BotCard, DashboardView};
pub use login::{LoginForm, LoginView};
pub use register::{RegisterForm, RegisterView};

use crate::app::routes::Route;
use crate::types::{AppError, Result};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What an action asks the shell to do once it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    /// Blocking alert to show
    pub alert: Option<String>,
    /// Route to navigate to
    pub navigate: Option<Route>,
}

impl Effects {
    /// Nothing to do.
    pub fn none() -> Self {
        Self::default()
    }

    /// Show a blocking alert.
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            alert: Some(message.into()),
            navigate: None,
        }
    }

    /// Navigate to `route`.
    pub fn navigate(route: Route) -> Self {
        Self {
            alert: None,
            navigate: Some(route),
        }
    }

    /// Add a navigation after the alert.
    pub fn and_navigate(mut self, route: Route) -> Self {
        self.navigate = Some(route);
        self
    }

    /// True when there is nothing to do.
    pub fn is_empty(&self) -> bool {
        self.alert.is_none() && self.navigate.is_none()
    }
}

/// Confirmation prompt shown before destructive actions.
pub trait Confirm {
    /// Ask `message`; `true` means proceed.
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

impl Confirm for bool {
    fn confirm(&self, _message: &str) -> bool {
        *self
    }
}

/// Lifetime of a mounted view.
///
/// Requests run through [`ViewScope::run`] resolve to
/// [`AppError::Cancelled`] once the scope is cancelled, even if the response
/// already arrived.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    /// Fresh, active scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope cancelled together with `parent`.
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
        }
    }

    /// Token for cancelling this scope from elsewhere (another task, a signal handler).
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether the view is still mounted.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Tear the view down; outstanding requests are abandoned.
    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Run `fut` unless the scope is cancelled first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AppError::Cancelled),
            result = fut => result,
        };
        if self.token.is_cancelled() {
            debug!("Discarding result that arrived after unmount");
            return Err(AppError::Cancelled);
        }
        result
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Message for a failed form submission: the backend detail, or `fallback`.
pub(crate) fn detail_or(err: &AppError, fallback: &str) -> String {
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Reject an empty required field.
pub(crate) fn require(value: &str, label: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", label)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scope_passes_results_through_while_active() {
        let scope = ViewScope::new();
        let value = scope.run(async { Ok(5) }).await.unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn test_unmounted_scope_never_polls_the_request() {
        let scope = ViewScope::new();
        scope.unmount();

        let polled = std::sync::atomic::AtomicBool::new(false);
        let result: Result<()> = scope
            .run(async {
                polled.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_unmount_during_request_discards_result() {
        let scope = ViewScope::new();
        let token = scope.token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("late")
            })
            .await;
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(!scope.is_active());
    }

    #[test]
    fn test_drop_cancels_token() {
        let scope = ViewScope::new();
        let token = scope.token();
        drop(scope);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_child_scope_follows_parent() {
        let parent = CancellationToken::new();
        let scope = ViewScope::child_of(&parent);
        assert!(scope.is_active());
        parent.cancel();
        assert!(!scope.is_active());
    }

    #[test]
    fn test_effects_builders() {
        assert!(Effects::none().is_empty());
        let fx = Effects::alert("Failed to load bot data").and_navigate(Route::Dashboard);
        assert_eq!(fx.alert.as_deref(), Some("Failed to load bot data"));
        assert_eq!(fx.navigate, Some(Route::Dashboard));
    }

    #[test]
    fn test_confirm_impls() {
        assert!(true.confirm("sure?"));
        assert!(!false.confirm("sure?"));
        let only_keywords = |msg: &str| msg.contains("keyword");
        assert!(only_keywords.confirm("Delete this keyword?"));
    }

    #[test]
    fn test_require() {
        assert!(require("x", "Name").is_ok());
        let err = require("", "Access token").unwrap_err();
        assert_eq!(err.detail(), Some("Access token is required"));
    }
}
