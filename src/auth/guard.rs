use crate::app::routes::Route;
use crate::auth::session::SessionSnapshot;
use crate::types::User;

/// Outcome of guarding a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session check has not resolved; show a placeholder
    Pending,
    /// Render the protected content for this user
    Allow(User),
    /// Navigate elsewhere instead
    Redirect(Route),
}

/// Pure function of `(user, loading)`.
pub fn guard(snapshot: &SessionSnapshot) -> GuardDecision {
    if snapshot.loading {
        return GuardDecision::Pending;
    }
    match snapshot.user() {
        Some(user) => GuardDecision::Allow(user.clone()),
        None => GuardDecision::Redirect(Route::Login),
    }
}
