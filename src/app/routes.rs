use crate::auth::guard::{guard, GuardDecision};
use crate::auth::session::SessionSnapshot;
use std::fmt;

/// Every screen of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/dashboard`
    Dashboard,
    /// `/create-bot`
    CreateBot,
    /// `/bot/{id}`
    BotDetail(i64),
}

impl Route {
    /// Parse a path. `/` maps to the dashboard.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" | "/dashboard" => Some(Route::Dashboard),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/create-bot" => Some(Route::CreateBot),
            other => other
                .strip_prefix("/bot/")
                .and_then(|id| id.parse().ok())
                .map(Route::BotDetail),
        }
    }

    /// Canonical path.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::CreateBot => "/create-bot".to_string(),
            Route::BotDetail(id) => format!("/bot/{}", id),
        }
    }

    /// Whether the route requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What navigating to a path produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Render this route
    Render(Route),
    /// Go here instead
    Redirect(Route),
    /// Wait for the session check
    Pending,
    /// No such route
    NotFound,
}

/// Resolve `path` against the current session, guarding protected routes.
pub fn resolve(path: &str, session: &SessionSnapshot) -> Resolution {
    let route = match Route::parse(path) {
        Some(route) => route,
        None => return Resolution::NotFound,
    };

    if !route.is_protected() {
        return Resolution::Render(route);
    }

    match guard(session) {
        GuardDecision::Pending => Resolution::Pending,
        GuardDecision::Allow(_) => Resolution::Render(route),
        GuardDecision::Redirect(to) => Resolution::Redirect(to),
    }
}
