use super::{detail_or, require, Effects, ViewScope};
use crate::app::routes::Route;
use crate::auth::session::Session;
use crate::types::{AppError, LoginRequest};
use tracing::info;

const LOGIN_ERROR: &str = "Login failed";

/// Fields of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

impl LoginForm {
    fn validate(&self) -> crate::types::Result<LoginRequest> {
        require(&self.username, "Username")?;
        require(&self.password, "Password")?;
        Ok(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// The login screen.
pub struct LoginView {
    session: Session,
    scope: ViewScope,
    /// Current field values
    pub form: LoginForm,
    /// A login request is in flight
    pub submitting: bool,
    /// Error line under the form
    pub error: Option<String>,
    /// Notice carried over from another screen (e.g. after registering)
    pub notice: Option<String>,
}

impl LoginView {
    /// Empty form.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            form: LoginForm::default(),
            submitting: false,
            error: None,
            notice: None,
        }
    }

    /// Show `notice` above the form.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Scope of this view's requests.
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// A signed-in user is sent straight to the dashboard.
    pub fn mount(&self) -> Effects {
        if self.session.snapshot().is_authenticated() {
            return Effects::navigate(Route::Dashboard);
        }
        Effects::none()
    }

    /// Label of the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Logging in..."
        } else {
            "Login"
        }
    }

    /// Log in; success navigates to the dashboard.
    pub async fn submit(&mut self) -> Effects {
        if self.submitting {
            return Effects::none();
        }
        self.error = None;

        let credentials = match self.form.validate() {
            Ok(credentials) => credentials,
            Err(e) => {
                self.error = e.detail().map(str::to_string);
                return Effects::none();
            }
        };

        self.submitting = true;
        let result = self.scope.run(self.session.login(&credentials)).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                info!(username = %credentials.username, "Logged in");
                self.form.password.clear();
                Effects::navigate(Route::Dashboard)
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                self.error = Some(detail_or(&e, LOGIN_ERROR));
                Effects::none()
            }
        }
    }

    /// Switch to the registration form.
    pub fn register(&self) -> Effects {
        Effects::navigate(Route::Register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_both_fields() {
        let form = LoginForm {
            username: "alice".into(),
            password: String::new(),
        };
        assert_eq!(form.validate().unwrap_err().detail(), Some("Password is required"));

        let form = LoginForm {
            username: "alice".into(),
            password: "secret".into(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "secret");
    }
}
