use super::{detail_or, require, Effects, ViewScope};
use crate::app::routes::Route;
use crate::auth::session::Session;
use crate::types::{AppError, RegisterRequest, Result};
use tracing::info;

const REGISTER_ERROR: &str = "Registration failed";
/// Shown on the login screen after a successful registration.
pub const REGISTERED_NOTICE: &str = "Registration successful! Please log in.";

/// Fields of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Desired username
    pub username: String,
    /// Contact email
    pub email: String,
    /// Account password
    pub password: String,
}

impl RegisterForm {
    fn validate(&self) -> Result<RegisterRequest> {
        require(&self.username, "Username")?;
        require(&self.email, "Email")?;
        if !self.email.contains('@') {
            return Err(AppError::Validation("Email is invalid".to_string()));
        }
        require(&self.password, "Password")?;
        Ok(RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

/// The registration screen.
pub struct RegisterView {
    session: Session,
    scope: ViewScope,
    /// Current field values
    pub form: RegisterForm,
    /// A register request is in flight
    pub submitting: bool,
    /// Error line under the form
    pub error: Option<String>,
    /// Set once the account exists
    pub notice: Option<String>,
}

impl RegisterView {
    /// Empty form.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            form: RegisterForm::default(),
            submitting: false,
            error: None,
            notice: None,
        }
    }

    /// Scope of this view's requests.
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Create the account; success sends the user to the login screen.
    ///
    /// Registering does not sign in.
    pub async fn submit(&mut self) -> Effects {
        if self.submitting {
            return Effects::none();
        }
        self.error = None;

        let data = match self.form.validate() {
            Ok(data) => data,
            Err(e) => {
                self.error = e.detail().map(str::to_string);
                return Effects::none();
            }
        };

        self.submitting = true;
        let result = self.scope.run(self.session.register(&data)).await;
        self.submitting = false;

        match result {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "Account registered");
                self.notice = Some(REGISTERED_NOTICE.to_string());
                self.form = RegisterForm::default();
                Effects::navigate(Route::Login)
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                self.error = Some(detail_or(&e, REGISTER_ERROR));
                Effects::none()
            }
        }
    }

    /// Back to the login form.
    pub fn login(&self) -> Effects {
        Effects::navigate(Route::Login)
    }
}
