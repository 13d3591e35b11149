use super::{detail_or, require, Effects, ViewScope};
use crate::app::routes::Route;
use crate::auth::session::Session;
use crate::types::{AppError, NewChatbot, Result};
use tracing::{info, warn};

const CREATE_ERROR: &str = "Failed to create chatbot";

/// Fields of the create-bot form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBotForm {
    /// Bot name (required)
    pub name: String,
    /// Instagram account id (required)
    pub instagram_account_id: String,
    /// Instagram username (optional)
    pub instagram_username: String,
    /// Page access token (required)
    pub access_token: String,
}

impl CreateBotForm {
    /// Required-field check; an empty optional username is omitted.
    pub fn validate(&self) -> Result<NewChatbot> {
        require(&self.name, "Bot name")?;
        require(&self.instagram_account_id, "Instagram account ID")?;
        require(&self.access_token, "Access token")?;

        Ok(NewChatbot {
            name: self.name.clone(),
            instagram_account_id: self.instagram_account_id.clone(),
            instagram_username: Some(self.instagram_username.clone()).filter(|u| !u.is_empty()),
            access_token: self.access_token.clone(),
        })
    }
}

/// The create-bot form screen.
pub struct CreateBotView {
    session: Session,
    scope: ViewScope,
    /// Current field values
    pub form: CreateBotForm,
    /// A create request is in flight; fields and submit are disabled
    pub submitting: bool,
    /// Error line under the form
    pub error: Option<String>,
}

impl CreateBotView {
    /// Empty form.
    pub fn new(session: Session) -> Self {
        Self::with_form(session, CreateBotForm::default())
    }

    /// Form pre-filled with `form`.
    pub fn with_form(session: Session, form: CreateBotForm) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            form,
            submitting: false,
            error: None,
        }
    }

    /// Scope of this view's requests.
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Whether inputs accept edits.
    pub fn fields_disabled(&self) -> bool {
        self.submitting
    }

    /// Label of the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Creating..."
        } else {
            "Create Chatbot"
        }
    }

    /// Validate and post the form; success navigates to the new bot.
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
        let result = self
            .scope
            .run(self.session.api().chatbots().create(&data))
            .await;
        self.submitting = false;

        match result {
            Ok(bot) => {
                info!(chatbot_id = bot.id, name = %bot.name, "Chatbot created");
                Effects::navigate(Route::BotDetail(bot.id))
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(error = %e, "Failed to create chatbot");
                self.error = Some(detail_or(&e, CREATE_ERROR));
                Effects::none()
            }
        }
    }

    /// Abandon the form.
    pub fn cancel(&self) -> Effects {
        self.scope.unmount();
        Effects::navigate(Route::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn filled() -> CreateBotForm {
        CreateBotForm {
            name: "Customer Support Bot".into(),
            instagram_account_id: "17841400123456789".into(),
            instagram_username: "mybusiness".into(),
            access_token: "EAAG...".into(),
        }
    }

    #[test]
    fn test_valid_form() {
        let data = filled().validate().expect("should validate");
        assert_eq!(data.instagram_username.as_deref(), Some("mybusiness"));
    }

    #[test]
    fn test_empty_username_is_omitted() {
        let form = CreateBotForm {
            instagram_username: String::new(),
            ..filled()
        };
        assert!(form.validate().unwrap().instagram_username.is_none());
    }

    #[rstest]
    #[case::name(CreateBotForm { name: String::new(), ..filled() }, "Bot name is required")]
    #[case::account(CreateBotForm { instagram_account_id: String::new(), ..filled() }, "Instagram account ID is required")]
    #[case::token(CreateBotForm { access_token: String::new(), ..filled() }, "Access token is required")]
    fn test_missing_required_field(#[case] form: CreateBotForm, #[case] message: &str) {
        let err = form.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.detail(), Some(message));
    }
}
