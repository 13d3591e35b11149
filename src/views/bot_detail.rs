use super::{require, Confirm, Effects, ViewScope};
use crate::app::routes::Route;
use crate::auth::session::Session;
use crate::types::{AppError, Chatbot, Keyword, KeywordUpdate, NewKeyword, Result};
use tracing::{info, warn};

const LOAD_ERROR: &str = "Failed to load bot data";
const ADD_ERROR: &str = "Failed to add keyword";
const UPDATE_ERROR: &str = "Failed to update keyword";
const DELETE_ERROR: &str = "Failed to delete keyword";
/// Prompt shown before deleting a keyword.
pub const DELETE_PROMPT: &str = "Delete this keyword?";

/// Keyword modal state. Add and edit never coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeywordModal {
    /// No modal
    #[default]
    Closed,
    /// Adding a new keyword
    Adding,
    /// Editing this keyword
    Editing(Keyword),
}

/// Form state shared by the add and edit modals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordForm {
    /// Text that triggers the reply
    pub trigger: String,
    /// Reply sent when the trigger matches
    pub response: String,
}

impl KeywordForm {
    fn validate(&self) -> Result<()> {
        require(&self.trigger, "Trigger")?;
        require(&self.response, "Response")
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One chatbot and its keyword rules.
pub struct BotDetailView {
    session: Session,
    scope: ViewScope,
    bot_id: i64,
    /// The chatbot, once loaded
    pub bot: Option<Chatbot>,
    /// Its keyword rules
    pub keywords: Vec<Keyword>,
    /// The initial load has not finished
    pub loading: bool,
    /// Which modal is open
    pub modal: KeywordModal,
    /// Fields of the open modal
    pub form: KeywordForm,
    /// Required-field message of the open modal
    pub form_error: Option<String>,
}

impl BotDetailView {
    /// Unmounted view of chatbot `bot_id`.
    pub fn new(session: Session, bot_id: i64) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            bot_id,
            bot: None,
            keywords: Vec::new(),
            loading: true,
            modal: KeywordModal::Closed,
            form: KeywordForm::default(),
            form_error: None,
        }
    }

    /// Identifier of the chatbot shown.
    pub fn bot_id(&self) -> i64 {
        self.bot_id
    }

    /// Scope of this view's requests.
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Load the bot and its keywords together.
    pub async fn mount(&mut self) -> Effects {
        self.refresh().await
    }

    /// Re-fetch both the bot and its keywords; either failing aborts to the dashboard.
    pub async fn refresh(&mut self) -> Effects {
        let id = self.bot_id;
        let chatbots = self.session.api().chatbots();
        let keywords = self.session.api().keywords();
        let result = self
            .scope
            .run(async { tokio::try_join!(chatbots.get(id), keywords.list_for_bot(id)) })
            .await;

        match result {
            Ok((bot, keywords)) => {
                self.bot = Some(bot);
                self.keywords = keywords;
                self.loading = false;
                Effects::none()
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(chatbot_id = id, error = %e, "Failed to load bot data");
                self.loading = false;
                Effects::alert(LOAD_ERROR).and_navigate(Route::Dashboard)
            }
        }
    }

    /// `✅ Active` / `❌ Inactive` for the loaded bot.
    pub fn status_label(&self) -> Option<&'static str> {
        self.bot.as_ref().map(|bot| {
            if bot.is_active {
                "✅ Active"
            } else {
                "❌ Inactive"
            }
        })
    }

    /// `@handle`, or `@N/A`.
    pub fn handle(&self) -> Option<String> {
        self.bot.as_ref().map(|bot| {
            format!(
                "@{}",
                bot.instagram_username
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .unwrap_or("N/A")
            )
        })
    }

    /// `closed -> adding`. Returns whether the modal opened.
    pub fn open_add(&mut self) -> bool {
        if self.modal != KeywordModal::Closed {
            return false;
        }
        self.form_error = None;
        self.modal = KeywordModal::Adding;
        true
    }

    /// `closed -> editing(keyword)`, pre-filling the form.
    pub fn open_edit(&mut self, keyword_id: i64) -> bool {
        if self.modal != KeywordModal::Closed {
            return false;
        }
        let Some(keyword) = self.keywords.iter().find(|k| k.id == keyword_id) else {
            return false;
        };
        self.form = KeywordForm {
            trigger: keyword.trigger.clone(),
            response: keyword.response.clone(),
        };
        self.form_error = None;
        self.modal = KeywordModal::Editing(keyword.clone());
        true
    }

    /// Close whichever modal is open and reset the form.
    pub fn cancel(&mut self) {
        self.modal = KeywordModal::Closed;
        self.form.clear();
        self.form_error = None;
    }

    /// Backdrop click: only the add modal closes this way.
    pub fn backdrop(&mut self) {
        if self.modal == KeywordModal::Adding {
            self.cancel();
        }
    }

    /// Submit the open modal; success closes it and re-fetches.
    pub async fn submit(&mut self) -> Effects {
        let editing = match &self.modal {
            KeywordModal::Closed => return Effects::none(),
            KeywordModal::Adding => None,
            KeywordModal::Editing(keyword) => Some(keyword.id),
        };

        if let Err(e) = self.form.validate() {
            self.form_error = e.detail().map(str::to_string);
            return Effects::none();
        }
        self.form_error = None;

        let (result, failure) = match editing {
            None => {
                let data = NewKeyword {
                    trigger: self.form.trigger.clone(),
                    response: self.form.response.clone(),
                    chatbot_id: self.bot_id,
                };
                let result = self
                    .scope
                    .run(self.session.api().keywords().create(&data))
                    .await;
                (result, ADD_ERROR)
            }
            Some(keyword_id) => {
                let data = KeywordUpdate {
                    trigger: Some(self.form.trigger.clone()),
                    response: Some(self.form.response.clone()),
                    is_active: None,
                };
                let result = self
                    .scope
                    .run(self.session.api().keywords().update(keyword_id, &data))
                    .await;
                (result, UPDATE_ERROR)
            }
        };

        match result {
            Ok(keyword) => {
                info!(keyword_id = keyword.id, trigger = %keyword.trigger, "Keyword saved");
                self.cancel();
                self.refresh().await
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(chatbot_id = self.bot_id, error = %e, "{}", failure);
                Effects::alert(failure)
            }
        }
    }

    /// Delete a keyword after confirmation, then re-fetch.
    pub async fn delete_keyword(&mut self, keyword_id: i64, confirm: &dyn Confirm) -> Effects {
        if !confirm.confirm(DELETE_PROMPT) {
            return Effects::none();
        }

        let result = self
            .scope
            .run(self.session.api().keywords().delete(keyword_id))
            .await;
        match result {
            Ok(()) => self.refresh().await,
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(keyword_id, error = %e, "Failed to delete keyword");
                Effects::alert(DELETE_ERROR)
            }
        }
    }

    /// Enable or disable a keyword, then re-fetch.
    pub async fn toggle_keyword(&mut self, keyword_id: i64) -> Effects {
        let Some(keyword) = self.keywords.iter().find(|k| k.id == keyword_id) else {
            return Effects::alert(UPDATE_ERROR);
        };
        let data = KeywordUpdate {
            is_active: Some(!keyword.is_active),
            ..Default::default()
        };

        let result = self
            .scope
            .run(self.session.api().keywords().update(keyword_id, &data))
            .await;
        match result {
            Ok(_) => self.refresh().await,
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(keyword_id, error = %e, "Failed to toggle keyword");
                Effects::alert(UPDATE_ERROR)
            }
        }
    }

    /// Leave for the dashboard.
    pub fn back(&self) -> Effects {
        self.scope.unmount();
        Effects::navigate(Route::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::auth::store::MemoryTokenStore;
    use crate::utils::config::ApiConfig;
    use std::sync::Arc;

    fn offline_view() -> BotDetailView {
        let api = ApiClient::new(
            &ApiConfig {
                base_url: "http://127.0.0.1:9/api".into(),
                timeout_secs: None,
            },
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap();
        let mut view = BotDetailView::new(Session::new(api), 7);
        view.keywords = vec![Keyword {
            id: 11,
            chatbot_id: 7,
            trigger: "cena".into(),
            response: "Prices start at 10 EUR".into(),
            is_active: true,
            created_at: None,
        }];
        view
    }

    #[test]
    fn test_add_modal_opens_from_closed() {
        let mut view = offline_view();
        assert!(view.open_add());
        assert_eq!(view.modal, KeywordModal::Adding);
    }

    #[test]
    fn test_edit_prefills_form() {
        let mut view = offline_view();
        assert!(view.open_edit(11));
        assert!(matches!(view.modal, KeywordModal::Editing(ref k) if k.id == 11));
        assert_eq!(view.form.trigger, "cena");
        assert_eq!(view.form.response, "Prices start at 10 EUR");
    }

    #[test]
    fn test_modals_are_mutually_exclusive() {
        let mut view = offline_view();
        assert!(view.open_add());
        assert!(!view.open_edit(11));
        assert_eq!(view.modal, KeywordModal::Adding);

        view.cancel();
        assert!(view.open_edit(11));
        assert!(!view.open_add());
        assert!(matches!(view.modal, KeywordModal::Editing(_)));
    }

    #[test]
    fn test_edit_unknown_keyword_stays_closed() {
        let mut view = offline_view();
        assert!(!view.open_edit(99));
        assert_eq!(view.modal, KeywordModal::Closed);
    }

    #[test]
    fn test_backdrop_closes_only_add_modal() {
        let mut view = offline_view();
        view.open_edit(11);
        view.backdrop();
        assert!(matches!(view.modal, KeywordModal::Editing(_)));

        view.cancel();
        view.open_add();
        view.form.trigger = "half typed".into();
        view.backdrop();
        assert_eq!(view.modal, KeywordModal::Closed);
        assert_eq!(view.form, KeywordForm::default());
    }

    #[tokio::test]
    async fn test_submit_with_empty_response_issues_no_request() {
        let mut view = offline_view();
        view.open_add();
        view.form.trigger = "hello".into();

        let fx = view.submit().await;

        assert!(fx.is_empty());
        assert_eq!(view.modal, KeywordModal::Adding);
        assert_eq!(view.form_error.as_deref(), Some("Response is required"));
    }

    #[tokio::test]
    async fn test_submit_while_closed_is_noop() {
        let mut view = offline_view();
        assert!(view.submit().await.is_empty());
    }
}
