use super::{Confirm, Effects, ViewScope};
use crate::app::routes::Route;
use crate::auth::session::Session;
use crate::types::{AppError, Chatbot, ChatbotUpdate};
use tracing::warn;

const LOAD_ERROR: &str = "Failed to load chatbots";
const UPDATE_ERROR: &str = "Failed to update bot status";
const DELETE_ERROR: &str = "Failed to delete chatbot";
/// Prompt shown before deleting a chatbot.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this chatbot?";

/// Display-ready summary of one chatbot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCard {
    /// Chatbot id
    pub id: i64,
    /// Display name
    pub name: String,
    /// `● Active` or `○ Inactive`
    pub status: &'static str,
    /// `@handle`, or `@N/A` without one
    pub handle: String,
    /// Instagram business account id
    pub account_id: String,
    /// Creation date, `YYYY-MM-DD`
    pub created: String,
    /// Label of the toggle action
    pub toggle_label: &'static str,
}

impl From<&Chatbot> for BotCard {
    fn from(bot: &Chatbot) -> Self {
        let handle = bot
            .instagram_username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or("N/A");

        Self {
            id: bot.id,
            name: bot.name.clone(),
            status: if bot.is_active {
                "● Active"
            } else {
                "○ Inactive"
            },
            handle: format!("@{}", handle),
            account_id: bot.instagram_account_id.clone(),
            created: bot.created_at.format("%Y-%m-%d").to_string(),
            toggle_label: if bot.is_active {
                "Deactivate"
            } else {
                "Activate"
            },
        }
    }
}

/// Remove the chatbot with `id`; returns whether one was removed.
pub fn remove_chatbot(list: &mut Vec<Chatbot>, id: i64) -> bool {
    let before = list.len();
    list.retain(|bot| bot.id != id);
    list.len() != before
}

/// The chatbot list.
pub struct DashboardView {
    session: Session,
    scope: ViewScope,
    /// Chatbots as last fetched (or locally filtered after a delete)
    pub chatbots: Vec<Chatbot>,
    /// The initial fetch has not finished
    pub loading: bool,
    /// Visible error line
    pub error: Option<String>,
}

impl DashboardView {
    /// Unmounted view; call [`DashboardView::mount`] to load.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            chatbots: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Scope of this view's requests.
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch all chatbots of the session.
    pub async fn mount(&mut self) -> Effects {
        self.fetch_chatbots().await;
        Effects::none()
    }

    /// `Welcome, <username>` for the signed-in user.
    pub fn greeting(&self) -> Option<String> {
        self.session
            .user()
            .map(|user| format!("Welcome, {}", user.username))
    }

    /// One card per chatbot, in list order.
    pub fn cards(&self) -> Vec<BotCard> {
        self.chatbots.iter().map(BotCard::from).collect()
    }

    /// Flip the active flag, then re-fetch the whole list.
    pub async fn toggle_active(&mut self, id: i64) -> Effects {
        let Some(current) = self.chatbots.iter().find(|bot| bot.id == id) else {
            warn!(chatbot_id = id, "Toggle requested for a chatbot not in the list");
            return Effects::alert(UPDATE_ERROR);
        };
        let update = ChatbotUpdate::active(!current.is_active);

        let result = self
            .scope
            .run(self.session.api().chatbots().update(id, &update))
            .await;
        match result {
            Ok(_) => {
                self.fetch_chatbots().await;
                Effects::none()
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(chatbot_id = id, error = %e, "Failed to update bot status");
                Effects::alert(UPDATE_ERROR)
            }
        }
    }

    /// Delete after confirmation; on success the list is filtered locally.
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> Effects {
        if !confirm.confirm(DELETE_PROMPT) {
            return Effects::none();
        }

        let result = self
            .scope
            .run(self.session.api().chatbots().delete(id))
            .await;
        match result {
            Ok(()) => {
                remove_chatbot(&mut self.chatbots, id);
                Effects::none()
            }
            Err(AppError::Cancelled) => Effects::none(),
            Err(e) => {
                warn!(chatbot_id = id, error = %e, "Failed to delete chatbot");
                Effects::alert(DELETE_ERROR)
            }
        }
    }

    /// Go to the keyword editor of a chatbot.
    pub fn open(&self, id: i64) -> Effects {
        Effects::navigate(Route::BotDetail(id))
    }

    /// Go to the create-bot form.
    pub fn create(&self) -> Effects {
        Effects::navigate(Route::CreateBot)
    }

    /// End the session and return to the login screen.
    pub fn logout(&self) -> Effects {
        self.session.logout();
        self.scope.unmount();
        Effects::navigate(Route::Login)
    }

    async fn fetch_chatbots(&mut self) {
        let result = self.scope.run(self.session.api().chatbots().list()).await;
        match result {
            Ok(chatbots) => {
                self.chatbots = chatbots;
                self.error = None;
            }
            Err(AppError::Cancelled) => return,
            Err(e) => {
                warn!(error = %e, "Failed to load chatbots");
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
        self.loading = false;
    }
}
