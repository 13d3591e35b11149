//! Console shell
//!
//! [`Console`] wires configuration, token storage, the API client and the
//! session together, then drives the view models for each command. Every
//! protected command goes through the same gate as the browser console:
//!
//! ```text
//! check_auth() ──► resolve(route, snapshot) ──► Render   ──► mount view, run action
//!                                          └──► Redirect ──► "not logged in", exit 1
//! ```

/// Route table and resolution.
pub mod routes;

use crate::api::ApiClient;
use crate::auth::session::{AuthState, Session, SessionSnapshot};
use crate::auth::store::{FileTokenStore, TokenStore};
use crate::cli::output::Output;
use crate::cli::{BotCommands, Commands, KeywordCommands};
use crate::types::{Keyword, Result};
use crate::utils::config::ConsoleConfig;
use crate::views::{
    BotDetailView, CreateBotForm, CreateBotView, DashboardView, Effects, LoginView, RegisterView,
};
use routes::{resolve, Resolution, Route};
use std::sync::Arc;
use tracing::debug;

/// How a command ended; mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Exit code 0
    Success,
    /// Exit code 1
    Failure,
}

impl Status {
    /// `0` or `1`.
    pub fn exit_code(self) -> std::process::ExitCode {
        match self {
            Status::Success => std::process::ExitCode::SUCCESS,
            Status::Failure => std::process::ExitCode::FAILURE,
        }
    }
}

/// The terminal console.
pub struct Console {
    config: ConsoleConfig,
    session: Session,
    out: Output,
}

impl Console {
    /// Build the console from an effective configuration.
    pub fn new(config: ConsoleConfig, out: Output) -> Result<Self> {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.storage.token_path.clone()));
        let api = ApiClient::new(&config.api, tokens)?;
        Ok(Self::with_session(config, Session::new(api), out))
    }

    /// Console over an existing session.
    pub fn with_session(config: ConsoleConfig, session: Session, out: Output) -> Self {
        Self {
            config,
            session,
            out,
        }
    }

    /// The console's session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Execute one command. Errors are reserved for local failures
    /// (storage, configuration); backend failures are reported and end in
    /// [`Status::Failure`].
    pub async fn run(&self, command: Option<Commands>) -> Result<Status> {
        let Some(command) = command else {
            self.out.banner();
            self.out.hint("Run `instabot --help` to see the available commands");
            return Ok(Status::Success);
        };

        match command {
            Commands::Login { username, password } => {
                let password = match password {
                    Some(password) => password,
                    None => self.out.password("Password")?,
                };
                Ok(self.login(username, password).await)
            }
            Commands::Register {
                username,
                email,
                password,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => self.out.password("Password")?,
                };
                Ok(self.register(username, email, password).await)
            }
            Commands::Logout => {
                self.session.logout();
                self.out.success("Logged out");
                Ok(Status::Success)
            }
            Commands::Whoami => Ok(self.whoami().await),
            Commands::Bots(cmd) => Ok(self.bots(cmd).await),
            Commands::Keywords(cmd) => Ok(self.keywords(cmd).await),
            Commands::Config { full } => {
                self.show_config(full);
                Ok(Status::Success)
            }
        }
    }

    // ============= Session commands =============

    async fn login(&self, username: String, password: String) -> Status {
        self.session.check_auth().await;

        let mut view = LoginView::new(self.session.clone());
        if view.mount().navigate == Some(Route::Dashboard) {
            if let Some(user) = self.session.user() {
                self.out
                    .info(&format!("Already logged in as {}", user.username));
                self.out.hint("Run `instabot logout` first to switch accounts");
            }
            return Status::Success;
        }

        view.form.username = username;
        view.form.password = password;
        let fx = view.submit().await;

        match fx.navigate {
            Some(Route::Dashboard) => {
                match self.session.user() {
                    Some(user) => self.out.success(&format!("Welcome, {}", user.username)),
                    None => self
                        .out
                        .warning("Logged in, but the session could not be verified yet"),
                }
                Status::Success
            }
            _ => {
                self.report_error(view.error.as_deref());
                Status::Failure
            }
        }
    }

    async fn register(&self, username: String, email: String, password: String) -> Status {
        let mut view = RegisterView::new(self.session.clone());
        view.form.username = username.clone();
        view.form.email = email;
        view.form.password = password;

        let fx = view.submit().await;
        if fx.navigate == Some(Route::Login) {
            if let Some(notice) = view.notice.as_deref() {
                self.out.success(notice);
            }
            self.out
                .command(&format!("instabot login --username {}", username));
            return Status::Success;
        }
        self.report_error(view.error.as_deref());
        Status::Failure
    }

    async fn whoami(&self) -> Status {
        if !self.enter(Route::Dashboard).await {
            return Status::Failure;
        }
        let view = DashboardView::new(self.session.clone());
        let Some(user) = self.session.user() else {
            return Status::Failure;
        };

        if let Some(greeting) = view.greeting() {
            self.out.header(&greeting);
        }
        self.out.kv("ID", &user.id.to_string());
        self.out.kv("Username", &user.username);
        if let Some(email) = user.email.as_deref() {
            self.out.kv("Email", email);
        }
        if let Some(created) = user.created_at {
            self.out
                .kv("Member since", &created.format("%Y-%m-%d").to_string());
        }
        Status::Success
    }

    // ============= Chatbot commands =============

    async fn bots(&self, cmd: BotCommands) -> Status {
        match cmd {
            BotCommands::List => {
                let Some(view) = self.dashboard().await else {
                    return Status::Failure;
                };
                self.print_bots(&view);
                Status::Success
            }
            BotCommands::Show { id } => {
                let Some(view) = self.bot_detail(id).await else {
                    return Status::Failure;
                };
                self.print_bot(&view);
                self.print_keywords(&view.keywords);
                Status::Success
            }
            BotCommands::Create {
                name,
                account_id,
                username,
                access_token,
            } => {
                if !self.enter(Route::CreateBot).await {
                    return Status::Failure;
                }
                let form = CreateBotForm {
                    name,
                    instagram_account_id: account_id,
                    instagram_username: username.unwrap_or_default(),
                    access_token,
                };
                let mut view = CreateBotView::with_form(self.session.clone(), form);
                match view.submit().await.navigate {
                    Some(Route::BotDetail(id)) => {
                        self.out.success(&format!("Chatbot created (id {})", id));
                        self.out.command(&format!("instabot keywords add {} -t <trigger> -r <response>", id));
                        Status::Success
                    }
                    _ => {
                        self.report_error(view.error.as_deref());
                        Status::Failure
                    }
                }
            }
            BotCommands::Toggle { id } => {
                let Some(mut view) = self.dashboard().await else {
                    return Status::Failure;
                };
                let fx = view.toggle_active(id).await;
                if self.apply(&fx) == Status::Failure {
                    return Status::Failure;
                }
                if view.error.is_some() {
                    return self.report_load_error(&view);
                }
                match view.cards().into_iter().find(|card| card.id == id) {
                    Some(card) => {
                        self.out
                            .success(&format!("{} is now {}", card.name, card.status));
                        Status::Success
                    }
                    None => self.report_load_error(&view),
                }
            }
            BotCommands::Delete { id, yes } => {
                let Some(mut view) = self.dashboard().await else {
                    return Status::Failure;
                };
                if !view.chatbots.iter().any(|bot| bot.id == id) {
                    self.out.error(&format!("Chatbot {} not found", id));
                    return Status::Failure;
                }
                let confirm = self.prompter(yes);
                let fx = view.delete(id, &confirm).await;
                if self.apply(&fx) == Status::Failure {
                    return Status::Failure;
                }
                if view.chatbots.iter().any(|bot| bot.id == id) {
                    self.out.info("Cancelled");
                } else {
                    self.out.success(&format!("Chatbot {} deleted", id));
                }
                Status::Success
            }
        }
    }

    // ============= Keyword commands =============

    async fn keywords(&self, cmd: KeywordCommands) -> Status {
        match cmd {
            KeywordCommands::List { bot } => {
                let Some(view) = self.bot_detail(bot).await else {
                    return Status::Failure;
                };
                self.print_keywords(&view.keywords);
                Status::Success
            }
            KeywordCommands::Add {
                bot,
                trigger,
                response,
            } => {
                let Some(mut view) = self.bot_detail(bot).await else {
                    return Status::Failure;
                };
                view.open_add();
                view.form.trigger = trigger;
                view.form.response = response;
                self.save_keyword(&mut view, "Keyword added").await
            }
            KeywordCommands::Edit {
                bot,
                id,
                trigger,
                response,
            } => {
                let Some(mut view) = self.bot_detail(bot).await else {
                    return Status::Failure;
                };
                if !view.open_edit(id) {
                    self.out
                        .error(&format!("Keyword {} not found on chatbot {}", id, bot));
                    return Status::Failure;
                }
                if let Some(trigger) = trigger {
                    view.form.trigger = trigger;
                }
                if let Some(response) = response {
                    view.form.response = response;
                }
                self.save_keyword(&mut view, "Keyword updated").await
            }
            KeywordCommands::Toggle { bot, id } => {
                let Some(mut view) = self.bot_detail(bot).await else {
                    return Status::Failure;
                };
                if !view.keywords.iter().any(|k| k.id == id) {
                    self.out
                        .error(&format!("Keyword {} not found on chatbot {}", id, bot));
                    return Status::Failure;
                }
                let fx = view.toggle_keyword(id).await;
                if self.apply(&fx) == Status::Failure {
                    return Status::Failure;
                }
                if let Some(keyword) = view.keywords.iter().find(|k| k.id == id) {
                    let state = if keyword.is_active { "enabled" } else { "disabled" };
                    self.out
                        .success(&format!("Keyword '{}' {}", keyword.trigger, state));
                }
                Status::Success
            }
            KeywordCommands::Delete { bot, id, yes } => {
                let Some(mut view) = self.bot_detail(bot).await else {
                    return Status::Failure;
                };
                if !view.keywords.iter().any(|k| k.id == id) {
                    self.out
                        .error(&format!("Keyword {} not found on chatbot {}", id, bot));
                    return Status::Failure;
                }
                let confirm = self.prompter(yes);
                let fx = view.delete_keyword(id, &confirm).await;
                if self.apply(&fx) == Status::Failure {
                    return Status::Failure;
                }
                if view.keywords.iter().any(|k| k.id == id) {
                    self.out.info("Cancelled");
                } else {
                    self.out.success(&format!("Keyword {} deleted", id));
                }
                Status::Success
            }
        }
    }

    async fn save_keyword(&self, view: &mut BotDetailView, done: &str) -> Status {
        let fx = view.submit().await;
        if let Some(message) = view.form_error.as_deref() {
            self.out.error(message);
            return Status::Failure;
        }
        if self.apply(&fx) == Status::Failure {
            return Status::Failure;
        }
        self.out.success(done);
        self.print_keywords(&view.keywords);
        Status::Success
    }

    // ============= Navigation =============

    /// Run the session check and guard `route`. Prints why on refusal.
    async fn enter(&self, route: Route) -> bool {
        let snapshot = self.session.check_auth().await;
        match resolve(&route.path(), &snapshot) {
            Resolution::Render(_) => true,
            Resolution::Redirect(to) => {
                debug!(from = %route, to = %to, "Guard redirected");
                self.report_signed_out(&snapshot);
                false
            }
            Resolution::Pending => {
                self.out.error("Session check did not complete");
                false
            }
            Resolution::NotFound => {
                self.out.error(&format!("No such screen: {}", route));
                false
            }
        }
    }

    async fn dashboard(&self) -> Option<DashboardView> {
        if !self.enter(Route::Dashboard).await {
            return None;
        }
        let mut view = DashboardView::new(self.session.clone());
        view.mount().await;
        if view.error.is_some() {
            self.report_load_error(&view);
            return None;
        }
        Some(view)
    }

    async fn bot_detail(&self, id: i64) -> Option<BotDetailView> {
        if !self.enter(Route::BotDetail(id)).await {
            return None;
        }
        let mut view = BotDetailView::new(self.session.clone(), id);
        let fx = view.mount().await;
        if self.apply(&fx) == Status::Failure {
            return None;
        }
        Some(view)
    }

    /// Render an action's effects. An alert means the action failed.
    fn apply(&self, fx: &Effects) -> Status {
        if let Some(alert) = fx.alert.as_deref() {
            self.out.alert(alert);
            return Status::Failure;
        }
        if let Some(route) = fx.navigate {
            debug!(%route, "View requested navigation");
        }
        Status::Success
    }

    // ============= Rendering =============

    fn print_bots(&self, view: &DashboardView) {
        if let Some(greeting) = view.greeting() {
            self.out.header(&greeting);
        }
        let cards = view.cards();
        if cards.is_empty() {
            self.out.info("No chatbots yet");
            self.out
                .command("instabot bots create -n <name> -a <account-id> -t <access-token>");
            return;
        }

        self.out.table_header(&[
            ("ID", 6),
            ("Name", 24),
            ("Status", 10),
            ("Instagram", 20),
            ("Created", 10),
        ]);
        for card in &cards {
            let id = card.id.to_string();
            self.out.table_row(&[
                (id.as_str(), 6),
                (card.name.as_str(), 24),
                (card.status, 10),
                (card.handle.as_str(), 20),
                (card.created.as_str(), 10),
            ]);
        }
    }

    fn print_bot(&self, view: &BotDetailView) {
        let Some(bot) = view.bot.as_ref() else {
            return;
        };
        self.out.header(&bot.name);
        if let Some(status) = view.status_label() {
            self.out.kv("Status", status);
        }
        if let Some(handle) = view.handle() {
            self.out.kv("Instagram", &handle);
        }
        self.out.kv("Account ID", &bot.instagram_account_id);
        self.out
            .kv("Created", &bot.created_at.format("%Y-%m-%d %H:%M").to_string());
    }

    fn print_keywords(&self, keywords: &[Keyword]) {
        self.out.subheader("Keywords");
        if keywords.is_empty() {
            self.out.info("No keywords yet");
            return;
        }
        self.out
            .table_header(&[("ID", 6), ("Trigger", 20), ("Response", 40), ("Active", 6)]);
        for keyword in keywords {
            let id = keyword.id.to_string();
            self.out.table_row(&[
                (id.as_str(), 6),
                (keyword.trigger.as_str(), 20),
                (keyword.response.as_str(), 40),
                (if keyword.is_active { "yes" } else { "no" }, 6),
            ]);
        }
    }

    fn show_config(&self, full: bool) {
        self.out.header("Configuration");
        self.out.kv("API URL", &self.config.api.base_url);
        self.out
            .kv("Token file", &self.config.storage.token_path.display().to_string());
        if !full {
            return;
        }
        self.out.kv(
            "Timeout",
            &self
                .config
                .api
                .timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "none".to_string()),
        );
        self.out.kv("Log level", &self.config.logging.level);
        self.out
            .kv("Log format", &format!("{:?}", self.config.logging.format).to_lowercase());
        let stored = match self.session.api().token_store().load() {
            Ok(Some(_)) => "yes",
            Ok(None) => "no",
            Err(_) => "unreadable",
        };
        self.out.kv("Token stored", stored);
    }

    fn report_signed_out(&self, snapshot: &SessionSnapshot) {
        match &snapshot.state {
            AuthState::Expired => self.out.error("Session expired, please log in again"),
            AuthState::Unreachable(reason) => self
                .out
                .error(&format!("Could not verify the session: {}", reason)),
            _ => self.out.error("Not logged in"),
        }
        self.out.command("instabot login --username <username>");
    }

    fn report_load_error(&self, view: &DashboardView) -> Status {
        self.report_error(view.error.as_deref());
        Status::Failure
    }

    fn report_error(&self, message: Option<&str>) {
        self.out.error(message.unwrap_or("Request failed"));
    }

    fn prompter(&self, assume_yes: bool) -> Output {
        let out = if self.out.colored {
            Output::new()
        } else {
            Output::no_color()
        };
        out.with_assume_yes(assume_yes)
    }
}
