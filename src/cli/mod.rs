//! CLI module for the Instabot console
//!
//! Provides command-line interface parsing for the `instabot` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

/// Terminal output and prompts.
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Instabot - console for the Instagram auto-reply platform
///
/// Sign in, manage chatbots linked to Instagram business accounts and edit
/// the keyword rules they answer with.
#[derive(Parser, Debug)]
#[command(
    name = "instabot",
    version,
    about = "Instabot - console for the Instagram auto-reply platform",
    long_about = "Sign in to the Instagram chatbot platform, manage chatbots linked to\n\
                  Instagram business accounts, and edit the keyword rules they reply with.",
    after_help = "EXAMPLES:\n    \
                  instabot login -u alice                       # Sign in (password from INSTABOT_PASSWORD or prompt)\n    \
                  instabot bots list                            # List your chatbots\n    \
                  instabot keywords add 7 -t hello -r 'hi there!'  # Add a keyword rule to bot 7\n    \
                  instabot --api-url http://localhost:8000/api whoami"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "instabot.toml", global = true)]
    pub config: PathBuf,

    /// Backend base URL (overrides config and INSTABOT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "INSTABOT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account (does not sign in)
    Register {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "INSTABOT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage chatbots
    #[command(subcommand)]
    Bots(BotCommands),

    /// Manage keyword rules of a chatbot
    #[command(subcommand)]
    Keywords(KeywordCommands),

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,
    },
}

/// Chatbot subcommands
#[derive(Subcommand, Debug)]
pub enum BotCommands {
    /// List all chatbots
    List,

    /// Show one chatbot with its keywords
    Show {
        /// Chatbot id
        id: i64,
    },

    /// Link a new chatbot to an Instagram business account
    Create {
        /// Bot name
        #[arg(short, long)]
        name: String,

        /// Instagram business account id
        #[arg(short = 'a', long)]
        account_id: String,

        /// Instagram username (without @)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Page access token
        #[arg(short = 't', long, env = "INSTABOT_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },

    /// Activate or deactivate a chatbot
    Toggle {
        /// Chatbot id
        id: i64,
    },

    /// Delete a chatbot
    Delete {
        /// Chatbot id
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Keyword subcommands
#[derive(Subcommand, Debug)]
pub enum KeywordCommands {
    /// List the keywords of a chatbot
    List {
        /// Chatbot id
        bot: i64,
    },

    /// Add a keyword rule
    Add {
        /// Chatbot id
        bot: i64,

        /// Text that triggers the reply
        #[arg(short, long)]
        trigger: String,

        /// Reply sent when the trigger matches
        #[arg(short, long)]
        response: String,
    },

    /// Change the trigger and/or response of a keyword
    Edit {
        /// Chatbot id
        bot: i64,

        /// Keyword id
        id: i64,

        /// New trigger
        #[arg(short, long)]
        trigger: Option<String>,

        /// New response
        #[arg(short, long)]
        response: Option<String>,
    },

    /// Enable or disable a keyword
    Toggle {
        /// Chatbot id
        bot: i64,

        /// Keyword id
        id: i64,
    },

    /// Delete a keyword
    Delete {
        /// Chatbot id
        bot: i64,

        /// Keyword id
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
