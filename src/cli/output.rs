//! Colored output helpers for the console
//!
//! Everything a command prints goes through [`Output`] so `--no-color`
//! switches the whole console to plain, script-friendly text.

use crate::types::{AppError, Result};
use crate::views::Confirm;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
    /// Answer yes to every confirmation prompt (`--yes`)
    pub assume_yes: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self {
            colored: true,
            assume_yes: false,
        }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self {
            colored: false,
            assume_yes: false,
        }
    }

    /// Skip confirmation prompts.
    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Print the console banner
    pub fn banner(&self) {
        let title = "Instabot Console";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {} {}",
                "◉".bright_magenta().bold(),
                title.bright_white().bold(),
                version.dimmed()
            );
            println!(
                "   {}\n",
                "Keyword auto-replies for Instagram".magenta()
            );
        } else {
            println!("\n   {} {}", title, version);
            println!("   Keyword auto-replies for Instagram\n");
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a blocking alert raised by a view
    pub fn alert(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "!".bright_red().bold(), message.bright_red().bold());
        } else {
            eprintln!("  [ALERT] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Prompt for confirmation (returns true if user confirms)
    ///
    /// Defaults to no; without a terminal to ask on, the answer is no.
    pub fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        dialoguer::Confirm::with_theme(self.theme().as_ref())
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    /// Read a password without echoing it
    pub fn password(&self, label: &str) -> Result<String> {
        dialoguer::Password::with_theme(self.theme().as_ref())
            .with_prompt(label)
            .interact()
            .map_err(|e| AppError::Terminal(format!("Failed to read {}: {}", label, e)))
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colored {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Print a table header row; each column is `(title, width)`
    pub fn table_header(&self, columns: &[(&str, usize)]) {
        let header = pad_row(columns.iter().copied());
        let rule_len: usize = columns.iter().map(|(_, w)| w + 1).sum();
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(rule_len).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(rule_len));
        }
    }

    /// Print a table row using the header's widths
    pub fn table_row(&self, columns: &[(&str, usize)]) {
        println!("    {}", pad_row(columns.iter().copied()));
    }
}

impl Confirm for Output {
    fn confirm(&self, message: &str) -> bool {
        Output::confirm(self, message)
    }
}

fn pad_row<'a>(columns: impl Iterator<Item = (&'a str, usize)>) -> String {
    columns
        .map(|(value, width)| format!("{:<width$}", truncate(value, width), width = width))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `value` to `width` characters, marking the cut with `…`.
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}
