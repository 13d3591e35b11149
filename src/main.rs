use anyhow::Context;
use instabot::app::{Console, Status};
use instabot::cli::output::Output;
use instabot::cli::Cli;
use instabot::utils::config::ConsoleConfig;
use instabot::utils::logging::initialize_tracing;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(cli, &out).await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            out.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, out: &Output) -> anyhow::Result<Status> {
    let explicit_config = cli.config.as_os_str() != "instabot.toml";
    let mut config = ConsoleConfig::from_env_and_file(&cli.config, explicit_config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate().context("Invalid --api-url")?;
    }

    initialize_tracing(&config.logging, cli.verbose);
    debug!(api = %config.api.base_url, token_path = %config.storage.token_path.display(), "Configuration loaded");

    let console_out = if out.colored {
        Output::new()
    } else {
        Output::no_color()
    };
    let console = Console::new(config, console_out).context("Failed to start console")?;

    tokio::select! {
        status = console.run(cli.command) => Ok(status?),
        _ = tokio::signal::ctrl_c() => {
            out.warning("Interrupted");
            Ok(Status::Failure)
        }
    }
}
