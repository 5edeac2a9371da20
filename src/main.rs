use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};

mod cli;
mod core;
mod daemon;
mod notifier;
mod providers;
#[cfg(test)]
mod testing;

use crate::core::credentials::Credentials;
use crate::core::models::PollCursor;
use crate::core::settings::Settings;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(author, version, about = "Telegram notifier for Yandex Practicum homework review status")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the API and send status changes to Telegram (default)
    Run {
        /// Unix timestamp to start polling from
        #[arg(long, default_value = "0")]
        from_date: i64,
    },

    /// Fetch once and print the latest homework status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Unix timestamp to query from
        #[arg(long, default_value = "0")]
        from_date: i64,
    },

    /// Validate credentials and settings
    CheckConfig,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

type DotenvResult = std::result::Result<Option<PathBuf>, dotenvy::Error>;

/// Settings and secrets, with logging installed from the settings.
fn load_config(
    config: Option<&Path>,
    dotenv: DotenvResult,
    log_to_file: bool,
) -> Result<(Settings, Credentials)> {
    let settings = Settings::load(config)?;

    if log_to_file {
        core::logging::init(&settings.logging)?;
    } else {
        core::logging::init_console();
    }

    match Settings::resolve_path(config) {
        Some(path) => tracing::debug!(?path, "Loaded config"),
        None => tracing::debug!("Config file not found, using defaults"),
    }
    match dotenv {
        Ok(Some(path)) => tracing::debug!(?path, "Loaded .env file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let credentials = Credentials::from_env().context("Cannot start without credentials")?;
    Ok((settings, credentials))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before logging, so RUST_LOG from .env reaches the filter.
    let dotenv = core::credentials::load_dotenv();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Run { from_date: 0 }) {
        Commands::Run { from_date } => {
            let (settings, credentials) = load_config(config, dotenv, true)?;
            daemon::run(&settings, &credentials, PollCursor::new(from_date)).await
        }
        Commands::Status { json, from_date } => {
            let (settings, credentials) = load_config(config, dotenv, false)?;
            cli::status::run(&settings, &credentials, json, PollCursor::new(from_date)).await
        }
        Commands::CheckConfig => {
            let (settings, credentials) = load_config(config, dotenv, false)?;
            cli::check_config::run(&settings, &credentials, config)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
