use anyhow::Context;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use weather_core::{
    Config, WeatherClient, WeatherSession, config::load_dotenv, present,
};

use crate::repl;

/// Top-level CLI struct. Without a subcommand the interactive prompt starts.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for any city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key in the config file.
    Configure,

    /// Show current weather for a single city and exit.
    Show {
        /// City name, optionally "City,CountryCode".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => {
                let Some(mut session) = build_session()? else {
                    return Ok(ExitCode::FAILURE);
                };

                let result = session.lookup(&city).await;
                println!("{}", present::render(&result));
                Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            None => {
                let Some(mut session) = build_session()? else {
                    return Ok(ExitCode::FAILURE);
                };

                let stdin = std::io::stdin();
                let mut stdout = std::io::stdout();
                repl::run(&mut session, stdin.lock(), &mut stdout)
                    .await
                    .context("Console I/O failed")?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Resolve configuration once at startup.
///
/// `None` means the key is missing; the message has already been printed.
fn build_session() -> anyhow::Result<Option<WeatherSession>> {
    load_dotenv();
    let config = Config::load()?;

    let client_config = match config.client_config() {
        Ok(client_config) => client_config,
        Err(err) => {
            eprintln!("{}", present::error_message(&err));
            return Ok(None);
        }
    };

    tracing::debug!(endpoint = client_config.base_url(), "weather client configured");
    let client = WeatherClient::new(client_config)?;
    Ok(Some(WeatherSession::new(client)))
}

fn configure() -> anyhow::Result<ExitCode> {
    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        eprintln!("No key entered; configuration unchanged.");
        return Ok(ExitCode::FAILURE);
    }

    let mut config = Config::load()?;
    config.set_api_key(api_key.trim());
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(ExitCode::SUCCESS)
}
