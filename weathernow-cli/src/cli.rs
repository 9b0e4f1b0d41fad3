use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::Text;
use std::path::PathBuf;
use weathernow_core::{Config, PlaceQuery, SearchPipeline, SearchState};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weathernow",
    version,
    about = "Current weather and the next 24 hours for any city"
)]
pub struct Cli {
    /// Log request flow to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a subcommand, starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a city.
    Show {
        /// City name; defaults to the most recent search.
        place: Option<String>,
    },

    /// List recent searches, newest first.
    Recent,

    /// Edit endpoints, request timeout and history location.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        tracing::debug!(?config, "loaded configuration");

        match self.command {
            None => {
                let pipeline = SearchPipeline::from_config(&config)?;
                session::run(&pipeline).await
            }
            Some(Command::Show { place }) => {
                let pipeline = SearchPipeline::from_config(&config)?;
                let state = match place {
                    Some(place) => {
                        let query = PlaceQuery::new(&place)
                            .ok_or_else(|| anyhow!("City name must not be empty"))?;
                        pipeline.search(&query).await
                    }
                    None => pipeline.start().await.ok_or_else(|| {
                        anyhow!(
                            "No recent searches yet.\n\
                             Hint: run `weathernow show <city>` first."
                        )
                    })?,
                };
                // main prints the returned error
                if let SearchState::Error(message) = &state {
                    return Err(anyhow!(message.clone()));
                }
                print!("{}", render::state(&state));
                Ok(())
            }
            Some(Command::Recent) => {
                let pipeline = SearchPipeline::from_config(&config)?;
                print!("{}", render::recent(&pipeline.recent()));
                Ok(())
            }
            Some(Command::Configure) => configure(config),
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    config.geocoding_url = Text::new("Geocoding URL:")
        .with_default(&config.geocoding_url)
        .prompt()?;

    config.forecast_url = Text::new("Forecast URL:")
        .with_default(&config.forecast_url)
        .prompt()?;

    let timeout = config.request_timeout_secs.map(|s| s.to_string()).unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds (empty for none):")
        .with_default(&timeout)
        .prompt()?;
    config.request_timeout_secs = parse_timeout(&timeout)?;

    let history = config.history_file_path()?;
    let history = Text::new("Recent searches file:")
        .with_default(&history.display().to_string())
        .prompt()?;
    config.history_file = Some(PathBuf::from(history.trim()));

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_timeout(input: &str) -> anyhow::Result<Option<u64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let secs = input
        .parse::<u64>()
        .with_context(|| format!("Invalid timeout '{input}': expected whole seconds"))?;
    Ok(Some(secs))
}
