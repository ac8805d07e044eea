mod cli;
mod config;
mod dashboard;
mod data;
mod prediction;
mod render;
mod scheduler;
mod storage;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use cli::{parse_form_command, Cli, Command, FormCommand, FORM_HELP};
use config::{Config, EnvConfig};
use dashboard::DashboardController;
use data::api::HttpApiClient;
use prediction::{PredictionController, PredictionForm};
use render::{Renderer, TerminalRenderer};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let env_config = EnvConfig::load()?;
    let mut config = Config::load_or_default(&env_config.config_path)?;
    config.apply_env(&env_config);
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    tracing::info!("API: {}", config.api.base_url);
    let api = Arc::new(HttpApiClient::new(config.api.base_url.clone(), config.api.timeout())?);
    let renderer = Arc::new(TerminalRenderer::new().mute(dashboard::controller::ids::CURRENT_TIME));

    match cli.command {
        Command::Dashboard { once } => {
            let refresh = config.dashboard.refresh_interval();
            let mut dashboard = DashboardController::new(api, renderer, config.dashboard);

            if once {
                let loaded = dashboard.load_initial_data().await;
                dashboard.shutdown();
                loaded?;
                return Ok(());
            }

            if let Err(e) = dashboard.start().await {
                tracing::warn!("Initial load incomplete: {}", e);
            }
            if dashboard.is_running() {
                tracing::info!("Refreshing every {:?}, Ctrl-C to stop", refresh);
            }

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down...");
            dashboard.shutdown();
        }

        Command::Predict { league, home, away, share } => {
            let store = storage::open(&config.storage.database_path)?;
            let mut predictor = PredictionController::new(api, renderer, store, config.prediction);
            predictor.start().await;

            let outcome = match (home, away) {
                (Some(home), Some(away)) => {
                    let outcome = predictor.predict(&PredictionForm::new(&league, &home, &away)).await;
                    if share {
                        predictor.share_prediction();
                    }
                    outcome.map(|_| ()).map_err(anyhow::Error::from)
                }
                _ => run_form(&mut predictor, league).await,
            };

            predictor.shutdown();
            outcome?;
        }

        Command::Teams => {
            let store = storage::open(&config.storage.database_path)?;
            let mut predictor = PredictionController::new(api, renderer, store, config.prediction);
            predictor.load_teams().await?;
            tracing::info!("{} teams available", predictor.teams().len());
        }

        Command::History => {
            let store = storage::open(&config.storage.database_path)?;
            let mut predictor = PredictionController::new(api, renderer, store, config.prediction);
            predictor.load_history();
            tracing::info!("{} stored predictions", predictor.history().len());
        }
    }

    Ok(())
}

/// Drive the prediction form from stdin until `quit` or end of input
async fn run_form<A, R>(predictor: &mut PredictionController<A, R>, mut league: String) -> Result<()>
where
    A: data::api::FootballApi,
    R: Renderer,
{
    println!("{}", FORM_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_form_command(&line) else {
            if !line.trim().is_empty() {
                println!("{}", FORM_HELP);
            }
            continue;
        };

        match command {
            FormCommand::Predict { home, away } => {
                // Failures are already shown by the controller
                let _ = predictor.predict(&PredictionForm::new(&league, &home, &away)).await;
                tracing::debug!("Last attempt: {:?}", predictor.last_outcome());
            }
            FormCommand::League(name) => league = name,
            FormCommand::Share => predictor.share_prediction(),
            FormCommand::Clear => predictor.clear_form(),
            FormCommand::New => predictor.new_prediction(),
            FormCommand::Teams => {
                if predictor.teams().is_empty() {
                    let _ = predictor.load_teams().await;
                } else {
                    println!("{}", predictor.teams().join(", "));
                }
            }
            FormCommand::History => predictor.load_history(),
            FormCommand::Status => println!(
                "league={:?} phase={:?} last={:?} history={}",
                league,
                predictor.phase(),
                predictor.last_outcome(),
                predictor.history().len()
            ),
            FormCommand::Help => println!("{}", FORM_HELP),
            FormCommand::Quit => break,
        }
    }

    Ok(())
}
