//! Scrabble server - CLI entry point
//!
//! Serves the game over HTTP or applies database migrations.

#![warn(missing_docs)]

mod cli;

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use scrabble_rules::{Dictionary, WordList};
use scrabble_server::{AppState, GameRepository, GameService, ServerConfig, TracingNotifier, router};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Migrate { database_url } => run_migrate(database_url),
    }
}

/// Loads the config file if given, then environment overrides.
fn load_config(path: Option<std::path::PathBuf>) -> Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::from_file(&path)?,
        None => ServerConfig::default(),
    };
    Ok(config.apply_env())
}

/// Loads the word list, or an empty one when none is configured.
#[instrument(skip(config))]
fn load_dictionary(config: &ServerConfig) -> Result<Arc<dyn Dictionary>> {
    let Some(path) = &config.dictionary_path else {
        warn!("No dictionary configured; every word will be rejected");
        return Ok(Arc::new(WordList::default()));
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open dictionary {}", path.display()))?;
    let words = WordList::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
    Ok(Arc::new(words))
}

/// Run the HTTP game server
async fn run_server(
    config_path: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let repository = GameRepository::new(config.database_url.clone(), config.busy_timeout_ms)?;
    repository.run_migrations()?;

    let dictionary = load_dictionary(&config)?;
    let service = GameService::new(
        repository,
        dictionary,
        Arc::new(TracingNotifier),
        config.rng_seed,
    );
    let app = router(AppState::new(Arc::new(service)));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(host = %config.host, port = config.port, "Server ready");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Apply migrations and exit
fn run_migrate(database_url: Option<String>) -> Result<()> {
    let mut config = load_config(None)?;
    if let Some(url) = database_url {
        config.database_url = url;
    }
    let repository = GameRepository::new(config.database_url.clone(), config.busy_timeout_ms)?;
    repository.run_migrations()?;
    info!(database = %config.database_url, "Database is up to date");
    Ok(())
}
