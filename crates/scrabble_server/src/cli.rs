//! Command-line interface for the scrabble server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scrabble server - persistent word game rules engine over HTTP
#[derive(Parser, Debug)]
#[command(name = "scrabble_server")]
#[command(about = "Word placement game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply database migrations and exit
    Migrate {
        /// Database file (overrides config and environment)
        #[arg(long)]
        database_url: Option<String>,
    },
}
