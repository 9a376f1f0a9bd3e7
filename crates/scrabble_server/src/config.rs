//! Server configuration.

use std::path::{Path, PathBuf};

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ServerConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "SCRABBLE_DATABASE_URL";

/// Environment variable overriding [`ServerConfig::dictionary_path`].
pub const DICTIONARY_ENV: &str = "SCRABBLE_DICTIONARY";

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// SQLite database path.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Word list, one word per line. Without it every word is rejected.
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,

    /// How long a writer waits for the database lock, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Fixed seed for bag shuffles.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_database_url() -> String {
    "scrabble.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            host: default_host(),
            port: default_port(),
            dictionary_path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(database = %config.database_url, port = config.port, "Config loaded");
        Ok(config)
    }

    /// Applies environment overrides.
    #[instrument(skip(self))]
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            debug!(%url, "Database overridden from environment");
            self.database_url = url;
        }
        if let Ok(path) = std::env::var(DICTIONARY_ENV) {
            debug!(%path, "Dictionary overridden from environment");
            self.dictionary_path = Some(PathBuf::from(path));
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ServerConfig::from_toml("").expect("parse");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_partial_file() {
        let config = ServerConfig::from_toml(
            "port = 8080\ndictionary_path = \"ods.txt\"\nrng_seed = 9\n",
        )
        .expect("parse");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "scrabble.db");
        assert_eq!(config.dictionary_path, Some(PathBuf::from("ods.txt")));
        assert_eq!(config.rng_seed, Some(9));
    }

    #[test]
    fn test_bad_type_is_reported() {
        let err = ServerConfig::from_toml("port = \"high\"").expect_err("should fail");
        assert!(err.message.contains("Failed to parse config"));
    }
}
