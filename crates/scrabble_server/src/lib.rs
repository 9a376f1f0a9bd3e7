//! Scrabble server library - persistence, game service and HTTP surface
//!
//! Wraps the pure [`scrabble_rules`] engine with durable state. Every
//! turn-consuming action runs inside one SQLite write transaction, so
//! concurrent requests on a game serialize and a rejected action leaves no
//! trace.
//!
//! # Architecture
//!
//! - **Database**: diesel repository over players, games, seats and history
//! - **Service**: authorization, atomic transitions, settlement notices
//! - **HTTP**: axum routes mapping error kinds to status codes
//! - **Config**: TOML file with environment overrides
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scrabble_rules::WordList;
//! use scrabble_server::{GameRepository, GameService, TracingNotifier};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("scrabble.db".to_string(), 5000)?;
//! repository.run_migrations()?;
//!
//! let service = GameService::new(
//!     repository,
//!     Arc::new(WordList::from_words(["CHAT", "CHATS"])),
//!     Arc::new(TracingNotifier),
//!     None,
//! );
//! let _alice = service.register_player("alice")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod http;
mod notify;
mod service;

// Crate-level exports - Configuration
pub use config::{ConfigError, DATABASE_URL_ENV, DICTIONARY_ENV, ServerConfig};

// Crate-level exports - Database
pub use db::{
    DbError, GameChanges, GameRecord, GameRepository, GameStore, MIGRATIONS, MoveRecord, NewGame,
    NewMove, NewPlayer, Player, SeatRecord,
};

// Crate-level exports - Service
pub use service::{
    ErrorKind, ExchangeResult, GameDetails, GameError, GameService, GameSummary, MAX_OPPONENTS,
    MoveResult, MoveView, PassResult, SeatView, SimulationResult,
};

// Crate-level exports - Notifications
pub use notify::{Notifier, NotifyError, SettlementNotice, TracingNotifier, deliver, dispatch};

// Crate-level exports - HTTP
pub use http::{
    ApiError, AppState, Caller, CreateGameRequest, ErrorBody, MoveQuery, PLAYER_HEADER,
    RegisterPlayerRequest, RenameGameRequest, router,
};
