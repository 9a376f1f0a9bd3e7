//! Database persistence layer for players, games and move history.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{
    GameChanges, GameRecord, MoveRecord, NewGame, NewMove, NewPlayer, Player, SeatRecord,
};
pub use repository::{GameRepository, GameStore, MIGRATIONS};
