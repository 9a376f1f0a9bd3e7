//! Payloads returned by the game service.

use chrono::NaiveDateTime;
use scrabble_rules::{Board, GameStatus, MoveOutcome, PlacedLetter, WordScore};
use serde::{Deserialize, Serialize};

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Points earned by the move.
    pub score: i32,
    /// Each new word with its value.
    pub words: Vec<WordScore>,
    /// Whether the full-rack bonus applied.
    pub bingo: bool,
    /// Mover's total.
    pub total_score: i32,
    /// Mover's rack after refill.
    pub rack: String,
    /// Player to act next.
    pub next_turn: Option<i64>,
    /// Whether the move ended the game.
    pub game_over: bool,
    /// Winner, once the game is over.
    pub winner: Option<i64>,
}

impl From<&MoveOutcome> for MoveResult {
    fn from(outcome: &MoveOutcome) -> Self {
        Self {
            score: *outcome.score().total(),
            words: outcome.score().words().clone(),
            bingo: *outcome.score().bingo(),
            total_score: *outcome.total_score(),
            rack: outcome.rack().letters(),
            next_turn: *outcome.next_turn(),
            game_over: outcome.game_over(),
            winner: outcome.winner(),
        }
    }
}

/// Result of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassResult {
    /// Player to act next.
    pub next_turn: Option<i64>,
    /// Whether the pass ended the game.
    pub game_over: bool,
    /// Winner, once the game is over.
    pub winner: Option<i64>,
}

/// Result of a rack exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    /// The fresh rack.
    pub rack: String,
    /// Player to act next.
    pub next_turn: Option<i64>,
}

/// Result of a score simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Points the placement would earn.
    pub score: i32,
}

/// A seat as seen by any player of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    /// Player holding the seat.
    pub player_id: i64,
    /// The player's display name.
    pub display_name: String,
    /// Turn order, from 0.
    pub position: i32,
    /// Current score.
    pub score: i32,
    /// Number of tiles in hand; the tiles stay private.
    pub rack_size: usize,
}

/// One history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveView {
    /// Acting player.
    pub player_id: i64,
    /// Tiles placed; empty for a pass.
    pub letters: Vec<PlacedLetter>,
    /// When the entry was recorded.
    pub created_at: NaiveDateTime,
}

/// Full state of a game for one of its players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    /// Game id.
    pub id: String,
    /// Game name.
    pub name: String,
    /// Creator's player id.
    pub created_by: i64,
    /// Placed tiles.
    pub board: Board,
    /// The caller's own rack.
    pub rack: String,
    /// Seats in turn order.
    pub players: Vec<SeatView>,
    /// History, oldest first.
    pub moves: Vec<MoveView>,
    /// Player to act, `None` once ended.
    pub current_turn: Option<i64>,
    /// Lifecycle state.
    pub status: GameStatus,
    /// Tiles left in the bag.
    pub remaining_letters: usize,
    /// Winner, once ended.
    pub winner: Option<i64>,
    /// End time, once ended.
    pub ended_at: Option<NaiveDateTime>,
    /// Game this one is a rematch of.
    pub rematch_of: Option<String>,
    /// Creation time.
    pub created_at: NaiveDateTime,
}

/// One line of a player's game list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Game id.
    pub id: String,
    /// Game name.
    pub name: String,
    /// Player to act.
    pub current_turn: Option<i64>,
    /// Whether the caller is to act.
    pub your_turn: bool,
    /// Whether the caller created the game.
    pub is_your_game: bool,
    /// Time of the latest move or pass, else the creation time.
    pub last_play_time: NaiveDateTime,
}
