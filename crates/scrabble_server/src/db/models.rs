//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema;

/// Player directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: i64,
    display_name: String,
    created_at: NaiveDateTime,
}

/// Insertable player.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    display_name: String,
    created_at: NaiveDateTime,
}

/// A stored game.
///
/// `board` holds the JSON grid and `bag` the undrawn tiles as a string.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: String,
    name: String,
    created_by: i64,
    board: String,
    bag: String,
    current_turn: Option<i64>,
    pass_count: i32,
    status: String,
    winner_id: Option<i64>,
    ended_at: Option<NaiveDateTime>,
    rematch_of: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable game.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    id: String,
    name: String,
    created_by: i64,
    board: String,
    bag: String,
    current_turn: Option<i64>,
    status: String,
    rematch_of: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Mutable game state written back after every transition.
#[derive(Debug, Clone, AsChangeset, new)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct GameChanges {
    board: String,
    bag: String,
    current_turn: Option<i64>,
    pass_count: i32,
    status: String,
    winner_id: Option<i64>,
    ended_at: Option<NaiveDateTime>,
    updated_at: NaiveDateTime,
}

/// A seat: one player's rack, turn position and score in one game.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Getters, new)]
#[diesel(table_name = schema::game_players)]
pub struct SeatRecord {
    game_id: String,
    player_id: i64,
    rack: String,
    position: i32,
    score: i32,
}

/// A history entry: the JSON placement, `[]` for a pass.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_moves)]
pub struct MoveRecord {
    id: i64,
    game_id: String,
    player_id: i64,
    payload: String,
    created_at: NaiveDateTime,
}

/// Insertable history entry.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_moves)]
pub struct NewMove {
    game_id: String,
    player_id: i64,
    payload: String,
    created_at: NaiveDateTime,
}
