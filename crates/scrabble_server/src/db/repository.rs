//! Database repository for players, games, seats and move history.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, GameChanges, GameRecord, MoveRecord, NewGame, NewMove, NewPlayer, Player, SeatRecord,
    schema,
};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository.
///
/// Opens one connection per call. Mutating work goes through
/// [`GameRepository::transaction`], which takes SQLite's write lock before
/// the first read so read-modify-write cycles on a game never interleave.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
    busy_timeout_ms: u64,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// `busy_timeout_ms` bounds how long a connection waits for a competing
    /// writer before failing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String, busy_timeout_ms: u64) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, busy_timeout_ms, "Creating GameRepository");
        Ok(Self {
            db_path,
            busy_timeout_ms,
        })
    }

    /// Establishes a database connection with lock timeout and foreign keys
    /// enabled.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms))
            .execute(&mut conn)?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Runs `f` inside an immediate (write-locking) transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or a connection/lock failure converted into `E`.
    #[instrument(skip_all)]
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut GameStore<'_>) -> Result<T, E>,
        E: From<DbError> + From<diesel::result::Error>,
    {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| f(&mut GameStore { conn }))
    }

    /// Runs `f` inside a read transaction for a consistent snapshot.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or a connection failure converted into `E`.
    #[instrument(skip_all)]
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut GameStore<'_>) -> Result<T, E>,
        E: From<DbError> + From<diesel::result::Error>,
    {
        let mut conn = self.connection()?;
        conn.transaction(|conn| f(&mut GameStore { conn }))
    }

    /// Adds a player to the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the display name is already taken (with
    /// `unique_violation` set) or a database error occurs.
    #[instrument(skip(self))]
    pub fn create_player(&self, display_name: &str) -> Result<Player, DbError> {
        let mut conn = self.connection()?;
        GameStore { conn: &mut conn }.insert_player(display_name)
    }

    /// Looks a player up by display name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn player_by_name(&self, display_name: &str) -> Result<Option<Player>, DbError> {
        let mut conn = self.connection()?;
        GameStore { conn: &mut conn }.player_by_name(display_name)
    }
}

/// Table operations on a connection, usually one inside a transaction.
pub struct GameStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl std::fmt::Debug for GameStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStore").finish_non_exhaustive()
    }
}

impl GameStore<'_> {
    fn conn(&mut self) -> &mut SqliteConnection {
        self.conn
    }

    /// Inserts a player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on a duplicate name or database failure.
    #[instrument(skip(self))]
    pub fn insert_player(&mut self, display_name: &str) -> Result<Player, DbError> {
        let new_player = NewPlayer::new(display_name.to_string(), chrono::Utc::now().naive_utc());
        let player = diesel::insert_into(schema::players::table)
            .values(&new_player)
            .returning(Player::as_returning())
            .get_result(self.conn())?;
        info!(player_id = player.id(), display_name = %player.display_name(), "Player created");
        Ok(player)
    }

    /// Finds a player by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn player_by_id(&mut self, id: i64) -> Result<Option<Player>, DbError> {
        Ok(schema::players::table
            .find(id)
            .select(Player::as_select())
            .first(self.conn())
            .optional()?)
    }

    /// Finds a player by display name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn player_by_name(&mut self, display_name: &str) -> Result<Option<Player>, DbError> {
        let player = schema::players::table
            .filter(schema::players::display_name.eq(display_name))
            .select(Player::as_select())
            .first(self.conn())
            .optional()?;
        debug!(found = player.is_some(), "Player lookup");
        Ok(player)
    }

    /// Loads the given players, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn players_by_ids(&mut self, ids: &[i64]) -> Result<Vec<Player>, DbError> {
        Ok(schema::players::table
            .filter(schema::players::id.eq_any(ids))
            .select(Player::as_select())
            .load(self.conn())?)
    }

    /// Loads a game row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn game(&mut self, game_id: &str) -> Result<Option<GameRecord>, DbError> {
        Ok(schema::games::table
            .find(game_id)
            .select(GameRecord::as_select())
            .first(self.conn())
            .optional()?)
    }

    /// Inserts a game and its seats.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, game, seats), fields(game_id = %game.id(), seats = seats.len()))]
    pub fn insert_game(&mut self, game: &NewGame, seats: &[SeatRecord]) -> Result<(), DbError> {
        diesel::insert_into(schema::games::table)
            .values(game)
            .execute(self.conn())?;
        diesel::insert_into(schema::game_players::table)
            .values(seats)
            .execute(self.conn())?;
        info!("Game inserted");
        Ok(())
    }

    /// Seats of a game in turn order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn seats(&mut self, game_id: &str) -> Result<Vec<SeatRecord>, DbError> {
        Ok(schema::game_players::table
            .filter(schema::game_players::game_id.eq(game_id))
            .order(schema::game_players::position.asc())
            .select(SeatRecord::as_select())
            .load(self.conn())?)
    }

    /// Move history of a game in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn moves(&mut self, game_id: &str) -> Result<Vec<MoveRecord>, DbError> {
        Ok(schema::game_moves::table
            .filter(schema::game_moves::game_id.eq(game_id))
            .order(schema::game_moves::id.asc())
            .select(MoveRecord::as_select())
            .load(self.conn())?)
    }

    /// Appends a history entry.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, entry))]
    pub fn append_move(&mut self, entry: &NewMove) -> Result<(), DbError> {
        diesel::insert_into(schema::game_moves::table)
            .values(entry)
            .execute(self.conn())?;
        Ok(())
    }

    /// Writes back the mutable game columns.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the game is missing or a database error occurs.
    #[instrument(skip(self, changes))]
    pub fn update_game(&mut self, game_id: &str, changes: &GameChanges) -> Result<(), DbError> {
        let updated = diesel::update(schema::games::table.find(game_id))
            .set(changes)
            .execute(self.conn())?;
        if updated == 0 {
            return Err(DbError::new(format!("Game '{}' vanished during update", game_id)));
        }
        Ok(())
    }

    /// Writes back a seat's rack and score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn update_seat(
        &mut self,
        game_id: &str,
        player_id: i64,
        rack: &str,
        score: i32,
    ) -> Result<(), DbError> {
        diesel::update(schema::game_players::table.find((game_id, player_id)))
            .set((
                schema::game_players::rack.eq(rack),
                schema::game_players::score.eq(score),
            ))
            .execute(self.conn())?;
        Ok(())
    }

    /// Renames a game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn rename_game(&mut self, game_id: &str, name: &str) -> Result<(), DbError> {
        diesel::update(schema::games::table.find(game_id))
            .set((
                schema::games::name.eq(name),
                schema::games::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(self.conn())?;
        Ok(())
    }

    /// Deletes a game with its history and seats.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_game(&mut self, game_id: &str) -> Result<(), DbError> {
        let moves = diesel::delete(
            schema::game_moves::table.filter(schema::game_moves::game_id.eq(game_id)),
        )
        .execute(self.conn())?;
        let seats = diesel::delete(
            schema::game_players::table.filter(schema::game_players::game_id.eq(game_id)),
        )
        .execute(self.conn())?;
        diesel::delete(schema::games::table.find(game_id)).execute(self.conn())?;
        info!(moves, seats, "Game deleted");
        Ok(())
    }

    /// Ongoing games a player is seated in, each with its last play time.
    ///
    /// The last play time is the newest history entry, or the creation time
    /// for a game nobody has acted in. Most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn ongoing_games_for(
        &mut self,
        player_id: i64,
    ) -> Result<Vec<(GameRecord, NaiveDateTime)>, DbError> {
        let games: Vec<GameRecord> = schema::games::table
            .inner_join(schema::game_players::table)
            .filter(schema::game_players::player_id.eq(player_id))
            .filter(schema::games::status.eq("ongoing"))
            .select(GameRecord::as_select())
            .load(self.conn())?;

        let ids: Vec<&str> = games.iter().map(|g| g.id().as_str()).collect();
        let last_moves: HashMap<String, NaiveDateTime> = schema::game_moves::table
            .filter(schema::game_moves::game_id.eq_any(ids))
            .group_by(schema::game_moves::game_id)
            .select((
                schema::game_moves::game_id,
                max(schema::game_moves::created_at),
            ))
            .load::<(String, Option<NaiveDateTime>)>(self.conn())?
            .into_iter()
            .filter_map(|(id, at)| at.map(|at| (id, at)))
            .collect();

        let mut listed: Vec<(GameRecord, NaiveDateTime)> = games
            .into_iter()
            .map(|g| {
                let last_play = last_moves.get(g.id()).copied().unwrap_or(*g.created_at());
                (g, last_play)
            })
            .collect();
        listed.sort_by(|(a, a_at), (b, b_at)| {
            b_at.cmp(a_at).then_with(|| b.created_at().cmp(a.created_at()))
        });
        debug!(count = listed.len(), "Ongoing games loaded");
        Ok(listed)
    }
}
