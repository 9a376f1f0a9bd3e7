//! Game service: authorization, atomic transitions and notifications.

mod error;
mod views;

pub use error::{ErrorKind, GameError};
pub use views::{
    ExchangeResult, GameDetails, GameSummary, MoveResult, MoveView, PassResult, SeatView,
    SimulationResult,
};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use scrabble_rules::{
    Bag, BlankPolicy, Board, Dictionary, Game, GameStatus, PlacedLetter, Rack, Seat, TurnState,
    blank_cells,
};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, GameChanges, GameRecord, GameRepository, GameStore, MoveRecord, NewGame, NewMove,
    Player, SeatRecord,
};
use crate::notify::{self, Notifier, SettlementNotice};

/// Most opponents a creator may invite.
pub const MAX_OPPONENTS: usize = 3;

/// Service layer for game operations.
///
/// Every state change runs in one immediate transaction on the repository:
/// the stored game is loaded into a [`Game`], the action is applied in
/// memory, and the new state is written back before commit. A rejected
/// action rolls back with nothing written.
pub struct GameService {
    repository: GameRepository,
    dictionary: Arc<dyn Dictionary>,
    notifier: Arc<dyn Notifier>,
    rng: Mutex<ChaCha20Rng>,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

/// A stored game with its rows and the rebuilt aggregate.
struct LoadedGame {
    record: GameRecord,
    seats: Vec<SeatRecord>,
    moves: Vec<MoveRecord>,
    history: Vec<Vec<PlacedLetter>>,
    game: Game,
}

impl GameService {
    /// Creates a service. Without `seed` the bag shuffles are seeded from
    /// the thread RNG.
    #[instrument(skip(repository, dictionary, notifier))]
    pub fn new(
        repository: GameRepository,
        dictionary: Arc<dyn Dictionary>,
        notifier: Arc<dyn Notifier>,
        seed: Option<u64>,
    ) -> Self {
        info!(seeded = seed.is_some(), "Creating GameService");
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            repository,
            dictionary,
            notifier,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Adds a player to the directory.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidRequest`] for a blank name,
    /// [`GameError::NameTaken`] if the name is in use.
    #[instrument(skip(self))]
    pub fn register_player(&self, display_name: &str) -> Result<Player, GameError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidRequest("display name is empty".into()));
        }
        self.repository.create_player(name).map_err(|e| {
            if e.unique_violation {
                GameError::NameTaken(name.to_string())
            } else {
                GameError::Storage(e)
            }
        })
    }

    /// Looks a player up by display name.
    ///
    /// # Errors
    ///
    /// [`GameError::PlayerNotFound`] if nobody has that name.
    #[instrument(skip(self))]
    pub fn player_by_name(&self, display_name: &str) -> Result<Player, GameError> {
        self.repository
            .player_by_name(display_name.trim())?
            .ok_or_else(|| GameError::PlayerNotFound(display_name.to_string()))
    }

    /// Starts a game.
    ///
    /// The creator takes seat 0 and moves first; opponents follow in the
    /// given order. Each seat is dealt a full rack from a freshly shuffled
    /// bag. A rematch must name a game started by the same creator.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidRequest`] for a blank name, a bad opponent count
    /// or a repeated seat; [`GameError::PlayerNotFound`],
    /// [`GameError::GameNotFound`] or [`GameError::NotCreator`] for bad
    /// references.
    #[instrument(skip(self, opponents), fields(opponents = opponents.len()))]
    pub fn create_game(
        &self,
        creator: i64,
        name: &str,
        opponents: &[String],
        rematch_of: Option<&str>,
    ) -> Result<GameDetails, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidRequest("game name is empty".into()));
        }
        if opponents.len() > MAX_OPPONENTS {
            return Err(GameError::InvalidRequest(format!(
                "a game takes at most {} opponents",
                MAX_OPPONENTS
            )));
        }

        self.repository.transaction(|store| {
            store
                .player_by_id(creator)?
                .ok_or_else(|| GameError::PlayerNotFound(creator.to_string()))?;

            let mut seat_ids = vec![creator];
            for opponent in opponents {
                let player = store
                    .player_by_name(opponent.trim())?
                    .ok_or_else(|| GameError::PlayerNotFound(opponent.clone()))?;
                if seat_ids.contains(player.id()) {
                    return Err(GameError::InvalidRequest(format!(
                        "{} cannot hold two seats",
                        player.display_name()
                    )));
                }
                seat_ids.push(*player.id());
            }

            if let Some(source) = rematch_of {
                let source_game = store
                    .game(source)?
                    .ok_or_else(|| GameError::GameNotFound(source.to_string()))?;
                if *source_game.created_by() != creator {
                    return Err(GameError::NotCreator(source.to_string()));
                }
            }

            let game = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                Game::deal(&seat_ids, &mut *rng)
            };

            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now().naive_utc();
            let record = NewGame::new(
                id.clone(),
                name.to_string(),
                creator,
                encode_board(game.board())?,
                game.bag().letters(),
                game.current_player(),
                GameStatus::Ongoing.to_string(),
                rematch_of.map(str::to_string),
                now,
                now,
            );
            let seats: Vec<SeatRecord> = game
                .seats()
                .iter()
                .enumerate()
                .map(|(position, seat)| {
                    SeatRecord::new(
                        id.clone(),
                        *seat.player_id(),
                        seat.rack().letters(),
                        position as i32,
                        0,
                    )
                })
                .collect();
            store.insert_game(&record, &seats)?;
            info!(game_id = %id, seats = seats.len(), "Game created");

            let loaded = load(store, &id)?;
            build_details(store, &loaded, creator)
        })
    }

    /// Renames a game. Creator only.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`], [`GameError::NotCreator`] or
    /// [`GameError::InvalidRequest`] for a blank name.
    #[instrument(skip(self))]
    pub fn rename_game(&self, game_id: &str, player_id: i64, name: &str) -> Result<(), GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidRequest("game name is empty".into()));
        }
        self.repository.transaction(|store| {
            ensure_creator(store, game_id, player_id)?;
            store.rename_game(game_id, name)?;
            info!(game_id, "Game renamed");
            Ok(())
        })
    }

    /// Deletes a game with its seats and history. Creator only.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] or [`GameError::NotCreator`].
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: &str, player_id: i64) -> Result<(), GameError> {
        self.repository.transaction(|store| {
            ensure_creator(store, game_id, player_id)?;
            store.delete_game(game_id)?;
            Ok(())
        })
    }

    /// Full state of a game as seen by one of its players.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] or [`GameError::NotSeated`].
    #[instrument(skip(self))]
    pub fn game_details(&self, game_id: &str, player_id: i64) -> Result<GameDetails, GameError> {
        self.repository.read(|store| {
            let loaded = load(store, game_id)?;
            ensure_seated(&loaded, player_id)?;
            build_details(store, &loaded, player_id)
        })
    }

    /// Ongoing games the player is seated in, most recently played first.
    ///
    /// # Errors
    ///
    /// [`GameError::Storage`] on database failure.
    #[instrument(skip(self))]
    pub fn games_for_player(&self, player_id: i64) -> Result<Vec<GameSummary>, GameError> {
        self.repository.read(|store| {
            let games = store.ongoing_games_for(player_id)?;
            Ok(games
                .into_iter()
                .map(|(g, last_play_time)| GameSummary {
                    your_turn: *g.current_turn() == Some(player_id),
                    is_your_game: *g.created_by() == player_id,
                    current_turn: *g.current_turn(),
                    last_play_time,
                    name: g.name().clone(),
                    id: g.id().clone(),
                })
                .collect())
        })
    }

    /// Plays a placement.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`], [`GameError::NotSeated`], or
    /// [`GameError::Move`] for any rule violation.
    #[instrument(skip(self, letters), fields(count = letters.len()))]
    pub fn play_move(
        &self,
        game_id: &str,
        player_id: i64,
        letters: &[PlacedLetter],
        policy: BlankPolicy,
    ) -> Result<MoveResult, GameError> {
        let (result, notices) = self.repository.transaction(|store| {
            let mut loaded = load(store, game_id)?;
            ensure_seated(&loaded, player_id)?;

            let outcome =
                loaded
                    .game
                    .play_move(player_id, letters, policy, self.dictionary.as_ref())?;

            let now = persist(store, game_id, &loaded.game)?;
            store.append_move(&NewMove::new(
                game_id.to_string(),
                player_id,
                encode_payload(outcome.placed())?,
                now,
            ))?;

            let notices = settlement_notices(game_id, &loaded.game, outcome.game_over());
            Ok::<_, GameError>((MoveResult::from(&outcome), notices))
        })?;

        notify::dispatch(self.notifier.clone(), notices);
        Ok(result)
    }

    /// Passes the turn.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`], [`GameError::NotSeated`], or
    /// [`GameError::Move`] when it is not the caller's turn or the game is over.
    #[instrument(skip(self))]
    pub fn pass_turn(&self, game_id: &str, player_id: i64) -> Result<PassResult, GameError> {
        let (result, notices) = self.repository.transaction(|store| {
            let mut loaded = load(store, game_id)?;
            ensure_seated(&loaded, player_id)?;

            let outcome = loaded.game.pass_turn(player_id)?;

            let now = persist(store, game_id, &loaded.game)?;
            store.append_move(&NewMove::new(
                game_id.to_string(),
                player_id,
                encode_payload(&[])?,
                now,
            ))?;

            let notices = settlement_notices(game_id, &loaded.game, outcome.game_over());
            let result = PassResult {
                next_turn: *outcome.next_turn(),
                game_over: outcome.game_over(),
                winner: *loaded.game.winner(),
            };
            Ok::<_, GameError>((result, notices))
        })?;

        notify::dispatch(self.notifier.clone(), notices);
        Ok(result)
    }

    /// Swaps the caller's whole rack for fresh tiles.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`], [`GameError::NotSeated`], or
    /// [`GameError::Move`] when out of turn, the game is over or the bag is
    /// empty.
    #[instrument(skip(self))]
    pub fn exchange_rack(&self, game_id: &str, player_id: i64) -> Result<ExchangeResult, GameError> {
        self.repository.transaction(|store| {
            let mut loaded = load(store, game_id)?;
            ensure_seated(&loaded, player_id)?;

            let outcome = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                loaded.game.exchange_rack(player_id, &mut *rng)?
            };

            persist(store, game_id, &loaded.game)?;
            Ok(ExchangeResult {
                rack: outcome.rack().letters(),
                next_turn: *outcome.next_turn(),
            })
        })
    }

    /// Score a placement would earn now. Read-only.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`], [`GameError::NotSeated`], or
    /// [`GameError::Move`] when the placement does not fit the board.
    #[instrument(skip(self, letters), fields(count = letters.len()))]
    pub fn simulate_score(
        &self,
        game_id: &str,
        player_id: i64,
        letters: &[PlacedLetter],
    ) -> Result<SimulationResult, GameError> {
        self.repository.read(|store| {
            let loaded = load(store, game_id)?;
            ensure_seated(&loaded, player_id)?;
            let score = loaded.game.simulate(letters)?;
            debug!(score = *score.total(), "Simulated placement");
            Ok(SimulationResult {
                score: *score.total(),
            })
        })
    }
}

fn encode_board(board: &Board) -> Result<String, DbError> {
    serde_json::to_string(board).map_err(|e| DbError::new(format!("Failed to encode board: {}", e)))
}

fn encode_payload(letters: &[PlacedLetter]) -> Result<String, DbError> {
    serde_json::to_string(letters)
        .map_err(|e| DbError::new(format!("Failed to encode move payload: {}", e)))
}

fn decode_payload(payload: &str) -> Result<Vec<PlacedLetter>, DbError> {
    serde_json::from_str(payload).map_err(|e| DbError::corrupt("move payload", e))
}

/// Reads a game and rebuilds the aggregate, joker cells included.
fn load(store: &mut GameStore<'_>, game_id: &str) -> Result<LoadedGame, GameError> {
    let record = store
        .game(game_id)?
        .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))?;
    let seats = store.seats(game_id)?;
    let moves = store.moves(game_id)?;

    let board: Board =
        serde_json::from_str(record.board()).map_err(|e| DbError::corrupt("board", e))?;
    let status: GameStatus = record
        .status()
        .parse()
        .map_err(|e| DbError::corrupt("status", e))?;
    let history = moves
        .iter()
        .map(|m| decode_payload(m.payload()))
        .collect::<Result<Vec<_>, _>>()?;

    let current = match *record.current_turn() {
        Some(id) => seats
            .iter()
            .position(|s| *s.player_id() == id)
            .ok_or_else(|| DbError::corrupt("current turn", format!("player {} holds no seat", id)))?,
        None => 0,
    };
    let passes = u32::try_from(*record.pass_count()).map_err(|e| DbError::corrupt("pass count", e))?;
    let turn = TurnState::restore(current, seats.len(), passes, status);

    let game = Game::restore(
        board,
        Bag::from_letters(record.bag()),
        seats
            .iter()
            .map(|s| Seat::new(*s.player_id(), Rack::from_letters(s.rack()), *s.score()))
            .collect(),
        turn,
        blank_cells(history.iter().map(Vec::as_slice)),
        *record.winner_id(),
    );
    debug!(game_id, moves = moves.len(), status = %status, "Game loaded");

    Ok(LoadedGame {
        record,
        seats,
        moves,
        history,
        game,
    })
}

/// Writes the aggregate back; returns the timestamp used.
fn persist(store: &mut GameStore<'_>, game_id: &str, game: &Game) -> Result<NaiveDateTime, GameError> {
    let now = Utc::now().naive_utc();
    let ended = game.status() == GameStatus::Ended;
    let changes = GameChanges::new(
        encode_board(game.board())?,
        game.bag().letters(),
        game.current_player(),
        i32::try_from(game.turn().passes()).unwrap_or(i32::MAX),
        game.status().to_string(),
        *game.winner(),
        ended.then_some(now),
        now,
    );
    store.update_game(game_id, &changes)?;
    for seat in game.seats() {
        store.update_seat(game_id, *seat.player_id(), &seat.rack().letters(), *seat.score())?;
    }
    if ended {
        info!(game_id, winner = ?game.winner(), "Game ended");
    }
    Ok(now)
}

fn ensure_seated(loaded: &LoadedGame, player_id: i64) -> Result<(), GameError> {
    if loaded.game.seat(player_id).is_none() {
        return Err(GameError::NotSeated {
            player_id,
            game_id: loaded.record.id().clone(),
        });
    }
    Ok(())
}

fn ensure_creator(store: &mut GameStore<'_>, game_id: &str, player_id: i64) -> Result<(), GameError> {
    let record = store
        .game(game_id)?
        .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))?;
    if *record.created_by() != player_id {
        return Err(GameError::NotCreator(game_id.to_string()));
    }
    Ok(())
}

fn settlement_notices(game_id: &str, game: &Game, ended: bool) -> Vec<SettlementNotice> {
    if !ended {
        return Vec::new();
    }
    game.seats()
        .iter()
        .map(|s| SettlementNotice::new(game_id.to_string(), *s.player_id(), *s.score(), *game.winner()))
        .collect()
}

fn build_details(
    store: &mut GameStore<'_>,
    loaded: &LoadedGame,
    player_id: i64,
) -> Result<GameDetails, GameError> {
    let ids: Vec<i64> = loaded.seats.iter().map(|s| *s.player_id()).collect();
    let names: HashMap<i64, String> = store
        .players_by_ids(&ids)?
        .into_iter()
        .map(|p| (*p.id(), p.display_name().clone()))
        .collect();

    let players = loaded
        .seats
        .iter()
        .map(|s| SeatView {
            player_id: *s.player_id(),
            display_name: names.get(s.player_id()).cloned().unwrap_or_default(),
            position: *s.position(),
            score: *s.score(),
            rack_size: s.rack().chars().count(),
        })
        .collect();

    let moves = loaded
        .moves
        .iter()
        .zip(&loaded.history)
        .map(|(m, letters)| MoveView {
            player_id: *m.player_id(),
            letters: letters.clone(),
            created_at: *m.created_at(),
        })
        .collect();

    let record = &loaded.record;
    Ok(GameDetails {
        id: record.id().clone(),
        name: record.name().clone(),
        created_by: *record.created_by(),
        board: loaded.game.board().clone(),
        rack: loaded
            .game
            .seat(player_id)
            .map(|s| s.rack().letters())
            .unwrap_or_default(),
        players,
        moves,
        current_turn: loaded.game.current_player(),
        status: loaded.game.status(),
        remaining_letters: loaded.game.bag().len(),
        winner: *loaded.game.winner(),
        ended_at: *record.ended_at(),
        rematch_of: record.rematch_of().clone(),
        created_at: *record.created_at(),
    })
}
