//! The in-memory game aggregate.
//!
//! [`Game`] ties the board, bag, seats and turn state together and exposes
//! the three turn-consuming actions. Each action runs on a copy of the game
//! and replaces `self` only when every step succeeded, so a rejected action
//! leaves no trace.

use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::scorer::{BlankCells, MoveScore, score_words, simulate_score};
use crate::settlement::{SettlementOutcome, Standing, settle};
use crate::turn::{GameStatus, Transition, TurnState};
use crate::validator::validate_move;
use crate::words::extract_words;
use crate::{Bag, BlankPolicy, Board, Dictionary, MoveError, PlacedLetter, Rack};

/// A player's place at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Seat {
    /// Player holding the seat.
    player_id: i64,
    /// Tiles in hand.
    rack: Rack,
    /// Running score.
    score: i32,
}

impl Seat {
    /// Creates a seat.
    pub fn new(player_id: i64, rack: Rack, score: i32) -> Self {
        Self {
            player_id,
            rack,
            score,
        }
    }
}

/// Result of an accepted placement.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The placement as applied, blank flags included.
    placed: Vec<PlacedLetter>,
    /// Points for this move.
    score: MoveScore,
    /// Mover's total after the move (and after settlement if it ended the game).
    total_score: i32,
    /// Mover's rack after refill.
    rack: Rack,
    /// Player to act next, `None` once the game is over.
    next_turn: Option<i64>,
    /// Settlement, when this move ended the game.
    settlement: Option<SettlementOutcome>,
}

impl MoveOutcome {
    /// Whether the move ended the game.
    pub fn game_over(&self) -> bool {
        self.settlement.is_some()
    }

    /// Winner, when the move ended the game.
    pub fn winner(&self) -> Option<i64> {
        self.settlement.as_ref().and_then(|s| *s.winner())
    }
}

/// Result of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PassOutcome {
    /// Player to act next, `None` once the game is over.
    next_turn: Option<i64>,
    /// Settlement, when this pass ended the game.
    settlement: Option<SettlementOutcome>,
}

impl PassOutcome {
    /// Whether the pass ended the game.
    pub fn game_over(&self) -> bool {
        self.settlement.is_some()
    }
}

/// Result of a rack exchange.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    /// The fresh rack.
    rack: Rack,
    /// Player to act next.
    next_turn: Option<i64>,
}

/// Board, bag, seats and turn of one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Game {
    /// Placed tiles.
    board: Board,
    /// Undrawn tiles.
    bag: Bag,
    /// Seats in turn order.
    seats: Vec<Seat>,
    /// Turn pointer, passes and status.
    turn: TurnState,
    /// Cells holding a joker, from every move so far.
    blanks: BlankCells,
    /// Set by settlement.
    winner: Option<i64>,
}

impl Game {
    /// Starts a game: shuffles a full bag and deals a rack to each player in
    /// seat order. The first player moves first.
    #[instrument(skip(rng))]
    pub fn deal<R: Rng + ?Sized>(player_ids: &[i64], rng: &mut R) -> Self {
        let mut bag = Bag::full();
        bag.shuffle(rng);
        let seats = player_ids
            .iter()
            .map(|&player_id| {
                let mut rack = Rack::default();
                rack.refill(&mut bag);
                Seat::new(player_id, rack, 0)
            })
            .collect::<Vec<_>>();
        debug!(bag = bag.len(), "Racks dealt");
        Self {
            board: Board::empty(),
            bag,
            turn: TurnState::new(seats.len()),
            seats,
            blanks: BlankCells::new(),
            winner: None,
        }
    }

    /// Rebuilds a game from stored parts.
    pub fn restore(
        board: Board,
        bag: Bag,
        seats: Vec<Seat>,
        turn: TurnState,
        blanks: BlankCells,
        winner: Option<i64>,
    ) -> Self {
        Self {
            board,
            bag,
            seats,
            turn,
            blanks,
            winner,
        }
    }

    /// Game status.
    pub fn status(&self) -> GameStatus {
        self.turn.status()
    }

    /// Player holding the turn, `None` once the game is over.
    pub fn current_player(&self) -> Option<i64> {
        if !self.turn.is_ongoing() {
            return None;
        }
        self.seats.get(self.turn.current()).map(|s| s.player_id)
    }

    /// The seat of `player_id`, if seated.
    pub fn seat(&self, player_id: i64) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player_id == player_id)
    }

    /// Tiles in bag, racks and on the board; always the full pool.
    pub fn tile_count(&self) -> usize {
        self.bag.len() + self.seats.iter().map(|s| s.rack.len()).sum::<usize>() + self.board.tile_count()
    }

    fn acting_seat(&self, player_id: i64) -> Result<usize, MoveError> {
        if !self.turn.is_ongoing() {
            return Err(MoveError::GameOver);
        }
        let current = self.turn.current();
        match self.seats.get(current) {
            Some(seat) if seat.player_id == player_id => Ok(current),
            _ => Err(MoveError::NotYourTurn),
        }
    }

    fn next_turn(&self) -> Option<i64> {
        self.current_player()
    }

    fn finish(&mut self, finisher: Option<usize>) -> SettlementOutcome {
        let mut standings: Vec<Standing> = self
            .seats
            .iter()
            .map(|s| Standing {
                player_id: s.player_id,
                score: s.score,
                rack: s.rack.clone(),
            })
            .collect();
        let finisher = finisher.and_then(|idx| self.seats.get(idx)).map(|s| s.player_id);
        let outcome = settle(&mut standings, finisher);
        for (seat, standing) in self.seats.iter_mut().zip(standings) {
            seat.score = standing.score;
        }
        self.winner = *outcome.winner();
        outcome
    }

    /// Plays a placement for `player_id`.
    ///
    /// Runs validation, board application, word extraction, the dictionary
    /// check on every new word, scoring, rack refill and the turn transition,
    /// settling the game when it ends.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] or [`MoveError::NotYourTurn`] before anything
    /// else, then any validation failure, [`MoveError::CellOccupied`] or
    /// [`MoveError::InvalidWord`] for the first unknown word. The game is
    /// unchanged on error.
    #[instrument(skip(self, letters, dictionary), fields(count = letters.len()))]
    pub fn play_move(
        &mut self,
        player_id: i64,
        letters: &[PlacedLetter],
        policy: BlankPolicy,
        dictionary: &dyn Dictionary,
    ) -> Result<MoveOutcome, MoveError> {
        let idx = self.acting_seat(player_id)?;
        let mut next = self.clone();

        let placed = policy.apply(&next.seats[idx].rack, letters);
        validate_move(&next.board, &next.seats[idx].rack, &placed)?;
        next.board.apply_letters(&placed)?;

        let words = extract_words(&next.board, &placed);
        if let Some(unknown) = words.iter().find(|w| !dictionary.exists(w.text())) {
            debug!(word = %unknown.text(), "Word rejected by dictionary");
            return Err(MoveError::InvalidWord(unknown.text().clone()));
        }

        let score = score_words(&next.board, &words, &placed, &next.blanks);
        next.blanks.extend(placed.iter().filter(|l| l.blank).map(PlacedLetter::position));

        let seat = &mut next.seats[idx];
        seat.rack.remove_played(&placed)?;
        seat.rack.refill(&mut next.bag);
        seat.score += *score.total();
        let rack_empty = seat.rack.is_empty();

        let settlement = match next.turn.after_move(rack_empty, next.bag.is_empty()) {
            Transition::Continue { .. } => None,
            Transition::End { finisher } => Some(next.finish(finisher)),
        };

        let outcome = MoveOutcome {
            placed,
            total_score: next.seats[idx].score,
            rack: next.seats[idx].rack.clone(),
            next_turn: next.next_turn(),
            score,
            settlement,
        };
        *self = next;
        info!(player_id, total = *outcome.score.total(), game_over = outcome.game_over(), "Move played");
        Ok(outcome)
    }

    /// Passes the turn for `player_id`.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] or [`MoveError::NotYourTurn`].
    #[instrument(skip(self))]
    pub fn pass_turn(&mut self, player_id: i64) -> Result<PassOutcome, MoveError> {
        self.acting_seat(player_id)?;
        let settlement = match self.turn.after_pass() {
            Transition::Continue { .. } => None,
            Transition::End { finisher } => Some(self.finish(finisher)),
        };
        info!(player_id, passes = self.turn.passes(), "Turn passed");
        Ok(PassOutcome {
            next_turn: self.next_turn(),
            settlement,
        })
    }

    /// Returns the whole rack of `player_id` to the bag and draws a new one.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`], [`MoveError::NotYourTurn`], or
    /// [`MoveError::NoLettersLeft`] when the bag is empty.
    #[instrument(skip(self, rng))]
    pub fn exchange_rack<R: Rng + ?Sized>(
        &mut self,
        player_id: i64,
        rng: &mut R,
    ) -> Result<ExchangeOutcome, MoveError> {
        let idx = self.acting_seat(player_id)?;
        if self.bag.is_empty() {
            return Err(MoveError::NoLettersLeft);
        }

        let returned = self.seats[idx].rack.take_all();
        self.bag.put_back(&returned);
        self.bag.shuffle(rng);
        self.seats[idx].rack.refill(&mut self.bag);
        self.turn.after_exchange();

        info!(player_id, returned = returned.len(), "Rack exchanged");
        Ok(ExchangeOutcome {
            rack: self.seats[idx].rack.clone(),
            next_turn: self.next_turn(),
        })
    }

    /// Score `letters` would earn on the current board. Nothing is checked
    /// beyond board fit, nothing changes.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfBounds`] or [`MoveError::CellOccupied`].
    pub fn simulate(&self, letters: &[PlacedLetter]) -> Result<MoveScore, MoveError> {
        simulate_score(&self.board, letters, &self.blanks)
    }
}
