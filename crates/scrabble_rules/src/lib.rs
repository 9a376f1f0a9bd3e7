//! Scrabble rules - board, tiles, move legality, scoring and settlement
//!
//! A pure rules engine for a French-distribution word placement game. The
//! crate performs no I/O: randomness and the dictionary are supplied by the
//! caller, and persistence lives elsewhere.
//!
//! # Architecture
//!
//! - **Tiles**: the 102-tile pool, the bag and player racks
//! - **Board**: the 15×15 grid and its premium layout
//! - **Moves**: validation, joker resolution, word extraction and scoring
//! - **Game**: turn progression and end-of-game settlement
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use scrabble_rules::{BlankPolicy, Game, MoveError, PlacedLetter, WordList};
//!
//! # fn main() {
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut game = Game::deal(&[1, 2], &mut rng);
//! let dict = WordList::from_words(["CHAT"]);
//!
//! // Player 2 cannot act on player 1's turn.
//! let letters = [PlacedLetter::new(7, 7, 'C')];
//! let result = game.play_move(2, &letters, BlankPolicy::Explicit, &dict);
//! assert_eq!(result.map(|_| ()), Err(MoveError::NotYourTurn));
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod bag;
mod blanks;
mod board;
mod dictionary;
mod error;
mod game;
mod layout;
mod letters;
mod placement;
mod rack;
mod scorer;
mod settlement;
mod turn;
mod validator;
mod words;

// Crate-level exports - Tiles
pub use bag::Bag;
pub use letters::{
    BINGO_BONUS, FRENCH_DISTRIBUTION, JOKER, POOL_SIZE, RACK_SIZE, full_set, is_playable,
    letter_value,
};
pub use rack::Rack;

// Crate-level exports - Board
pub use board::{Board, Cell, in_bounds, is_center};
pub use layout::{BOARD_SIZE, CENTER, SpecialCell, special_cell};
pub use placement::{MoveRequest, PlacedLetter, Position};

// Crate-level exports - Moves
pub use blanks::{BlankPolicy, resolve_blanks};
pub use dictionary::{Dictionary, WordList, normalize_word};
pub use error::MoveError;
pub use scorer::{BlankCells, MoveScore, WordScore, blank_cells, score_words, simulate_score};
pub use validator::{check_shape, is_aligned, validate_move};
pub use words::{Axis, FormedWord, extract_words};

// Crate-level exports - Game
pub use game::{ExchangeOutcome, Game, MoveOutcome, PassOutcome, Seat};
pub use settlement::{SettlementOutcome, Standing, settle};
pub use turn::{GameStatus, Transition, TurnState};
