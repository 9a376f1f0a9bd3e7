//! Rule violations raised while validating or applying a move.

use derive_more::{Display, Error};

/// Error that can occur when validating or applying a move.
///
/// Every variant is recoverable: the caller can fix the request and retry.
/// A move that fails with any of these leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The placement contains no letters.
    #[display("No letters provided")]
    NoLetters,

    /// More than a full rack of letters in one move.
    #[display("Cannot place more than 7 letters in one move ({} given)", _0)]
    TooManyLetters(#[error(not(source))] usize),

    /// A letter lies outside the board.
    #[display("Cell ({}, {}) is outside the board", x, y)]
    OutOfBounds {
        /// Column.
        x: u8,
        /// Row.
        y: u8,
    },

    /// A placed character is not an uppercase letter.
    #[display("'{}' is not a playable letter", _0)]
    InvalidLetter(#[error(not(source))] char),

    /// The rack cannot supply the placed tiles.
    #[display("Rack does not hold the required letters")]
    InsufficientRack,

    /// Letters do not share a row or a column.
    #[display("Letters must be aligned in the same row or column")]
    NotAligned,

    /// The opening move does not cover the center cell.
    #[display("First move must cover the center cell")]
    FirstMoveNotCentered,

    /// No placed letter touches a tile already on the board.
    #[display("Word must connect to existing letters")]
    NotConnected,

    /// A target cell is already filled (or targeted twice).
    #[display("Cell ({}, {}) is already occupied", x, y)]
    CellOccupied {
        /// Column.
        x: u8,
        /// Row.
        y: u8,
    },

    /// A formed word is not in the dictionary.
    #[display("Invalid word played: {}", _0)]
    InvalidWord(#[error(not(source))] String),

    /// The bag is empty, so the rack cannot be exchanged.
    #[display("No letters left in the bag")]
    NoLettersLeft,

    /// The acting seat does not hold the turn.
    #[display("Not your turn")]
    NotYourTurn,

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,
}
