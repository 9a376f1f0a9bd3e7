//! Legality checks run before a placement touches the board.

use tracing::{debug, instrument};

use crate::board::{in_bounds, is_center};
use crate::letters::{RACK_SIZE, is_playable};
use crate::{Board, MoveError, PlacedLetter, Rack};

/// Checks a placement against the board and the acting player's rack.
///
/// Checks run in a fixed order and the first failure wins: letter count and
/// shape, rack sufficiency, alignment, then centering (first move) or
/// connectivity. Cell collisions are left to [`Board::apply_letters`].
///
/// # Errors
///
/// Returns the first [`MoveError`] encountered.
#[instrument(skip(board, rack, letters), fields(rack = %rack, count = letters.len()))]
pub fn validate_move(board: &Board, rack: &Rack, letters: &[PlacedLetter]) -> Result<(), MoveError> {
    check_shape(letters)?;

    if !rack.can_supply(letters) {
        debug!("Rack cannot supply placement");
        return Err(MoveError::InsufficientRack);
    }

    if !is_aligned(letters) {
        return Err(MoveError::NotAligned);
    }

    if board.is_first_move() {
        if !letters.iter().any(|l| is_center(l.x, l.y)) {
            return Err(MoveError::FirstMoveNotCentered);
        }
    } else if !letters.iter().any(|l| board.touches_tile(l.x, l.y)) {
        return Err(MoveError::NotConnected);
    }

    Ok(())
}

/// Count, bounds and alphabet checks.
///
/// # Errors
///
/// [`MoveError::NoLetters`], [`MoveError::TooManyLetters`],
/// [`MoveError::OutOfBounds`] or [`MoveError::InvalidLetter`].
pub fn check_shape(letters: &[PlacedLetter]) -> Result<(), MoveError> {
    if letters.is_empty() {
        return Err(MoveError::NoLetters);
    }
    if letters.len() > RACK_SIZE {
        return Err(MoveError::TooManyLetters(letters.len()));
    }
    for l in letters {
        if !in_bounds(l.x, l.y) {
            return Err(MoveError::OutOfBounds { x: l.x, y: l.y });
        }
        if !is_playable(l.letter) {
            return Err(MoveError::InvalidLetter(l.letter));
        }
    }
    Ok(())
}

/// True when all letters share a row or all share a column.
pub fn is_aligned(letters: &[PlacedLetter]) -> bool {
    let Some(first) = letters.first() else {
        return true;
    };
    letters.iter().all(|l| l.y == first.y) || letters.iter().all(|l| l.x == first.x)
}
