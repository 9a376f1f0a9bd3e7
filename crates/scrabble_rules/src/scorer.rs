//! Move scoring with premium squares, jokers and the full-rack bonus.

use std::collections::{HashMap, HashSet};

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::layout::special_cell;
use crate::letters::{BINGO_BONUS, RACK_SIZE, letter_value};
use crate::words::extract_words;
use crate::{Board, FormedWord, MoveError, PlacedLetter, Position};

/// Board cells filled by a joker over the whole game.
pub type BlankCells = HashSet<Position>;

/// Collects joker cells from a sequence of recorded placements.
pub fn blank_cells<'a, I>(history: I) -> BlankCells
where
    I: IntoIterator<Item = &'a [PlacedLetter]>,
{
    history
        .into_iter()
        .flatten()
        .filter(|l| l.blank)
        .map(PlacedLetter::position)
        .collect()
}

/// Points earned by one word.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct WordScore {
    /// The word.
    word: String,
    /// Its value after multipliers.
    score: i32,
}

/// Breakdown of a move's score.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct MoveScore {
    /// Each new word with its value, in extraction order.
    words: Vec<WordScore>,
    /// Whether the full-rack bonus applied.
    bingo: bool,
    /// Sum of word values plus any bonus.
    total: i32,
}

/// Scores the words formed by `placed`.
///
/// `board` must already hold the placement. Jokers score 0 wherever they sit,
/// whether placed now or in an earlier move (`blanks`). Letter and word
/// premiums count only on cells filled by this move.
#[instrument(skip_all, fields(words = words.len(), placed = placed.len()))]
pub fn score_words(
    board: &Board,
    words: &[FormedWord],
    placed: &[PlacedLetter],
    blanks: &BlankCells,
) -> MoveScore {
    let new_cells: HashMap<Position, &PlacedLetter> =
        placed.iter().map(|l| (l.position(), l)).collect();

    let words: Vec<WordScore> = words
        .iter()
        .map(|word| {
            let mut letters = 0;
            let mut multiplier = 1;
            for pos in word.cells() {
                let fresh = new_cells.get(pos);
                let is_blank = blanks.contains(pos) || fresh.is_some_and(|l| l.blank);
                let face = board.at(*pos).letter().map(letter_value).unwrap_or(0);
                let mut value = if is_blank { 0 } else { face };
                if fresh.is_some() {
                    let cell = special_cell(pos.x, pos.y);
                    value *= cell.letter_multiplier();
                    multiplier *= cell.word_multiplier();
                }
                letters += value;
            }
            let score = letters * multiplier;
            debug!(word = %word.text(), letters, multiplier, score, "Scored word");
            WordScore {
                word: word.text().clone(),
                score,
            }
        })
        .collect();

    let bingo = placed.len() == RACK_SIZE;
    let total = words.iter().map(|w| w.score).sum::<i32>() + if bingo { BINGO_BONUS } else { 0 };

    MoveScore {
        words,
        bingo,
        total,
    }
}

/// Score a placement would earn, without touching anything.
///
/// Reuses the extraction and scoring of a real move on a copy of the board.
/// An empty placement scores 0. No rack, turn or dictionary check is made.
///
/// # Errors
///
/// Returns [`MoveError::OutOfBounds`] or [`MoveError::CellOccupied`] when the
/// placement cannot be laid on the board.
#[instrument(skip_all, fields(placed = placed.len()))]
pub fn simulate_score(
    board: &Board,
    placed: &[PlacedLetter],
    blanks: &BlankCells,
) -> Result<MoveScore, MoveError> {
    if placed.is_empty() {
        return Ok(MoveScore::default());
    }
    let mut scratch = board.clone();
    scratch.apply_letters(placed)?;
    let words = extract_words(&scratch, placed);
    Ok(score_words(&scratch, &words, placed, blanks))
}
