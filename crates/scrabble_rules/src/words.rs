//! Extraction of the words a placement forms.

use std::collections::HashSet;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, instrument};

use crate::board::in_bounds;
use crate::{Board, PlacedLetter, Position};

/// Reading direction of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Axis {
    /// Left to right along a row.
    #[strum(serialize = "H")]
    Horizontal,
    /// Top to bottom along a column.
    #[strum(serialize = "V")]
    Vertical,
}

impl Axis {
    fn step(self) -> (i16, i16) {
        match self {
            Self::Horizontal => (1, 0),
            Self::Vertical => (0, 1),
        }
    }
}

/// A contiguous run of tiles, at least two long, touched by the move.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct FormedWord {
    /// The letters, in reading order.
    text: String,
    /// First cell of the word.
    start: Position,
    /// Reading direction.
    axis: Axis,
    /// Every cell of the word, in reading order.
    cells: Vec<Position>,
}

/// Finds every new word a placement forms on `board`.
///
/// `board` must already hold the placed letters. For each placed letter and
/// each axis the word through it is rebuilt from its first cell; runs shorter
/// than two letters are skipped, and a word reached from several placed
/// letters is reported once.
#[instrument(skip(board, placed), fields(count = placed.len()))]
pub fn extract_words(board: &Board, placed: &[PlacedLetter]) -> Vec<FormedWord> {
    let placed_cells: HashSet<Position> = placed.iter().map(PlacedLetter::position).collect();
    let mut seen: HashSet<(Position, Axis)> = HashSet::new();
    let mut words = Vec::new();

    for l in placed {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let start = word_start(board, l.position(), axis);
            if seen.contains(&(start, axis)) {
                continue;
            }
            let cells = word_cells(board, start, axis);
            if cells.len() < 2 || !cells.iter().any(|c| placed_cells.contains(c)) {
                continue;
            }
            let text: String = cells.iter().filter_map(|&c| board.at(c).letter()).collect();
            debug!(word = %text, start = %start, axis = %axis, "Word formed");
            seen.insert((start, axis));
            words.push(FormedWord {
                text,
                start,
                axis,
                cells,
            });
        }
    }

    words
}

fn offset(pos: Position, axis: Axis, by: i16) -> Option<Position> {
    let (dx, dy) = axis.step();
    let x = pos.x as i16 + dx * by;
    let y = pos.y as i16 + dy * by;
    (x >= 0 && y >= 0 && in_bounds(x as u8, y as u8)).then(|| Position::new(x as u8, y as u8))
}

fn word_start(board: &Board, from: Position, axis: Axis) -> Position {
    let mut start = from;
    while let Some(prev) = offset(start, axis, -1) {
        if board.at(prev).is_empty() {
            break;
        }
        start = prev;
    }
    start
}

fn word_cells(board: &Board, start: Position, axis: Axis) -> Vec<Position> {
    let mut cells = Vec::new();
    let mut cursor = Some(start);
    while let Some(pos) = cursor {
        if board.at(pos).is_empty() {
            break;
        }
        cells.push(pos);
        cursor = offset(pos, axis, 1);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, letters: &[PlacedLetter]) {
        board.apply_letters(letters).expect("apply");
    }

    #[test]
    fn test_single_word_first_move() {
        let mut board = Board::empty();
        let letters = [
            PlacedLetter::new(5, 7, 'C'),
            PlacedLetter::new(6, 7, 'H'),
            PlacedLetter::new(7, 7, 'A'),
            PlacedLetter::new(8, 7, 'T'),
        ];
        place(&mut board, &letters);

        let words = extract_words(&board, &letters);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text(), "CHAT");
        assert_eq!(*words[0].start(), Position::new(5, 7));
        assert_eq!(*words[0].axis(), Axis::Horizontal);
    }

    #[test]
    fn test_extension_reports_whole_word() {
        let mut board = Board::empty();
        place(
            &mut board,
            &[
                PlacedLetter::new(5, 7, 'C'),
                PlacedLetter::new(6, 7, 'H'),
                PlacedLetter::new(7, 7, 'A'),
                PlacedLetter::new(8, 7, 'T'),
            ],
        );
        let letters = [PlacedLetter::new(9, 7, 'S')];
        place(&mut board, &letters);

        let words = extract_words(&board, &letters);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text(), "CHATS");
    }

    #[test]
    fn test_cross_words_are_found_and_old_words_skipped() {
        let mut board = Board::empty();
        place(
            &mut board,
            &[
                PlacedLetter::new(6, 7, 'L'),
                PlacedLetter::new(7, 7, 'A'),
            ],
        );
        // Only the vertical MA is new; M has no horizontal neighbour and LA
        // was already on the board.
        let letters = [PlacedLetter::new(7, 6, 'M')];
        place(&mut board, &letters);

        let words = extract_words(&board, &letters);
        let texts: Vec<&str> = words.iter().map(|w| w.text().as_str()).collect();
        assert_eq!(texts, vec!["MA"]);
    }

    #[test]
    fn test_parallel_play_forms_several_words() {
        let mut board = Board::empty();
        place(
            &mut board,
            &[
                PlacedLetter::new(7, 7, 'O'),
                PlacedLetter::new(8, 7, 'N'),
            ],
        );
        let letters = [PlacedLetter::new(7, 8, 'S'), PlacedLetter::new(8, 8, 'A')];
        place(&mut board, &letters);

        let words = extract_words(&board, &letters);
        let texts: Vec<&str> = words.iter().map(|w| w.text().as_str()).collect();
        assert_eq!(texts, vec!["SA", "OS", "NA"]);
    }

    #[test]
    fn test_shared_word_counted_once() {
        let mut board = Board::empty();
        let letters = [PlacedLetter::new(7, 7, 'O'), PlacedLetter::new(8, 7, 'U')];
        place(&mut board, &letters);
        assert_eq!(extract_words(&board, &letters).len(), 1);
    }

    #[test]
    fn test_word_at_board_edge() {
        let mut board = Board::empty();
        let letters = [PlacedLetter::new(13, 0, 'O'), PlacedLetter::new(14, 0, 'N')];
        place(&mut board, &letters);
        let words = extract_words(&board, &letters);
        assert_eq!(words[0].text(), "ON");
        assert_eq!(words[0].cells().len(), 2);
    }
}
