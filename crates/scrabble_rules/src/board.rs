//! The 15×15 grid of placed letters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::layout::{BOARD_SIZE, CENTER};
use crate::{MoveError, PlacedLetter, Position};

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// A placed tile, by face value.
    Letter(char),
}

impl Cell {
    /// The face value, if any.
    pub fn letter(self) -> Option<char> {
        match self {
            Self::Letter(c) => Some(c),
            Self::Empty => None,
        }
    }

    /// True for an empty cell.
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// 15×15 board in row-major order.
///
/// Stored as `board[y][x]` strings with `""` for empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// A board with every cell empty.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Cell at column `x`, row `y`; off-board reads as empty.
    pub fn get(&self, x: u8, y: u8) -> Cell {
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    /// Cell at `pos`.
    pub fn at(&self, pos: Position) -> Cell {
        self.get(pos.x, pos.y)
    }

    /// Whether a tile sits at column `x`, row `y`.
    pub fn is_occupied(&self, x: u8, y: u8) -> bool {
        !self.get(x, y).is_empty()
    }

    /// True iff no tile has been placed yet.
    pub fn is_first_move(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.is_empty())
    }

    /// Number of placed tiles.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Whether any 4-neighbour of `(x, y)` holds a tile.
    pub fn touches_tile(&self, x: u8, y: u8) -> bool {
        neighbours(x, y).any(|(nx, ny)| self.is_occupied(nx, ny))
    }

    /// Writes the placement onto the board.
    ///
    /// Every target is checked before anything is written, so on failure the
    /// board is exactly as it was. Two letters aimed at the same cell count as
    /// a collision.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfBounds`] or [`MoveError::CellOccupied`].
    #[instrument(skip(self, placed), fields(count = placed.len()))]
    pub fn apply_letters(&mut self, placed: &[PlacedLetter]) -> Result<(), MoveError> {
        let mut targets = HashSet::with_capacity(placed.len());
        for l in placed {
            if !in_bounds(l.x, l.y) {
                return Err(MoveError::OutOfBounds { x: l.x, y: l.y });
            }
            if self.is_occupied(l.x, l.y) || !targets.insert(l.position()) {
                debug!(x = l.x, y = l.y, "Target cell already occupied");
                return Err(MoveError::CellOccupied { x: l.x, y: l.y });
            }
        }

        for l in placed {
            self.cells[l.y as usize][l.x as usize] = Cell::Letter(l.letter);
        }
        Ok(())
    }

    /// Rows of the board as text, `.` for empty cells.
    pub fn display(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.letter().unwrap_or('.'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whether `(x, y)` lies on the board.
pub fn in_bounds(x: u8, y: u8) -> bool {
    (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE
}

/// Whether `(x, y)` is the center star.
pub fn is_center(x: u8, y: u8) -> bool {
    x == CENTER && y == CENTER
}

fn neighbours(x: u8, y: u8) -> impl Iterator<Item = (u8, u8)> {
    let (x, y) = (x as i16, y as i16);
    [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
        .into_iter()
        .filter(|&(nx, ny)| nx >= 0 && ny >= 0 && (nx as usize) < BOARD_SIZE && (ny as usize) < BOARD_SIZE)
        .map(|(nx, ny)| (nx as u8, ny as u8))
}

impl From<Board> for Vec<Vec<String>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.letter().map(String::from).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

impl TryFrom<Vec<Vec<String>>> for Board {
    type Error = String;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        if rows.len() != BOARD_SIZE {
            return Err(format!("expected {} rows, got {}", BOARD_SIZE, rows.len()));
        }
        let mut board = Board::empty();
        for (y, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(format!("row {} has {} cells", y, row.len()));
            }
            for (x, cell) in row.iter().enumerate() {
                let mut chars = cell.chars();
                board.cells[y][x] = match (chars.next(), chars.next()) {
                    (None, _) => Cell::Empty,
                    (Some(c), None) => Cell::Letter(c),
                    _ => return Err(format!("cell ({}, {}) holds '{}'", x, y, cell)),
                };
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_first_move() {
        let board = Board::empty();
        assert!(board.is_first_move());
        assert_eq!(board.tile_count(), 0);
    }

    #[test]
    fn test_apply_letters_writes_cells() {
        let mut board = Board::empty();
        board
            .apply_letters(&[PlacedLetter::new(7, 7, 'A'), PlacedLetter::new(8, 7, 'B')])
            .expect("apply");
        assert_eq!(board.get(7, 7), Cell::Letter('A'));
        assert_eq!(board.get(8, 7), Cell::Letter('B'));
        assert!(!board.is_first_move());
    }

    #[test]
    fn test_apply_letters_never_overwrites() {
        let mut board = Board::empty();
        board.apply_letters(&[PlacedLetter::new(7, 7, 'A')]).expect("apply");
        let before = board.clone();

        let result = board.apply_letters(&[PlacedLetter::new(6, 7, 'B'), PlacedLetter::new(7, 7, 'C')]);
        assert_eq!(result, Err(MoveError::CellOccupied { x: 7, y: 7 }));
        assert_eq!(board, before, "partial write left behind");
    }

    #[test]
    fn test_apply_letters_rejects_duplicate_target() {
        let mut board = Board::empty();
        let result = board.apply_letters(&[PlacedLetter::new(7, 7, 'A'), PlacedLetter::new(7, 7, 'B')]);
        assert_eq!(result, Err(MoveError::CellOccupied { x: 7, y: 7 }));
        assert!(board.is_first_move());
    }

    #[test]
    fn test_touches_tile_at_edge() {
        let mut board = Board::empty();
        board.apply_letters(&[PlacedLetter::new(0, 0, 'A')]).expect("apply");
        assert!(board.touches_tile(1, 0));
        assert!(board.touches_tile(0, 1));
        assert!(!board.touches_tile(1, 1));
    }

    #[test]
    fn test_json_layout_is_row_major() {
        let mut board = Board::empty();
        board.apply_letters(&[PlacedLetter::new(3, 1, 'Z')]).expect("apply");
        let value = serde_json::to_value(&board).expect("json");
        assert_eq!(value[1][3], "Z");
        assert_eq!(value[3][1], "");

        let back: Board = serde_json::from_value(value).expect("decode");
        assert_eq!(back, board);
    }
}
