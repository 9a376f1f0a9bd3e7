//! Fixed premium-square layout of the 15×15 board.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Board side length.
pub const BOARD_SIZE: usize = 15;

/// Coordinate of the center star on both axes.
pub const CENTER: u8 = 7;

/// Scoring role of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum SpecialCell {
    /// Plain cell.
    #[strum(serialize = "")]
    None,
    /// Double letter.
    #[strum(serialize = "DL")]
    DoubleLetter,
    /// Triple letter.
    #[strum(serialize = "TL")]
    TripleLetter,
    /// Double word.
    #[strum(serialize = "DW")]
    DoubleWord,
    /// Triple word.
    #[strum(serialize = "TW")]
    TripleWord,
    /// Center star, scored as a double word.
    #[strum(serialize = "★")]
    Center,
}

impl SpecialCell {
    /// Multiplier applied to the letter placed on this cell.
    pub fn letter_multiplier(self) -> i32 {
        match self {
            Self::DoubleLetter => 2,
            Self::TripleLetter => 3,
            _ => 1,
        }
    }

    /// Multiplier applied to every word running through this cell.
    pub fn word_multiplier(self) -> i32 {
        match self {
            Self::DoubleWord | Self::Center => 2,
            Self::TripleWord => 3,
            _ => 1,
        }
    }
}

use self::SpecialCell::{
    Center as ST, DoubleLetter as DL, DoubleWord as DW, None as __, TripleLetter as TL,
    TripleWord as TW,
};

static LAYOUT: [[SpecialCell; BOARD_SIZE]; BOARD_SIZE] = [
    [TW, __, __, DL, __, __, __, TW, __, __, __, DL, __, __, TW],
    [__, DW, __, __, __, TL, __, __, __, TL, __, __, __, DW, __],
    [__, __, DW, __, __, __, DL, __, DL, __, __, __, DW, __, __],
    [DL, __, __, DW, __, __, __, DL, __, __, __, DW, __, __, DL],
    [__, __, __, __, DW, __, __, __, __, __, DW, __, __, __, __],
    [__, TL, __, __, __, TL, __, __, __, TL, __, __, __, TL, __],
    [__, __, DL, __, __, __, DL, __, DL, __, __, __, DL, __, __],
    [TW, __, __, DL, __, __, __, ST, __, __, __, DL, __, __, TW],
    [__, __, DL, __, __, __, DL, __, DL, __, __, __, DL, __, __],
    [__, TL, __, __, __, TL, __, __, __, TL, __, __, __, TL, __],
    [__, __, __, __, DW, __, __, __, __, __, DW, __, __, __, __],
    [DL, __, __, DW, __, __, __, DL, __, __, __, DW, __, __, DL],
    [__, __, DW, __, __, __, DL, __, DL, __, __, __, DW, __, __],
    [__, DW, __, __, __, TL, __, __, __, TL, __, __, __, DW, __],
    [TW, __, __, DL, __, __, __, TW, __, __, __, DL, __, __, TW],
];

/// Premium of the cell at column `x`, row `y`. Off-board cells are plain.
pub fn special_cell(x: u8, y: u8) -> SpecialCell {
    LAYOUT
        .get(y as usize)
        .and_then(|row| row.get(x as usize))
        .copied()
        .unwrap_or(SpecialCell::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_double_word() {
        assert_eq!(special_cell(CENTER, CENTER), SpecialCell::Center);
        assert_eq!(special_cell(CENTER, CENTER).word_multiplier(), 2);
    }

    #[test]
    fn test_layout_is_symmetric() {
        for y in 0..BOARD_SIZE as u8 {
            for x in 0..BOARD_SIZE as u8 {
                assert_eq!(special_cell(x, y), special_cell(y, x));
                assert_eq!(special_cell(x, y), special_cell(14 - x, y));
            }
        }
    }

    #[test]
    fn test_corners_are_triple_word() {
        assert_eq!(special_cell(0, 0), SpecialCell::TripleWord);
        assert_eq!(special_cell(14, 14), SpecialCell::TripleWord);
    }

    #[test]
    fn test_codes() {
        assert_eq!(SpecialCell::DoubleLetter.to_string(), "DL");
        assert_eq!("TW".parse::<SpecialCell>().ok(), Some(SpecialCell::TripleWord));
    }
}
