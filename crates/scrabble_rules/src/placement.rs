//! Placement payloads: where tiles go and which of them are jokers.

use serde::{Deserialize, Serialize};

/// A board coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column (0-14).
    pub x: u8,
    /// Row (0-14).
    pub y: u8,
}

impl Position {
    /// Creates a position.
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One tile placed during a move.
///
/// `letter` is always the face value played, even when the physical tile is
/// a joker; `blank` marks that case and makes the tile worth nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedLetter {
    /// Column (0-14).
    pub x: u8,
    /// Row (0-14).
    pub y: u8,
    /// Face value.
    #[serde(rename = "char")]
    pub letter: char,
    /// True when the tile is a joker.
    #[serde(default)]
    pub blank: bool,
}

impl PlacedLetter {
    /// A regular tile.
    pub fn new(x: u8, y: u8, letter: char) -> Self {
        Self {
            x,
            y,
            letter,
            blank: false,
        }
    }

    /// A joker played as `letter`.
    pub fn blank(x: u8, y: u8, letter: char) -> Self {
        Self {
            x,
            y,
            letter,
            blank: true,
        }
    }

    /// Target cell.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Body of a move request: the tiles placed this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Tiles placed this turn. Empty for a pass record.
    pub letters: Vec<PlacedLetter>,
}

impl MoveRequest {
    /// Wraps a placement.
    pub fn new(letters: Vec<PlacedLetter>) -> Self {
        Self { letters }
    }

    /// The sentinel stored in history for a pass.
    pub fn pass() -> Self {
        Self::default()
    }

    /// Whether this record is a pass.
    pub fn is_pass(&self) -> bool {
        self.letters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = r#"{"letters":[{"x":7,"y":7,"char":"A"},{"x":8,"y":7,"char":"B","blank":true}]}"#;
        let req: MoveRequest = serde_json::from_str(json).expect("parse");
        assert_eq!(req.letters[0], PlacedLetter::new(7, 7, 'A'));
        assert_eq!(req.letters[1], PlacedLetter::blank(8, 7, 'B'));
    }

    #[test]
    fn test_pass_sentinel() {
        let pass = MoveRequest::pass();
        assert!(pass.is_pass());
        assert_eq!(serde_json::to_string(&pass).expect("json"), r#"{"letters":[]}"#);
    }
}
