//! A player's hand and its exchanges with the bag.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::letters::{JOKER, RACK_SIZE, letter_value};
use crate::{Bag, MoveError, PlacedLetter};

/// Up to seven tiles held by one player; `?` is an unresolved joker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Rack {
    tiles: Vec<char>,
}

impl Rack {
    /// Rebuilds a rack from its stored form.
    pub fn from_letters(letters: &str) -> Self {
        Self {
            tiles: letters.chars().collect(),
        }
    }

    /// Tiles in hand.
    pub fn tiles(&self) -> &[char] {
        &self.tiles
    }

    /// Number of tiles in hand.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the hand is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// How many copies of `tile` are held.
    pub fn count(&self, tile: char) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Sum of face values left in hand; jokers count 0.
    pub fn residual_value(&self) -> i32 {
        self.tiles.iter().map(|&t| letter_value(t)).sum()
    }

    /// Whether every placed tile can come out of this rack.
    ///
    /// A blank-flagged placement needs a `?`; any other placement needs its
    /// literal letter. No joker is substituted implicitly.
    pub fn can_supply(&self, placed: &[PlacedLetter]) -> bool {
        let mut remaining = self.clone();
        remaining.remove_played(placed).is_ok()
    }

    /// Takes the played tiles out of the rack.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InsufficientRack`] if a tile is missing; the rack
    /// is left unchanged in that case.
    pub fn remove_played(&mut self, placed: &[PlacedLetter]) -> Result<(), MoveError> {
        let mut tiles = self.tiles.clone();
        for l in placed {
            let wanted = if l.blank { JOKER } else { l.letter };
            let idx = tiles
                .iter()
                .position(|&t| t == wanted)
                .ok_or(MoveError::InsufficientRack)?;
            tiles.remove(idx);
        }
        self.tiles = tiles;
        Ok(())
    }

    /// Draws from the bag until the rack is full or the bag is empty.
    /// Returns how many tiles were drawn.
    #[instrument(skip(self, bag), fields(rack = self.tiles.len(), bag = bag.len()))]
    pub fn refill(&mut self, bag: &mut Bag) -> usize {
        let drawn = bag.draw(RACK_SIZE.saturating_sub(self.tiles.len()));
        debug!(drawn = drawn.len(), "Refilled rack");
        self.tiles.extend_from_slice(&drawn);
        drawn.len()
    }

    /// Empties the rack, returning its tiles.
    pub fn take_all(&mut self) -> Vec<char> {
        std::mem::take(&mut self.tiles)
    }

    /// The rack as stored.
    pub fn letters(&self) -> String {
        self.tiles.iter().collect()
    }
}

impl From<String> for Rack {
    fn from(letters: String) -> Self {
        Self::from_letters(&letters)
    }
}

impl From<Rack> for String {
    fn from(rack: Rack) -> Self {
        rack.letters()
    }
}

impl std::fmt::Display for Rack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters())
    }
}
