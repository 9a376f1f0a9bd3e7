//! The shared pool of undrawn tiles.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::letters;

/// Undrawn tiles of a game, drawn from the front.
///
/// Persisted as a plain string of letters (`?` for jokers).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Bag {
    tiles: Vec<char>,
}

impl Bag {
    /// A complete, unshuffled French tile set.
    pub fn full() -> Self {
        Self {
            tiles: letters::full_set(),
        }
    }

    /// Rebuilds a bag from its stored form, keeping order.
    pub fn from_letters(letters: &str) -> Self {
        Self {
            tiles: letters.chars().collect(),
        }
    }

    /// Uniform in-place permutation.
    #[instrument(skip(self, rng), fields(len = self.tiles.len()))]
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles.shuffle(rng);
    }

    /// Removes and returns up to `n` tiles from the front.
    pub fn draw(&mut self, n: usize) -> Vec<char> {
        let count = n.min(self.tiles.len());
        self.tiles.drain(..count).collect()
    }

    /// Returns tiles to the back of the bag. Callers reshuffle when order matters.
    pub fn put_back(&mut self, tiles: &[char]) {
        self.tiles.extend_from_slice(tiles);
    }

    /// Number of tiles left.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when no tile is left.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The remaining tiles as stored.
    pub fn letters(&self) -> String {
        self.tiles.iter().collect()
    }
}

impl From<String> for Bag {
    fn from(letters: String) -> Self {
        Self::from_letters(&letters)
    }
}

impl From<Bag> for String {
    fn from(bag: Bag) -> Self {
        bag.letters()
    }
}
