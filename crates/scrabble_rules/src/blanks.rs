//! Optional pre-processing that marks joker plays before validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, instrument};

use crate::letters::JOKER;
use crate::{PlacedLetter, Rack};

/// How unflagged letters the rack cannot supply are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlankPolicy {
    /// Only letters flagged `blank` consume a joker.
    #[default]
    Explicit,
    /// Missing letters are covered by jokers, see [`resolve_blanks`].
    Resolve,
}

impl BlankPolicy {
    /// Prepares a placement for validation against `rack`.
    pub fn apply(self, rack: &Rack, letters: &[PlacedLetter]) -> Vec<PlacedLetter> {
        match self {
            Self::Explicit => letters.to_vec(),
            Self::Resolve => resolve_blanks(rack, letters),
        }
    }
}

/// Fills in missing `blank` flags from the rack.
///
/// Explicitly flagged letters keep their flag and reserve a joker first.
/// Unflagged letters consume their literal tile while the rack holds one;
/// the rest are flagged as jokers while jokers remain. Letters that cannot be
/// covered are returned unchanged so validation reports the shortfall.
#[instrument(skip(rack, letters), fields(rack = %rack, count = letters.len()))]
pub fn resolve_blanks(rack: &Rack, letters: &[PlacedLetter]) -> Vec<PlacedLetter> {
    let mut available: HashMap<char, usize> = HashMap::new();
    for &tile in rack.tiles() {
        *available.entry(tile).or_default() += 1;
    }

    let mut take = |tile: char| match available.get_mut(&tile) {
        Some(n) if *n > 0 => {
            *n -= 1;
            true
        }
        _ => false,
    };

    for _ in letters.iter().filter(|l| l.blank) {
        take(JOKER);
    }

    let literal: Vec<bool> = letters
        .iter()
        .map(|l| !l.blank && take(l.letter))
        .collect();

    letters
        .iter()
        .zip(literal)
        .map(|(l, covered)| {
            if l.blank || covered || !take(JOKER) {
                *l
            } else {
                debug!(x = l.x, y = l.y, letter = %l.letter, "Resolved letter as joker");
                PlacedLetter { blank: true, ..*l }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_letter_becomes_blank() {
        let rack = Rack::from_letters("CHA?");
        let letters = [
            PlacedLetter::new(5, 7, 'C'),
            PlacedLetter::new(6, 7, 'H'),
            PlacedLetter::new(7, 7, 'A'),
            PlacedLetter::new(8, 7, 'T'),
        ];
        let resolved = resolve_blanks(&rack, &letters);
        assert!(!resolved[0].blank);
        assert!(resolved[3].blank);
        assert!(rack.can_supply(&resolved));
    }

    #[test]
    fn test_literal_tiles_are_preferred_over_jokers() {
        // The second A is missing, not the first: literal tiles are matched
        // before any joker is spent.
        let rack = Rack::from_letters("A?");
        let letters = [PlacedLetter::new(7, 7, 'A'), PlacedLetter::new(8, 7, 'A')];
        let resolved = resolve_blanks(&rack, &letters);
        assert_eq!(resolved.iter().filter(|l| l.blank).count(), 1);
        assert!(rack.can_supply(&resolved));
    }

    #[test]
    fn test_explicit_flag_is_kept() {
        let rack = Rack::from_letters("E?");
        let letters = [PlacedLetter::blank(7, 7, 'E')];
        assert_eq!(resolve_blanks(&rack, &letters), letters.to_vec());
    }

    #[test]
    fn test_flagged_letter_reserves_the_joker() {
        let rack = Rack::from_letters("?");
        let letters = [PlacedLetter::blank(7, 7, 'E'), PlacedLetter::new(8, 7, 'Z')];
        let resolved = resolve_blanks(&rack, &letters);
        assert!(resolved[0].blank);
        assert!(!resolved[1].blank);
    }

    #[test]
    fn test_explicit_policy_leaves_flags_alone() {
        let rack = Rack::from_letters("?");
        let letters = [PlacedLetter::new(7, 7, 'Q')];
        assert_eq!(BlankPolicy::Explicit.apply(&rack, &letters), letters.to_vec());
        assert!(BlankPolicy::Resolve.apply(&rack, &letters)[0].blank);
    }

    #[test]
    fn test_unresolvable_letter_is_left_alone() {
        let rack = Rack::from_letters("AB");
        let letters = [PlacedLetter::new(7, 7, 'Z')];
        let resolved = resolve_blanks(&rack, &letters);
        assert!(!resolved[0].blank);
        assert!(!rack.can_supply(&resolved));
    }
}
