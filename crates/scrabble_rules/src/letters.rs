//! French tile set: letter distribution and face values.

/// The joker (blank) tile as it appears in a rack or bag.
pub const JOKER: char = '?';

/// Number of tiles a full rack holds.
pub const RACK_SIZE: usize = 7;

/// Number of tiles in a complete set.
pub const POOL_SIZE: usize = 102;

/// Bonus for placing a full rack in one move.
pub const BINGO_BONUS: i32 = 50;

/// Tile counts of the French set, jokers included.
pub const FRENCH_DISTRIBUTION: [(char, usize); 27] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 3),
    ('E', 15),
    ('F', 2),
    ('G', 2),
    ('H', 2),
    ('I', 8),
    ('J', 1),
    ('K', 1),
    ('L', 5),
    ('M', 3),
    ('N', 6),
    ('O', 6),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 6),
    ('T', 6),
    ('U', 6),
    ('V', 2),
    ('W', 1),
    ('X', 1),
    ('Y', 1),
    ('Z', 1),
    (JOKER, 2),
];

/// Face value of a tile. Jokers and anything unknown are worth 0.
pub fn letter_value(letter: char) -> i32 {
    match letter {
        'A' | 'E' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 1,
        'D' | 'G' | 'M' => 2,
        'B' | 'C' | 'P' => 3,
        'F' | 'H' | 'V' => 4,
        'J' | 'Q' => 8,
        'K' | 'W' | 'X' | 'Y' | 'Z' => 10,
        _ => 0,
    }
}

/// Whether `letter` can be placed on the board as a face value.
pub fn is_playable(letter: char) -> bool {
    letter.is_ascii_uppercase()
}

/// Builds the full, unshuffled tile set.
pub fn full_set() -> Vec<char> {
    FRENCH_DISTRIBUTION
        .iter()
        .flat_map(|&(letter, count)| std::iter::repeat_n(letter, count))
        .collect()
}
