//! End-to-end rule scenarios on the in-memory game.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use scrabble_rules::{
    Bag, BlankCells, BlankPolicy, Board, Dictionary, Game, GameStatus, MoveError, POOL_SIZE,
    PlacedLetter, Rack, Seat, TurnState, WordList,
};

/// Accepts every word.
struct AnyWord;

impl Dictionary for AnyWord {
    fn exists(&self, _word: &str) -> bool {
        true
    }
}

fn game_with(racks: &[&str], bag: &str) -> Game {
    let seats = racks
        .iter()
        .enumerate()
        .map(|(i, r)| Seat::new(i as i64 + 1, Rack::from_letters(r), 0))
        .collect::<Vec<_>>();
    let turn = TurnState::new(seats.len());
    Game::restore(Board::empty(), Bag::from_letters(bag), seats, turn, BlankCells::new(), None)
}

fn chat() -> Vec<PlacedLetter> {
    vec![
        PlacedLetter::new(5, 7, 'C'),
        PlacedLetter::new(6, 7, 'H'),
        PlacedLetter::new(7, 7, 'A'),
        PlacedLetter::new(8, 7, 'T'),
    ]
}

#[test]
fn test_opening_chat_is_accepted_and_doubled() {
    let mut game = game_with(&["CHATXYZ", "EEEEEEE"], "AEIOUST");
    let dict = WordList::from_words(["chat"]);

    let outcome = game
        .play_move(1, &chat(), BlankPolicy::Explicit, &dict)
        .expect("opening move");

    assert_eq!(outcome.score().words().len(), 1);
    assert_eq!(outcome.score().words()[0].word(), "CHAT");
    assert_eq!(*outcome.score().total(), (3 + 4 + 1 + 1) * 2);
    assert_eq!(game.board().tile_count(), 4);
    assert_eq!(game.current_player(), Some(2));
}

#[test]
fn test_unknown_word_is_rejected() {
    let mut game = game_with(&["CHATXYZ", "EEEEEEE"], "AEIOUST");
    let dict = WordList::from_words(["CHIEN"]);

    let result = game.play_move(1, &chat(), BlankPolicy::Explicit, &dict);

    assert_eq!(result.map(|_| ()), Err(MoveError::InvalidWord("CHAT".to_string())));
    assert!(game.board().is_first_move());
    assert_eq!(game.seat(1).map(|s| s.rack().letters()), Some("CHATXYZ".to_string()));
}

#[test]
fn test_eight_letters_rejected_board_unchanged() {
    let mut game = game_with(&["AAAAAAA", "EEEEEEE"], "");
    let letters: Vec<_> = (4..12).map(|x| PlacedLetter::new(x, 7, 'A')).collect();

    let result = game.play_move(1, &letters, BlankPolicy::Explicit, &AnyWord);

    assert_eq!(result.map(|_| ()), Err(MoveError::TooManyLetters(8)));
    assert!(game.board().is_first_move());
    assert_eq!(game.current_player(), Some(1));
}

#[test]
fn test_four_passes_end_two_player_game() {
    let mut game = game_with(&["KA", "ZE"], "BCD");

    for player in [1, 2, 1] {
        let outcome = game.pass_turn(player).expect("pass");
        assert!(!outcome.game_over());
    }
    let outcome = game.pass_turn(2).expect("last pass");

    assert!(outcome.game_over());
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(*outcome.next_turn(), None);
    let settlement = outcome.settlement().as_ref().expect("settled");
    assert_eq!(settlement.penalties(), &vec![11, 11]);
    assert_eq!(*settlement.finisher_bonus(), 0);
    assert_eq!(*game.seats()[0].score(), -11);
    assert_eq!(*game.seats()[1].score(), -11);
    // Tied: the lower player id wins.
    assert_eq!(*settlement.winner(), Some(1));
}

#[test]
fn test_emptying_rack_with_empty_bag_ends_game() {
    let mut game = game_with(&["CHAT", "QE?"], "");
    let dict = WordList::from_words(["CHAT"]);

    let outcome = game
        .play_move(1, &chat(), BlankPolicy::Explicit, &dict)
        .expect("final move");

    assert!(outcome.game_over());
    assert!(outcome.rack().is_empty());
    // Opponent holds Q8 + E1 + joker 0.
    assert_eq!(*outcome.total_score(), 18 + 9);
    assert_eq!(*game.seats()[1].score(), -9);
    assert_eq!(outcome.winner(), Some(1));
    assert_eq!(game.current_player(), None);
}

#[test]
fn test_seven_letter_move_earns_bingo() {
    let mut game = game_with(&["ENTRAIS", "EEEEEEE"], "ABCDEFGHIJ");
    let letters: Vec<_> = "ENTRAIS"
        .chars()
        .zip(4u8..)
        .map(|(c, x)| PlacedLetter::new(x, 7, c))
        .collect();

    let outcome = game
        .play_move(1, &letters, BlankPolicy::Explicit, &AnyWord)
        .expect("bingo");

    assert!(outcome.score().bingo());
    assert_eq!(*outcome.score().total(), 7 * 2 + 50);
}

#[test]
fn test_overwrite_is_rejected() {
    let mut game = game_with(&["CHATXYZ", "SEEEEEE"], "AEIOUST");
    game.play_move(1, &chat(), BlankPolicy::Explicit, &AnyWord)
        .expect("opening move");

    let result = game.play_move(2, &[PlacedLetter::new(7, 7, 'E')], BlankPolicy::Explicit, &AnyWord);

    assert_eq!(result.map(|_| ()), Err(MoveError::CellOccupied { x: 7, y: 7 }));
    assert_eq!(game.board().get(7, 7).letter(), Some('A'));
}

#[test]
fn test_joker_from_earlier_move_scores_zero() {
    let mut game = game_with(&["CHA?", "SEEEEEE"], "KLMNOPQRS");
    let mut letters = chat();
    letters[3] = PlacedLetter::blank(8, 7, 'T');
    game.play_move(1, &letters, BlankPolicy::Explicit, &AnyWord)
        .expect("opening move");

    let outcome = game
        .play_move(2, &[PlacedLetter::new(9, 7, 'S')], BlankPolicy::Explicit, &AnyWord)
        .expect("extension");

    // CHATS with the joker T: 3 + 4 + 1 + 0 + 1, no premium on (9,7).
    assert_eq!(*outcome.score().total(), 9);
}

/// First empty cell a single tile can legally occupy.
fn open_cell(board: &Board) -> (u8, u8) {
    if board.is_first_move() {
        return (7, 7);
    }
    (0..15u8)
        .flat_map(|y| (0..15u8).map(move |x| (x, y)))
        .find(|&(x, y)| !board.is_occupied(x, y) && board.touches_tile(x, y))
        .unwrap_or((7, 7))
}

#[test]
fn test_tiles_are_conserved_through_random_play() {
    for seed in 0..5 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut game = Game::deal(&[10, 20, 30], &mut rng);
        assert_eq!(game.tile_count(), POOL_SIZE);

        let mut actions = 0;
        while game.status() == GameStatus::Ongoing && actions < 2_000 {
            let player = game.current_player().expect("ongoing game has a turn");
            let roll: f64 = rng.random();
            if roll < 0.1 {
                game.pass_turn(player).expect("pass");
            } else if roll < 0.2 {
                // Fails harmlessly once the bag is empty.
                let _ = game.exchange_rack(player, &mut rng);
            } else {
                let tile = game.seat(player).expect("seated").rack().tiles()[0];
                let (x, y) = open_cell(game.board());
                let letter = if tile == '?' {
                    PlacedLetter::blank(x, y, 'E')
                } else {
                    PlacedLetter::new(x, y, tile)
                };
                game.play_move(player, &[letter], BlankPolicy::Explicit, &AnyWord)
                    .expect("single connected tile is legal");
            }
            assert_eq!(game.tile_count(), POOL_SIZE, "seed {seed}, action {actions}");
            actions += 1;
        }
        assert_eq!(game.status(), GameStatus::Ended, "seed {seed} never finished");
    }
}

#[test]
fn test_same_seed_deals_same_racks() {
    let a = Game::deal(&[1, 2], &mut ChaCha20Rng::seed_from_u64(42));
    let b = Game::deal(&[1, 2], &mut ChaCha20Rng::seed_from_u64(42));
    assert_eq!(a.seats(), b.seats());
    assert_eq!(a.bag(), b.bag());
}
