//! Turn pointer, pass counter and termination rules.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, instrument};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Moves are accepted.
    Ongoing,
    /// Settled; no further change.
    Ended,
}

/// What happens after a turn-consuming action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Play moves on to the seat at `next`.
    Continue {
        /// Seat position that plays next.
        next: usize,
    },
    /// The game ends and must be settled.
    End {
        /// Seat that emptied its rack, if the game ended that way.
        finisher: Option<usize>,
    },
}

/// Turn bookkeeping for a seated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    current: usize,
    seats: usize,
    passes: u32,
    status: GameStatus,
}

impl TurnState {
    /// Fresh state: seat 0 to play, no passes.
    pub fn new(seats: usize) -> Self {
        Self::restore(0, seats, 0, GameStatus::Ongoing)
    }

    /// Rebuilds the state from stored fields.
    pub fn restore(current: usize, seats: usize, passes: u32, status: GameStatus) -> Self {
        Self {
            current,
            seats,
            passes,
            status,
        }
    }

    /// Seat position holding the turn.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of seats.
    pub fn seats(&self) -> usize {
        self.seats
    }

    /// Consecutive passes so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether the game still accepts actions.
    pub fn is_ongoing(&self) -> bool {
        self.status == GameStatus::Ongoing
    }

    fn next_seat(&self) -> usize {
        if self.seats == 0 {
            0
        } else {
            (self.current + 1) % self.seats
        }
    }

    fn advance(&mut self) -> Transition {
        self.current = self.next_seat();
        Transition::Continue { next: self.current }
    }

    fn end(&mut self, finisher: Option<usize>) -> Transition {
        self.status = GameStatus::Ended;
        Transition::End { finisher }
    }

    /// A successful placement.
    ///
    /// Resets the pass counter. If the mover's rack and the bag are both
    /// empty the game ends with the mover as finisher.
    #[instrument(skip(self), fields(current = self.current))]
    pub fn after_move(&mut self, rack_empty: bool, bag_empty: bool) -> Transition {
        self.passes = 0;
        if rack_empty && bag_empty {
            debug!("Mover went out with an empty bag");
            let finisher = self.current;
            return self.end(Some(finisher));
        }
        self.advance()
    }

    /// A pass. Ends the game without finisher once every seat has passed
    /// twice in a row.
    #[instrument(skip(self), fields(current = self.current, passes = self.passes))]
    pub fn after_pass(&mut self) -> Transition {
        self.passes += 1;
        if self.passes as usize >= 2 * self.seats {
            debug!(passes = self.passes, "Pass limit reached");
            return self.end(None);
        }
        self.advance()
    }

    /// A rack exchange: the turn moves on, the pass counter is untouched.
    pub fn after_exchange(&mut self) -> Transition {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_advances_cyclically() {
        let mut turn = TurnState::new(3);
        assert_eq!(turn.after_move(false, false), Transition::Continue { next: 1 });
        assert_eq!(turn.after_move(false, false), Transition::Continue { next: 2 });
        assert_eq!(turn.after_move(false, false), Transition::Continue { next: 0 });
    }

    #[test]
    fn test_move_resets_passes() {
        let mut turn = TurnState::new(2);
        turn.after_pass();
        turn.after_pass();
        turn.after_move(false, false);
        assert_eq!(turn.passes(), 0);
    }

    #[test]
    fn test_empty_rack_alone_does_not_end() {
        let mut turn = TurnState::new(2);
        assert_eq!(turn.after_move(true, false), Transition::Continue { next: 1 });
        assert!(turn.is_ongoing());
    }

    #[test]
    fn test_going_out_ends_with_finisher() {
        let mut turn = TurnState::restore(1, 2, 3, GameStatus::Ongoing);
        assert_eq!(turn.after_move(true, true), Transition::End { finisher: Some(1) });
        assert_eq!(turn.status(), GameStatus::Ended);
    }

    #[test]
    fn test_two_rounds_of_passes_end_game() {
        let mut turn = TurnState::new(2);
        for _ in 0..3 {
            assert!(matches!(turn.after_pass(), Transition::Continue { .. }));
        }
        assert_eq!(turn.after_pass(), Transition::End { finisher: None });
    }

    #[test]
    fn test_exchange_keeps_pass_counter() {
        let mut turn = TurnState::new(2);
        turn.after_pass();
        assert_eq!(turn.after_exchange(), Transition::Continue { next: 0 });
        assert_eq!(turn.passes(), 1);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(GameStatus::Ongoing.to_string(), "ongoing");
        assert_eq!("ended".parse::<GameStatus>().ok(), Some(GameStatus::Ended));
    }
}
