//! End-of-game score adjustments and winner selection.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::Rack;

/// A seat's position at the end of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Player holding the seat.
    pub player_id: i64,
    /// Score before settlement; updated in place by [`settle`].
    pub score: i32,
    /// Tiles left in hand.
    pub rack: Rack,
}

/// Result of settling a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Highest final score, ties to the lowest player id.
    winner: Option<i64>,
    /// Residual value subtracted from each seat, in standing order.
    penalties: Vec<i32>,
    /// Points credited to the player who went out.
    finisher_bonus: i32,
}

/// Applies end-of-game adjustments and picks the winner.
///
/// Each seat loses the face value left in its rack. The finisher, if any,
/// gains the sum of the other seats' residuals. Scores are updated in
/// `standings`.
#[instrument(skip(standings), fields(seats = standings.len()))]
pub fn settle(standings: &mut [Standing], finisher: Option<i64>) -> SettlementOutcome {
    let penalties: Vec<i32> = standings.iter().map(|s| s.rack.residual_value()).collect();

    for (standing, penalty) in standings.iter_mut().zip(&penalties) {
        standing.score -= penalty;
        debug!(player_id = standing.player_id, penalty, "Residual rack deducted");
    }

    let mut finisher_bonus = 0;
    if let Some(finisher) = finisher {
        finisher_bonus = standings
            .iter()
            .zip(&penalties)
            .filter(|(s, _)| s.player_id != finisher)
            .map(|(_, p)| *p)
            .sum();
        if finisher_bonus > 0 {
            if let Some(standing) = standings.iter_mut().find(|s| s.player_id == finisher) {
                standing.score += finisher_bonus;
            }
        }
    }

    let winner = standings
        .iter()
        .max_by(|a, b| a.score.cmp(&b.score).then(b.player_id.cmp(&a.player_id)))
        .map(|s| s.player_id);

    info!(?winner, ?finisher, finisher_bonus, "Game settled");
    SettlementOutcome {
        winner,
        penalties,
        finisher_bonus,
    }
}
