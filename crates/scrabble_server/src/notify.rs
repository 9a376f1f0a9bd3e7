//! Settlement notifications.
//!
//! Delivery is an external concern. The service hands each seated player's
//! final result to a [`Notifier`] after the settling transaction commits;
//! delivery failures are logged and never reach the caller.

use std::sync::Arc;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Final result for one player of a settled game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, new)]
pub struct SettlementNotice {
    /// Settled game.
    game_id: String,
    /// Recipient.
    player_id: i64,
    /// Recipient's score after settlement.
    final_score: i32,
    /// Winner of the game.
    winner: Option<i64>,
}

impl SettlementNotice {
    /// Whether the recipient won.
    pub fn won(&self) -> bool {
        self.winner == Some(self.player_id)
    }
}

/// Notification delivery error.
#[derive(Debug, Clone, Display, Error)]
#[display("Notify error: {} at {}:{}", message, file, line)]
pub struct NotifyError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl NotifyError {
    /// Creates a new notification error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Delivers settlement results to players.
pub trait Notifier: Send + Sync {
    /// Sends one notice.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery failed.
    fn notify(&self, notice: &SettlementNotice) -> Result<(), NotifyError>;
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &SettlementNotice) -> Result<(), NotifyError> {
        info!(
            game_id = %notice.game_id,
            player_id = notice.player_id,
            final_score = notice.final_score,
            won = notice.won(),
            "Settlement notice"
        );
        Ok(())
    }
}

/// Delivers every notice, logging and dropping failures.
#[instrument(skip_all, fields(count = notices.len()))]
pub fn deliver(notifier: &dyn Notifier, notices: &[SettlementNotice]) {
    for notice in notices {
        if let Err(e) = notifier.notify(notice) {
            warn!(player_id = notice.player_id, error = %e, "Settlement notice not delivered");
        }
    }
}

/// Delivers notices off the caller's path.
///
/// Inside a tokio runtime the work goes to the blocking pool and the caller
/// does not wait; otherwise delivery happens inline.
pub fn dispatch(notifier: Arc<dyn Notifier>, notices: Vec<SettlementNotice>) {
    if notices.is_empty() {
        return;
    }
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            debug!(count = notices.len(), "Dispatching notices to blocking pool");
            handle.spawn_blocking(move || deliver(notifier.as_ref(), &notices));
        }
        Err(_) => deliver(notifier.as_ref(), &notices),
    }
}
