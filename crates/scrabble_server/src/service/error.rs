//! Service-level errors and their kinds.

use derive_more::{Display, Error};
use scrabble_rules::MoveError;
use serde::Serialize;
use strum::{Display as StrumDisplay, EnumString};

use crate::db::DbError;

/// Broad class of a [`GameError`], for transports to switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, StrumDisplay, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The caller may not perform this action.
    Authorization,
    /// The request is malformed or breaks a rule; fix and retry.
    Validation,
    /// Something referenced is missing or used up.
    Resource,
    /// Storage failure; details stay server-side.
    Infrastructure,
}

/// Error returned by [`GameService`](crate::GameService) operations.
#[derive(Debug, Clone, Display, Error)]
pub enum GameError {
    /// A move, pass or exchange broke a game rule.
    #[display("{}", _0)]
    Move(MoveError),

    /// The caller has no seat in the game.
    #[display("Player {} is not seated in game {}", player_id, game_id)]
    NotSeated {
        /// Caller.
        player_id: i64,
        /// Game.
        game_id: String,
    },

    /// Only the game's creator may do this.
    #[display("Only the creator may modify game {}", _0)]
    NotCreator(#[error(not(source))] String),

    /// No such game.
    #[display("Game {} not found", _0)]
    GameNotFound(#[error(not(source))] String),

    /// No such player.
    #[display("Player {} not found", _0)]
    PlayerNotFound(#[error(not(source))] String),

    /// The display name belongs to someone else.
    #[display("Display name {} is already taken", _0)]
    NameTaken(#[error(not(source))] String),

    /// The request is malformed.
    #[display("Invalid request: {}", _0)]
    InvalidRequest(#[error(not(source))] String),

    /// Storage failed; the operation was rolled back.
    #[display("{}", _0)]
    Storage(DbError),
}

impl GameError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Move(MoveError::NotYourTurn) | Self::NotSeated { .. } | Self::NotCreator(_) => {
                ErrorKind::Authorization
            }
            Self::Move(MoveError::NoLettersLeft | MoveError::GameOver)
            | Self::GameNotFound(_)
            | Self::PlayerNotFound(_)
            | Self::NameTaken(_) => ErrorKind::Resource,
            Self::Move(_) | Self::InvalidRequest(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Infrastructure,
        }
    }

    /// The rule violation, if this is one.
    pub fn move_error(&self) -> Option<&MoveError> {
        match self {
            Self::Move(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

impl From<DbError> for GameError {
    fn from(err: DbError) -> Self {
        Self::Storage(err)
    }
}

impl From<diesel::result::Error> for GameError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Storage(DbError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            GameError::from(MoveError::NotYourTurn).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            GameError::from(MoveError::InvalidWord("ZZZ".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            GameError::from(MoveError::NoLettersLeft).kind(),
            ErrorKind::Resource
        );
        assert_eq!(
            GameError::GameNotFound("x".into()).kind(),
            ErrorKind::Resource
        );
        assert_eq!(
            GameError::from(DbError::new("disk")).kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_invalid_word_message_names_word() {
        let err = GameError::from(MoveError::InvalidWord("XYZZY".into()));
        assert_eq!(err.to_string(), "Invalid word played: XYZZY");
    }
}
