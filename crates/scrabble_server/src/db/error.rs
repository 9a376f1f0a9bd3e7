//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
    /// Set when a unique constraint rejected the write.
    pub unique_violation: bool,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
            unique_violation: false,
        }
    }

    /// Stored data that no longer decodes.
    #[track_caller]
    pub fn corrupt(what: &str, err: impl std::fmt::Display) -> Self {
        Self::new(format!("Corrupt {}: {}", what, err))
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        let unique_violation = matches!(
            err,
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
        );
        Self {
            unique_violation,
            ..Self::new(format!("Diesel error: {}", err))
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
