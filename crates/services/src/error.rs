//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::GameResultError;
use storage::sqlite::SqliteInitError;

/// Errors reported by a question source. The quiz shows them to the player.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("failed to load movies: {0}")]
    Unavailable(String),
    #[error("the movie list is empty")]
    EmptyCatalog,
    #[error("no more questions available")]
    Exhausted,
    #[error("failed to read movie file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed movie file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error(transparent)]
    GameResult(#[from] GameResultError),
}

/// Errors emitted while talking to a running quiz.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("quiz runtime has stopped")]
    Closed,
}

/// Errors emitted while bootstrapping quiz services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
