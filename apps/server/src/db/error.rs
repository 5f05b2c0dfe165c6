//! Database error types.

use jtyping_core::QuizError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt record body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}
