//! Error types for jtyping-core.

use thiserror::Error;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors raised by the quiz engine. All of them are recoverable by the
/// caller; none should reach the user as a hard failure.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no candidates match the active filter")]
    NoCandidates,

    #[error("answer {input:?} contains characters outside the kana script")]
    MalformedAnswer { input: String },

    #[error("answer {input:?} does not fit the shape of {surface:?}")]
    ShapeMismatch { input: String, surface: String },

    #[error("data integrity: {0}")]
    DataIntegrity(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u32),
}

impl QuizError {
    /// Whether the error means "refuse to submit" rather than a data problem.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, Self::MalformedAnswer { .. } | Self::ShapeMismatch { .. })
    }
}
