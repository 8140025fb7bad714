//! Error types for scoring.

use thiserror::Error;
use urlrisk_extract::ExtractError;

/// Errors that can occur while producing a verdict.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// The classifier could not produce a label
    #[error("classifier failed: {0}")]
    Classifier(String),

    /// Classifier parameters are unusable
    #[error("invalid classifier model: {0}")]
    InvalidModel(String),

    /// Extraction collaborators could not be built
    #[error("extraction setup failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoreError>;
