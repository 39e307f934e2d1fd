//! Error types for history controllers.

use thiserror::Error;

/// Main error type for history operations.
///
/// Undo, redo and writes never fail; errors only come from parsing host
/// input and from starting the debounce timer.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Failed to start debounce timer: {0}")]
    Timer(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Serialization(e.to_string())
    }
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
