//! Error types for Hushlight core.

use thiserror::Error;

/// Core error type for Hushlight operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Invalid mode: {0:?}")]
    InvalidMode(String),

    #[error("Invalid signal mode: {0:?}")]
    InvalidSignalMode(String),

    #[error("Invalid notification mode: {0:?}")]
    InvalidNotificationMode(String),

    #[error("Invalid notification interval: {0:?}")]
    InvalidInterval(String),
}

/// Result type alias for Hushlight core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
