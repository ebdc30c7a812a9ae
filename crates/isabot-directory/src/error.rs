// ABOUTME: Error types for isabot-directory.
// ABOUTME: Defines DirectoryError covering history fetch failures and bad filter arguments.

use thiserror::Error;

/// Errors produced by directory queries.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The history provider could not fetch messages.
    #[error("history fetch failed: {0}")]
    History(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A filter clause could not be parsed from the raw argument.
    #[error("invalid filter clause: {0:?} (expected key=value)")]
    InvalidFilter(String),
}

impl DirectoryError {
    /// Wrap any provider error as a history failure.
    pub fn history<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DirectoryError::History(err.into())
    }
}

/// Result type alias using DirectoryError.
pub type Result<T> = std::result::Result<T, DirectoryError>;
