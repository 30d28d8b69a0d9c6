//! Error types for anonboard.

use thiserror::Error;

use crate::auth::PasswordError;

/// Common error type for anonboard.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Database error.
    ///
    /// Errors from sqlx are automatically converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error (pool exhausted, file unreachable, ...).
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for client input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Delete password did not match.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Password hashing error.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BoardError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                BoardError::DatabaseConnection(e.to_string())
            }
            _ => BoardError::Database(e.to_string()),
        }
    }
}

/// Result type alias for anonboard operations.
pub type Result<T> = std::result::Result<T, BoardError>;
