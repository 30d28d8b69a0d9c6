//! API handlers for the board.

pub mod replies;
pub mod threads;

pub use replies::*;
pub use threads::*;

use sqlx::pool::PoolConnection;
use sqlx::Sqlite;

use crate::auth::{Hasher, PasswordError};
use crate::board::parse_id;
use crate::web::error::ApiError;
use crate::{BoardError, Database};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database pool.
    pub db: Database,
    /// Delete password hasher.
    pub hasher: Hasher,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, hasher: Hasher) -> Self {
        Self { db, hasher }
    }

    /// Check out a store connection for the duration of a request.
    ///
    /// The connection returns to the pool when the guard drops.
    pub(crate) async fn connection(&self) -> Result<PoolConnection<Sqlite>, ApiError> {
        self.db.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {}", e);
            ApiError::store(&e, "Service Unavailable")
        })
    }

    /// Hash a delete password off the async executor.
    pub(crate) async fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        self.hasher
            .hash_blocking(password.to_string())
            .await
            .map_err(|e| BoardError::from(e).into())
    }

    /// Check a delete password against a stored hash.
    pub(crate) async fn check_password(&self, password: &str, hash: &str) -> Result<(), ApiError> {
        match self
            .hasher
            .verify_blocking(password.to_string(), hash.to_string())
            .await
        {
            Ok(()) => Ok(()),
            Err(PasswordError::VerificationFailed) => {
                Err(BoardError::Auth("incorrect password".to_string()).into())
            }
            Err(e) => Err(BoardError::from(e).into()),
        }
    }
}

/// Parse an identity, answering with `message` if it is malformed.
pub(crate) fn identity(value: &str, message: impl Into<String>) -> Result<uuid::Uuid, ApiError> {
    parse_id(value).ok_or_else(|| ApiError::bad_request(message))
}
