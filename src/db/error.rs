//! # Persistence Errors

use std::time::Duration;

use thiserror::Error;

use crate::error::ApiError;

/// Result type for persistence operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DbError {
    /// A batch operation was called with zero records. Rejected before a
    /// connection is acquired.
    #[error("empty batch")]
    EmptyBatch,

    /// A record's value count does not match the target table spec
    #[error("record has {got} values, table expects {expected}")]
    Arity { expected: usize, got: usize },

    /// No connection became available within the acquire timeout
    #[error("connection pool exhausted")]
    PoolTimeout,

    /// Uniqueness violation on the declared key
    #[error("duplicate key")]
    Duplicate,

    /// The statement or transaction exceeded the configured timeout
    #[error("statement timed out after {0:?}")]
    Timeout(Duration),

    /// Statement execution failed
    #[error("query failed: {0}")]
    Query(String),

    /// Begin or commit failed; state must be treated as rolled back
    #[error("transaction failed: {0}")]
    Tx(String),
}

impl DbError {
    /// Classify a driver error into the persistence taxonomy
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => DbError::PoolTimeout,
            sqlx::Error::PoolClosed => DbError::PoolTimeout,
            sqlx::Error::Database(d) if d.is_unique_violation() => DbError::Duplicate,
            _ => DbError::Query(e.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::EmptyBatch => {
                ApiError::Validation("No records were provided to save.".to_string())
            }
            DbError::Arity { .. } => ApiError::Persistence,
            DbError::PoolTimeout => ApiError::Unavailable,
            DbError::Duplicate => ApiError::Duplicate("Duplicate record.".to_string()),
            DbError::Timeout(_) | DbError::Query(_) | DbError::Tx(_) => ApiError::Persistence,
        }
    }
}
