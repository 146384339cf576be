//! # Database Error Types

use thiserror::Error;
use warden_core::PoolError;

/// Errors that can occur in the database pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// Slot pool failure: no free connection or result-set slot, or a stale handle.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The driver could not open the database. No slot was consumed.
    #[error("failed to open {locator}: {reason}")]
    AcquisitionFailed {
        /// What was being opened.
        locator: String,
        /// Driver message.
        reason: String,
    },

    /// The connection was closed but is still held by a lock.
    #[error("connection {index} is closed")]
    ConnectionClosed {
        /// Connection index.
        index: u32,
    },

    /// The driver rejected a query.
    #[error("query failed: {reason}")]
    QueryFailed {
        /// Driver message.
        reason: String,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
