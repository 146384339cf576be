//! # Pool Error Types
//!
//! All errors that can occur while operating a slot pool.

use thiserror::Error;

/// Errors that can occur in a slot pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is claimed. Not fatal: the caller rejects the new resource.
    #[error("pool exhausted: all {capacity} slots are claimed")]
    Exhausted {
        /// Capacity of the pool.
        capacity: usize,
    },

    /// The index is the sentinel, unclaimed, already released, or the handle is stale.
    #[error("invalid handle: index {index}")]
    InvalidHandle {
        /// The offending index.
        index: u32,
    },

    /// `unlock` was called on a slot with no outstanding lock.
    #[error("slot {index} is not locked")]
    NotLocked {
        /// The offending index.
        index: u32,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
