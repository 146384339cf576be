//! # WARDEN Core
//!
//! Fixed-capacity slot pools shared by every resource kind in WARDEN.
//!
//! ## Architecture Rules
//!
//! 1. **Index, not pointer** - callers keep a [`SlotIndex`] or [`PoolHandle`], never a reference
//! 2. **Index 0 is never content** - [`SlotIndex::NONE`] means "no slot"
//! 3. **Locked slots outlive release** - a release on a locked slot is deferred to the last unlock
//! 4. **Single owner** - pools are not synchronized; one thread drives each pool
//!
//! ## Example
//!
//! ```rust
//! use warden_core::SlotPool;
//!
//! let mut pool: SlotPool<u32> = SlotPool::new(8);
//! let index = pool.claim().expect("pool has room");
//! pool.lock(index).unwrap();
//! assert_eq!(pool.release(index, false).unwrap(), None); // deferred
//! assert!(pool.valid(index));
//! assert_eq!(pool.unlock(index).unwrap(), Some(0)); // released now
//! assert!(!pool.valid(index));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod pool;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use pool::{PoolHandle, SlotGuard, SlotIndex, SlotPool};
