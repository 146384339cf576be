//! # WARDEN Databases
//!
//! Database connections managed by a [`warden_core::SlotPool`].
//!
//! ## Design Principles
//!
//! 1. **Open before commit** - the native connection is opened before its slot is claimed,
//!    so a failed open never consumes a slot
//! 2. **Children first** - closing a connection frees its result sets, then the native handle
//! 3. **Idempotent close** - closing a stale or already-closed handle returns `false`
//!
//! The storage engine itself sits behind [`DatabaseDriver`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use warden_databases::{DatabasePool, DatabasesConfig};
//!
//! let mut databases = DatabasePool::new(SqliteDriver::default(), &DatabasesConfig::default())?;
//! let db = databases.open("scriptfiles/bans.db")?;
//! let rows = databases.execute_query(db, "SELECT name FROM bans")?;
//! databases.free_result_set(db, rows);
//! databases.close(db);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod pool;

pub use config::DatabasesConfig;
pub use connection::{DatabaseConnection, ResultSet};
pub use driver::{DatabaseDriver, DriverError};
pub use error::{DatabaseError, DatabaseResult};
pub use pool::DatabasePool;
