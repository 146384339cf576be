//! Native storage engine seam.

use thiserror::Error;

/// Failure reported by a driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DriverError(pub String);

/// The native engine behind the pool.
///
/// Handles are opaque to the pool; it only decides when they are opened and closed.
pub trait DatabaseDriver {
    /// Native connection handle.
    type Connection;
    /// Native result handle.
    type Rows;

    /// Opens (or creates) the database at `locator`.
    ///
    /// # Errors
    ///
    /// Returns the driver's reason when the database cannot be opened.
    fn open(&mut self, locator: &str) -> Result<Self::Connection, DriverError>;

    /// Runs `sql` on an open connection.
    ///
    /// # Errors
    ///
    /// Returns the driver's reason when the query fails.
    fn query(&mut self, connection: &mut Self::Connection, sql: &str) -> Result<Self::Rows, DriverError>;

    /// Frees a result.
    fn free_rows(&mut self, rows: Self::Rows);

    /// Closes a connection. Its results have already been freed.
    fn close(&mut self, connection: Self::Connection);
}
