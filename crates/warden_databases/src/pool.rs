//! # Database Pool
//!
//! Slot pool of [`DatabaseConnection`]s over one [`DatabaseDriver`].
//!
//! ## Open / Close
//!
//! ```text
//! open(locator)                         close(handle)
//!   find_free_index  (nothing claimed)    resolve handle        (stale -> false)
//!   driver.open      (fail -> no slot)    free every result set
//!   claim_with(hint) (commit)             driver.close
//!                                         release slot          (deferred while locked)
//! ```

use warden_core::{PoolError, PoolHandle, SlotIndex, SlotPool};

use crate::config::DatabasesConfig;
use crate::connection::{DatabaseConnection, ResultSet};
use crate::driver::DatabaseDriver;
use crate::error::{DatabaseError, DatabaseResult};

/// Pool of database connections.
///
/// Every connection that leaves the pool, whichever way, has its result sets freed and
/// its native handle closed.
pub struct DatabasePool<D: DatabaseDriver> {
    driver: D,
    connections: SlotPool<DatabaseConnection<D>>,
    max_result_sets: usize,
}

impl<D: DatabaseDriver> DatabasePool<D> {
    /// Creates a pool sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidConfig`] if the config does not validate.
    pub fn new(driver: D, config: &DatabasesConfig) -> DatabaseResult<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            connections: SlotPool::new(config.max_connections),
            max_result_sets: config.max_result_sets,
        })
    }

    /// The native driver.
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Opens a connection to `locator`.
    ///
    /// The native connection is opened before a slot is committed; if it fails, no
    /// slot is consumed.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] (wrapped) when every connection slot is in use,
    /// and [`DatabaseError::AcquisitionFailed`] when the driver cannot open `locator`.
    pub fn open(&mut self, locator: &str) -> DatabaseResult<PoolHandle> {
        let Some(hint) = self.connections.find_free_index() else {
            tracing::warn!("No free database connection slot for {}", locator);
            return Err(PoolError::Exhausted {
                capacity: self.connections.capacity(),
            }
            .into());
        };

        let native = self.driver.open(locator).map_err(|e| {
            tracing::warn!("Failed to open database {}: {}", locator, e);
            DatabaseError::AcquisitionFailed {
                locator: locator.to_string(),
                reason: e.0,
            }
        })?;

        self.commit(Some(hint), locator, native)
    }

    /// Stores a native connection opened elsewhere, e.g. on a worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] (wrapped) when the pool is full; the native
    /// connection is closed in that case.
    pub fn attach(&mut self, locator: &str, native: D::Connection) -> DatabaseResult<PoolHandle> {
        self.commit(None, locator, native)
    }

    fn commit(
        &mut self,
        hint: Option<SlotIndex>,
        locator: &str,
        native: D::Connection,
    ) -> DatabaseResult<PoolHandle> {
        let max_result_sets = self.max_result_sets;
        let mut native = Some(native);
        let claimed = self.connections.claim_with(hint, |index| {
            DatabaseConnection::new(index, locator, native.take(), max_result_sets)
        });

        let Some(index) = claimed else {
            if let Some(native) = native {
                self.driver.close(native);
            }
            return Err(PoolError::Exhausted {
                capacity: self.connections.capacity(),
            }
            .into());
        };
        if hint.is_some_and(|hint| hint != index) {
            tracing::debug!("Database connection hint {:?} missed, got {}", hint, index);
        }

        tracing::info!("Opened database connection {} ({})", index, locator);
        self.connections
            .handle(index)
            .ok_or_else(|| PoolError::InvalidHandle { index: index.get() }.into())
    }

    /// Closes a connection: result sets first, then the native handle, then the slot.
    ///
    /// Returns `false`, changing nothing, if the handle is stale or already closed.
    pub fn close(&mut self, handle: PoolHandle) -> bool {
        let Ok(index) = self.connections.resolve(handle) else {
            return false;
        };
        if self.connections.is_pending_release(index) {
            return false;
        }
        let Ok(connection) = self.connections.get_mut(index) else {
            return false;
        };

        connection.teardown(&mut self.driver);
        tracing::info!("Closed database connection {} ({})", index, connection.locator());

        match self.connections.release(index, false) {
            Ok(Some(mut connection)) => connection.teardown(&mut self.driver),
            Ok(None) => tracing::debug!("Database connection {} locked, slot release deferred", index),
            Err(e) => tracing::warn!("Releasing database connection {} failed: {}", index, e),
        }
        true
    }

    /// Runs `sql` on a connection, returning the index of the new result set.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] (wrapped) for a stale handle,
    /// [`DatabaseError::ConnectionClosed`] for a closed connection,
    /// [`PoolError::Exhausted`] (wrapped) when the connection has no free result slot,
    /// and [`DatabaseError::QueryFailed`] when the driver rejects the query.
    pub fn execute_query(&mut self, handle: PoolHandle, sql: &str) -> DatabaseResult<SlotIndex> {
        let index = self.connections.resolve(handle)?;
        let connection = self.connections.get_mut(index)?;
        connection.execute(&mut self.driver, sql)
    }

    /// Frees one result set of a connection. False if either does not exist.
    pub fn free_result_set(&mut self, handle: PoolHandle, result_set: SlotIndex) -> bool {
        let Ok(index) = self.connections.resolve(handle) else {
            return false;
        };
        match self.connections.get_mut(index) {
            Ok(connection) => connection.free_result_set(&mut self.driver, result_set),
            Err(_) => false,
        }
    }

    /// Borrows a result set of a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] (wrapped) if either does not exist.
    pub fn result_set(&self, handle: PoolHandle, result_set: SlotIndex) -> DatabaseResult<&ResultSet<D>> {
        let index = self.connections.resolve(handle)?;
        Ok(self.connections.get(index)?.result_sets().get(result_set)?)
    }

    /// Number of live connections with an open native handle.
    #[must_use]
    pub fn open_connection_count(&self) -> usize {
        self.connections
            .entries()
            .filter(|(_, connection)| connection.is_open())
            .count()
    }

    /// Open result sets across every connection.
    #[must_use]
    pub fn open_result_set_count(&self) -> usize {
        self.connections
            .entries()
            .map(|(_, connection)| connection.result_set_count())
            .sum()
    }

    /// Closes every connection. Returns how many were live.
    pub fn shutdown(&mut self) -> usize {
        let connections = self.connections.release_all();
        let count = connections.len();
        for mut connection in connections {
            connection.teardown(&mut self.driver);
        }
        if count > 0 {
            tracing::info!("Database pool shut down, {} connections closed", count);
        }
        count
    }

    /// Returns true if `index` is claimed. Always false for index 0.
    #[must_use]
    pub fn valid(&self, index: SlotIndex) -> bool {
        self.connections.valid(index)
    }

    /// Borrows the connection at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn get(&self, index: SlotIndex) -> Result<&DatabaseConnection<D>, PoolError> {
        self.connections.get(index)
    }

    /// Generation-checked handle for the connection at `index`.
    #[must_use]
    pub fn handle(&self, index: SlotIndex) -> Option<PoolHandle> {
        self.connections.handle(index)
    }

    /// Live connections in index order.
    pub fn entries(&self) -> impl Iterator<Item = (SlotIndex, &DatabaseConnection<D>)> + '_ {
        self.connections.entries()
    }

    /// First free index, or `None` if no index is available.
    #[must_use]
    pub fn find_free_index(&self) -> Option<SlotIndex> {
        self.connections.find_free_index()
    }

    /// Claims the first free index for a connection with no native handle.
    pub fn claim(&mut self) -> Option<SlotIndex> {
        self.claim_empty(None)
    }

    /// Claims `hint` if free, otherwise the first free index. Returns the granted index.
    pub fn claim_hint(&mut self, hint: SlotIndex) -> Option<SlotIndex> {
        self.claim_empty(Some(hint))
    }

    fn claim_empty(&mut self, hint: Option<SlotIndex>) -> Option<SlotIndex> {
        let max_result_sets = self.max_result_sets;
        self.connections
            .claim_with(hint, |index| DatabaseConnection::new(index, "", None, max_result_sets))
    }

    /// Releases the connection at `index` immediately, closing whatever it holds.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn release(&mut self, index: SlotIndex) -> Result<(), PoolError> {
        if let Some(mut connection) = self.connections.release(index, true)? {
            connection.teardown(&mut self.driver);
        }
        Ok(())
    }

    /// Locks a connection to postpone its release until unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn lock(&mut self, index: SlotIndex) -> Result<(), PoolError> {
        self.connections.lock(index)
    }

    /// Unlocks a connection, completing a postponed release.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] or [`PoolError::NotLocked`].
    pub fn unlock(&mut self, index: SlotIndex) -> Result<(), PoolError> {
        if let Some(mut connection) = self.connections.unlock(index)? {
            connection.teardown(&mut self.driver);
        }
        Ok(())
    }
}

impl<D: DatabaseDriver> Drop for DatabasePool<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverError;

    /// Counts native handles; refuses locators starting with "missing".
    #[derive(Default)]
    struct CountingDriver {
        next: u32,
        open: u32,
        rows: u32,
    }

    impl DatabaseDriver for CountingDriver {
        type Connection = u32;
        type Rows = u32;

        fn open(&mut self, locator: &str) -> Result<u32, DriverError> {
            if locator.starts_with("missing") {
                return Err(DriverError("unable to open database file".to_string()));
            }
            self.next += 1;
            self.open += 1;
            Ok(self.next)
        }

        fn query(&mut self, _connection: &mut u32, sql: &str) -> Result<u32, DriverError> {
            if sql.is_empty() {
                return Err(DriverError("not an error".to_string()));
            }
            self.rows += 1;
            Ok(self.rows)
        }

        fn free_rows(&mut self, _rows: u32) {
            self.rows -= 1;
        }

        fn close(&mut self, _connection: u32) {
            self.open -= 1;
        }
    }

    fn pool(connections: usize, result_sets: usize) -> DatabasePool<CountingDriver> {
        DatabasePool::new(
            CountingDriver::default(),
            &DatabasesConfig {
                max_connections: connections,
                max_result_sets: result_sets,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_open_close() {
        let mut db = pool(4, 4);
        let handle = db.open("bans.db").unwrap();
        assert_eq!(handle.index(), SlotIndex(1));
        assert_eq!(db.open_connection_count(), 1);
        assert_eq!(db.driver().open, 1);

        assert!(db.close(handle));
        assert_eq!(db.open_connection_count(), 0);
        assert_eq!(db.driver().open, 0);
        assert!(!db.valid(handle.index()));
    }

    #[test]
    fn test_failed_open_consumes_no_slot() {
        let mut db = pool(1, 4);
        let err = db.open("missing/dir/x.db").unwrap_err();
        assert!(matches!(err, DatabaseError::AcquisitionFailed { .. }));
        assert_eq!(db.find_free_index(), Some(SlotIndex(1)));
        assert!(db.open("ok.db").is_ok());
    }

    #[test]
    fn test_open_when_full() {
        let mut db = pool(1, 4);
        db.open("a.db").unwrap();
        let err = db.open("b.db").unwrap_err();
        assert_eq!(err, DatabaseError::Pool(PoolError::Exhausted { capacity: 1 }));
        assert_eq!(db.driver().open, 1, "no native handle opened for a full pool");
    }

    #[test]
    fn test_attach_when_full_closes_native() {
        let mut db = pool(1, 4);
        db.open("a.db").unwrap();
        db.driver.open += 1;
        assert!(db.attach("b.db", 99).is_err());
        assert_eq!(db.driver().open, 1);
    }

    #[test]
    fn test_query_and_free() {
        let mut db = pool(2, 2);
        let handle = db.open("a.db").unwrap();
        let first = db.execute_query(handle, "SELECT 1").unwrap();
        let second = db.execute_query(handle, "SELECT 2").unwrap();
        assert_eq!(db.result_set(handle, second).unwrap().query(), "SELECT 2");
        assert_eq!(
            db.execute_query(handle, "SELECT 3").unwrap_err(),
            DatabaseError::Pool(PoolError::Exhausted { capacity: 2 })
        );
        assert_eq!(db.driver().rows, 2);

        assert!(db.free_result_set(handle, first));
        assert!(!db.free_result_set(handle, first));
        assert_eq!(db.open_result_set_count(), 1);
        assert_eq!(db.driver().rows, 1);
    }

    #[test]
    fn test_query_failure() {
        let mut db = pool(2, 2);
        let handle = db.open("a.db").unwrap();
        assert!(matches!(
            db.execute_query(handle, ""),
            Err(DatabaseError::QueryFailed { .. })
        ));
        assert_eq!(db.open_result_set_count(), 0);
    }

    #[test]
    fn test_close_locked_connection() {
        let mut db = pool(2, 2);
        let handle = db.open("a.db").unwrap();
        let index = handle.index();
        db.execute_query(handle, "SELECT 1").unwrap();
        db.lock(index).unwrap();

        assert!(db.close(handle));
        // Still claimed, but nothing native is open any more.
        assert!(db.valid(index));
        assert_eq!(db.open_connection_count(), 0);
        assert_eq!(db.open_result_set_count(), 0);
        assert_eq!(
            db.execute_query(handle, "SELECT 1").unwrap_err(),
            DatabaseError::ConnectionClosed { index: 1 }
        );
        assert!(!db.close(handle));

        db.unlock(index).unwrap();
        assert!(!db.valid(index));
    }

    #[test]
    fn test_passthrough_claim_release() {
        let mut db = pool(3, 1);
        assert_eq!(db.claim_hint(SlotIndex(2)), Some(SlotIndex(2)));
        assert_eq!(db.claim(), Some(SlotIndex(1)));
        assert_eq!(db.open_connection_count(), 0);
        assert_eq!(db.entries().count(), 2);
        db.release(SlotIndex(2)).unwrap();
        assert!(db.release(SlotIndex(2)).is_err());
        assert!(!db.valid(SlotIndex::NONE));
    }

    #[test]
    fn test_shutdown_closes_everything() {
        let mut db = pool(3, 3);
        for name in ["a.db", "b.db", "c.db"] {
            let handle = db.open(name).unwrap();
            db.execute_query(handle, "SELECT 1").unwrap();
        }
        assert_eq!(db.shutdown(), 3);
        assert_eq!(db.driver().open, 0);
        assert_eq!(db.driver().rows, 0);
    }
}
