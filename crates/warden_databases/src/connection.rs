//! # Database Connection
//!
//! One native connection plus the result sets it produced.

use std::fmt;

use warden_core::{PoolError, SlotIndex, SlotPool};

use crate::driver::DatabaseDriver;
use crate::error::{DatabaseError, DatabaseResult};

/// A query result owned by a connection.
pub struct ResultSet<D: DatabaseDriver> {
    query: String,
    rows: D::Rows,
}

impl<D: DatabaseDriver> ResultSet<D> {
    /// The statement that produced this result.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Native result handle.
    #[must_use]
    pub const fn rows(&self) -> &D::Rows {
        &self.rows
    }

    /// Mutable native result handle, for stepping through rows.
    pub fn rows_mut(&mut self) -> &mut D::Rows {
        &mut self.rows
    }

    pub(crate) fn free(self, driver: &mut D) {
        driver.free_rows(self.rows);
    }
}

/// A pooled database connection.
///
/// Holds at most one native handle; `None` once closed (or for a bare claimed slot).
pub struct DatabaseConnection<D: DatabaseDriver> {
    index: SlotIndex,
    locator: String,
    handle: Option<D::Connection>,
    result_sets: SlotPool<ResultSet<D>>,
}

impl<D: DatabaseDriver> DatabaseConnection<D> {
    pub(crate) fn new(
        index: SlotIndex,
        locator: &str,
        handle: Option<D::Connection>,
        max_result_sets: usize,
    ) -> Self {
        Self {
            index,
            locator: locator.to_string(),
            handle,
            result_sets: SlotPool::new(max_result_sets),
        }
    }

    /// Slot of this connection in its pool.
    #[must_use]
    pub const fn index(&self) -> SlotIndex {
        self.index
    }

    /// Where the database lives.
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Returns true while the native handle is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Native connection handle, if open.
    #[must_use]
    pub const fn native(&self) -> Option<&D::Connection> {
        self.handle.as_ref()
    }

    /// This connection's result sets.
    #[must_use]
    pub const fn result_sets(&self) -> &SlotPool<ResultSet<D>> {
        &self.result_sets
    }

    /// Number of open result sets.
    #[must_use]
    pub fn result_set_count(&self) -> usize {
        self.result_sets.len()
    }

    /// Runs a query and stores the result in the child pool.
    pub(crate) fn execute(
        &mut self,
        driver: &mut D,
        sql: &str,
    ) -> DatabaseResult<SlotIndex> {
        let capacity = self.result_sets.capacity();
        let native = self.handle.as_mut().ok_or(DatabaseError::ConnectionClosed {
            index: self.index.get(),
        })?;
        // Check for room first so a full pool never strands native rows.
        if self.result_sets.find_free_index().is_none() {
            return Err(PoolError::Exhausted { capacity }.into());
        }
        let rows = driver
            .query(native, sql)
            .map_err(|e| DatabaseError::QueryFailed { reason: e.0 })?;

        self.result_sets
            .insert(ResultSet {
                query: sql.to_string(),
                rows,
            })
            .ok_or_else(|| PoolError::Exhausted { capacity }.into())
    }

    /// Frees one result set. False if `index` is not an open result of this connection.
    pub(crate) fn free_result_set(&mut self, driver: &mut D, index: SlotIndex) -> bool {
        match self.result_sets.release(index, true) {
            Ok(Some(set)) => {
                set.free(driver);
                true
            }
            _ => false,
        }
    }

    /// Frees every result set, then closes the native handle. Safe to repeat.
    pub(crate) fn teardown(&mut self, driver: &mut D) {
        for set in self.result_sets.release_all() {
            set.free(driver);
        }
        if let Some(native) = self.handle.take() {
            driver.close(native);
        }
    }
}

impl<D: DatabaseDriver> fmt::Debug for DatabaseConnection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("index", &self.index)
            .field("locator", &self.locator)
            .field("open", &self.is_open())
            .field("result_sets", &self.result_sets.len())
            .finish()
    }
}
