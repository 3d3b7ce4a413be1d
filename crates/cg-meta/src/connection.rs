//! History store connection wrapper.
//!
//! [`HistoryDb`] owns a DuckDB [`Connection`] to the store that records which
//! changesets have executed. The guard only reads it: file-backed stores are
//! opened read-only and never created or upgraded here.

use crate::error::{HistoryError, HistoryResult};
use crate::migration::{check_compatible, run_migrations};
use cg_core::RanChangeSet;
use cg_guard::{EngineError, HistorySource};
use duckdb::{AccessMode, Config, Connection};
use std::path::Path;

/// Wrapper around a DuckDB connection to the history store.
///
/// Single-threaded; a guard pass reads the history once.
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the existing history store at `path` read-only.
    ///
    /// Fails with [`HistoryError::StoreNotFound`] when the file is missing
    /// and [`HistoryError::IncompatibleStore`] when it holds no
    /// `cg_meta.changeset_history` table.
    pub fn open(path: &Path) -> HistoryResult<Self> {
        if !path.is_file() {
            return Err(HistoryError::StoreNotFound {
                path: path.display().to_string(),
            });
        }
        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| HistoryError::ConnectionError(e.to_string()))?;
        let conn = Connection::open_with_flags(path, config)
            .map_err(|e| HistoryError::ConnectionError(format!("{e}: {}", path.display())))?;
        check_compatible(&conn, &path.display().to_string())?;
        log::debug!("Opened history store {} read-only", path.display());
        Ok(Self { conn })
    }

    /// Create an empty in-memory history store.
    pub fn open_memory() -> HistoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| HistoryError::ConnectionError(e.to_string()))?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open (or create) a writable store at `path` with the current schema.
    #[cfg(any(test, feature = "test-support"))]
    pub fn create(path: &Path) -> HistoryResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| HistoryError::ConnectionError(format!("{e}: {}", path.display())))?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// All recorded executions, in execution order.
    pub fn ran_changesets(&self) -> HistoryResult<Vec<RanChangeSet>> {
        crate::query::ran_changesets(&self.conn)
    }
}

impl HistorySource for HistoryDb {
    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError> {
        Ok(HistoryDb::ran_changesets(self)?)
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
