//! Execution history store for changeguard.
//!
//! Provides a DuckDB-backed read view of which changesets have executed,
//! with the checksum recorded at each execution, and exposes it to the guard
//! as a [`cg_guard::HistorySource`].

pub mod connection;
pub mod ddl;
pub mod error;
pub mod migration;
pub mod query;
#[cfg(any(test, feature = "test-support"))]
mod record;

pub use connection::HistoryDb;
pub use error::{HistoryError, HistoryResult};
