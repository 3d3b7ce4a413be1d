//! Writers for `cg_meta.changeset_history`, for test fixtures only.
//!
//! The history is written by whatever executes migrations. These helpers let
//! tests build a store in the shape that executor would leave behind.

use crate::connection::HistoryDb;
use crate::error::{HistoryError, HistoryResult};
use cg_core::RanChangeSet;

impl HistoryDb {
    /// Append one execution record.
    pub fn record(&self, ran: &RanChangeSet) -> HistoryResult<()> {
        self.conn()
            .execute(
                "INSERT INTO cg_meta.changeset_history
                     (id, author, path, checksum, executed_at, order_executed, exec_type)
                 VALUES (?, ?, ?, ?, epoch_ms(?::BIGINT), ?, ?)",
                duckdb::params![
                    ran.id.as_str(),
                    ran.author.as_str(),
                    ran.path,
                    ran.last_checksum.as_str(),
                    ran.executed_at.timestamp_millis(),
                    ran.order_executed,
                    ran.exec_type.as_str(),
                ],
            )
            .map_err(|e| HistoryError::QueryError(format!("record {}: {e}", ran.id)))?;
        Ok(())
    }

    /// Append several records in one transaction.
    pub fn record_all(&self, records: &[RanChangeSet]) -> HistoryResult<()> {
        self.conn()
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| HistoryError::QueryError(format!("begin: {e}")))?;
        for ran in records {
            if let Err(e) = self.record(ran) {
                let _ = self.conn().execute_batch("ROLLBACK");
                return Err(e);
            }
        }
        self.conn()
            .execute_batch("COMMIT")
            .map_err(|e| HistoryError::QueryError(format!("commit: {e}")))?;
        Ok(())
    }
}
