//! Read queries over `cg_meta.changeset_history`.

use crate::error::{HistoryError, HistoryResult};
use cg_core::{Author, ChangeSetId, Checksum, ExecType, RanChangeSet};
use chrono::DateTime;
use duckdb::Connection;

/// Raw columns of one history row, before validation.
struct HistoryRow {
    id: String,
    author: String,
    path: String,
    checksum: String,
    executed_at_ms: i64,
    order_executed: i64,
    exec_type: String,
}

impl HistoryRow {
    fn into_ran_changeset(self) -> HistoryResult<RanChangeSet> {
        let order = self.order_executed;
        let invalid = |reason: String| HistoryError::InvalidRecord { order, reason };

        let id = ChangeSetId::try_new(self.id).ok_or_else(|| invalid("empty id".into()))?;
        let author =
            Author::try_new(self.author).ok_or_else(|| invalid("empty author".into()))?;
        let executed_at = DateTime::from_timestamp_millis(self.executed_at_ms)
            .ok_or_else(|| invalid(format!("timestamp {} out of range", self.executed_at_ms)))?;
        let exec_type: ExecType = self.exec_type.parse().map_err(invalid)?;

        Ok(RanChangeSet {
            id,
            author,
            path: self.path,
            last_checksum: Checksum::parse(self.checksum),
            executed_at,
            order_executed: order,
            exec_type,
        })
    }
}

/// All recorded executions ordered by `order_executed`.
pub fn ran_changesets(conn: &Connection) -> HistoryResult<Vec<RanChangeSet>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, author, path, checksum, epoch_ms(executed_at), order_executed, exec_type
             FROM cg_meta.changeset_history
             ORDER BY order_executed, executed_at",
        )
        .map_err(|e| HistoryError::QueryError(format!("prepare history query: {e}")))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(HistoryRow {
                id: row.get(0)?,
                author: row.get(1)?,
                path: row.get(2)?,
                checksum: row.get(3)?,
                executed_at_ms: row.get(4)?,
                order_executed: row.get(5)?,
                exec_type: row.get(6)?,
            })
        })
        .map_err(|e| HistoryError::QueryError(format!("read history: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| HistoryError::QueryError(format!("history row error: {e}")))?;

    rows.into_iter().map(HistoryRow::into_ran_changeset).collect()
}
