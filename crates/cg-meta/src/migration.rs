//! Schema upgrades for the history store itself.
//!
//! Tracks applied store versions in `cg_meta.schema_version`. Upgrades are
//! only applied to stores this crate creates (in-memory stores and test
//! fixtures); a file-backed store is opened read-only and only checked with
//! [`check_compatible`]. These are the store's own tables, not the changesets
//! the guard reports on.

use crate::ddl::MIGRATIONS;
use crate::error::{HistoryError, HistoryResult};
use duckdb::Connection;

/// Ensure the `cg_meta` schema and `schema_version` table exist.
fn ensure_version_table(conn: &Connection) -> HistoryResult<()> {
    conn.execute_batch(
        "CREATE SCHEMA IF NOT EXISTS cg_meta;
         CREATE TABLE IF NOT EXISTS cg_meta.schema_version (
             version    INTEGER NOT NULL,
             applied_at TIMESTAMP NOT NULL DEFAULT now()
         );",
    )
    .map_err(|e| {
        HistoryError::SchemaUpgradeError(format!("failed to create schema_version table: {e}"))
    })?;
    Ok(())
}

/// Return the highest applied store version, or 0 if none.
fn current_version(conn: &Connection) -> HistoryResult<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM cg_meta.schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| HistoryError::SchemaUpgradeError(format!("failed to read schema version: {e}")))
}

fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Whether `cg_meta.<table>` exists.
fn has_table(conn: &Connection, table: &str) -> HistoryResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = 'cg_meta' AND table_name = ?",
            duckdb::params![table],
            |row| row.get(0),
        )
        .map_err(|e| HistoryError::QueryError(format!("inspect store tables: {e}")))?;
    Ok(count > 0)
}

/// Check, without writing, that the store at `conn` holds a history table
/// in a version this release reads.
pub fn check_compatible(conn: &Connection, path: &str) -> HistoryResult<()> {
    let incompatible = |reason: String| HistoryError::IncompatibleStore {
        path: path.to_string(),
        reason,
    };

    if !has_table(conn, "changeset_history")? {
        return Err(incompatible(
            "missing table cg_meta.changeset_history".to_string(),
        ));
    }
    if has_table(conn, "schema_version")? {
        let current = current_version(conn)?;
        let latest = latest_version();
        if current > latest {
            return Err(incompatible(format!(
                "store is at version {current}, this release reads up to {latest}"
            )));
        }
    }
    Ok(())
}

/// Bring the store at `conn` up to the latest version.
///
/// A store written by a newer release is left alone and rejected, since its
/// history table may not have the shape this release reads.
pub fn run_migrations(conn: &Connection) -> HistoryResult<()> {
    ensure_version_table(conn)?;
    let current = current_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(HistoryError::SchemaUpgradeError(format!(
            "store is at version {current}, this release understands up to {latest}"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        log::debug!("Upgrading history store to v{:03}", migration.version);

        conn.execute_batch(migration.sql).map_err(|e| {
            HistoryError::SchemaUpgradeError(format!(
                "upgrade v{:03} failed: {e}",
                migration.version
            ))
        })?;

        conn.execute(
            "INSERT INTO cg_meta.schema_version (version) VALUES (?)",
            duckdb::params![migration.version],
        )
        .map_err(|e| {
            HistoryError::SchemaUpgradeError(format!(
                "failed to record upgrade v{:03}: {e}",
                migration.version
            ))
        })?;
    }
    Ok(())
}
