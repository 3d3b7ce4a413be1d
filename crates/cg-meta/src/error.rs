//! Error types for the history store.

use thiserror::Error;

/// History store errors.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Failed to open or create the history store (H001).
    #[error("[H001] History store connection failed: {0}")]
    ConnectionError(String),

    /// The store's own schema could not be created or upgraded (H002).
    #[error("[H002] History store schema upgrade failed: {0}")]
    SchemaUpgradeError(String),

    /// SQL execution error inside the history store (H003).
    #[error("[H003] History store query failed: {0}")]
    QueryError(String),

    /// A stored record cannot be turned into a history entry (H004).
    #[error("[H004] Invalid history record #{order}: {reason}")]
    InvalidRecord { order: i64, reason: String },

    /// The configured history file does not exist (H005).
    #[error("[H005] History store not found: {path}")]
    StoreNotFound { path: String },

    /// The file exists but does not hold a history this release reads (H006).
    #[error("[H006] {path} is not a usable history store: {reason}")]
    IncompatibleStore { path: String, reason: String },
}

/// Result type alias for [`HistoryError`].
pub type HistoryResult<T> = Result<T, HistoryError>;
