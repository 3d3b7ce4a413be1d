//! Error types for cg-core

use thiserror::Error;

/// Core error type for changeguard
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Changelog file not found
    #[error("[E004] Changelog not found: {path}")]
    ChangeLogNotFound { path: String },

    /// E005: Failed to parse a changelog file
    #[error("[E005] Failed to parse changelog {path}: {message}")]
    ChangeLogParseError { path: String, message: String },

    /// E006: Two changesets share the same (id, author, path) identity
    #[error("[E006] Duplicate changeset '{id}' by '{author}' in {path}")]
    DuplicateChangeSet {
        id: String,
        author: String,
        path: String,
    },

    /// E007: A changelog includes itself, directly or transitively
    #[error("[E007] Changelog include cycle: {chain}")]
    IncludeCycle { chain: String },

    /// E008: Includes cannot be resolved without a file location
    #[error("[E008] Changelog {path} includes '{include}' but was not loaded from disk")]
    IncludeUnresolvable { path: String, include: String },

    /// E009: IO error with file path context
    #[error("[E009] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
