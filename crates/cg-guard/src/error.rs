//! Error types for cg-guard

use crate::report::{self, PendingChangeSet};
use thiserror::Error;

/// Error raised by a migration engine or history collaborator.
///
/// Kept boxed so the collaborator's own error, and its source chain, reach
/// the host unchanged.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Guard failures
#[derive(Error, Debug)]
pub enum GuardError {
    /// Changesets would run at startup (G001)
    #[error("[G001] Unexpected pending changesets:{0}")]
    PendingMigrations(#[from] PendingMigrationsDetected),

    /// The migration engine could not list candidates or history (G002)
    #[error("[G002] Migration engine failed: {0}")]
    Engine(#[source] EngineError),
}

/// Result type alias for GuardError
pub type GuardResult<T> = Result<T, GuardError>;

/// One or more changesets still have to run.
///
/// Displays as the multi-line report produced by [`report::render`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", report::render(&self.pending, self.strict))]
pub struct PendingMigrationsDetected {
    pending: Vec<PendingChangeSet>,
    strict: bool,
}

impl PendingMigrationsDetected {
    /// `strict` is true when altered `always_run` + `run_on_change`
    /// changesets are included in `pending`.
    pub fn new(pending: Vec<PendingChangeSet>, strict: bool) -> Self {
        Self { pending, strict }
    }

    pub fn count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> &[PendingChangeSet] {
        &self.pending
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn report(&self) -> String {
        report::render(&self.pending, self.strict)
    }
}
