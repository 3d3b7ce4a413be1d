//! cg-guard - Pending-changeset detection for changeguard
//!
//! This crate decides whether any changeset would still run against a
//! database whose execution history is known, and turns a non-empty answer
//! into a [`PendingMigrationsDetected`] failure for the startup host.
//!
//! The decision is layered: [`MigrationGuard`] applies the `always_run`
//! policy, then [`DirtyChangesetFilter`] judges each remaining candidate
//! against the history.

pub mod engine;
pub mod error;
pub mod filter;
pub mod guard;
pub mod policy;
pub mod report;

pub use engine::{CandidateSelection, ChangeLogEngine, HistorySource, MigrationEngine};
pub use error::{EngineError, GuardError, GuardResult, PendingMigrationsDetected};
pub use filter::{
    ChangeSetFilter, ContextFilter, DbmsFilter, DirtyChangesetFilter, DirtyState, ShouldRunFilter,
};
pub use guard::{MigrationGuard, Verdict, VerdictReason};
pub use policy::GuardPolicy;
pub use report::PendingChangeSet;
