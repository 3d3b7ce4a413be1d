//! Migration guard: fail startup when changesets would still run.

use crate::engine::{CandidateSelection, MigrationEngine};
use crate::error::{GuardError, GuardResult, PendingMigrationsDetected};
use crate::filter::{DirtyChangesetFilter, DirtyState};
use crate::policy::GuardPolicy;
use crate::report::PendingChangeSet;
use cg_core::{ChangeSet, RanChangeSet};
use serde::Serialize;

/// Why a candidate was, or was not, counted as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    /// `always_run` and excluded by the policy
    AlwaysRunIgnored,
    /// No matching history entry
    NeverRan,
    /// `run_on_change` and altered since its recorded execution
    ChecksumChanged,
    /// Already ran and not due to re-run
    Unchanged,
}

impl VerdictReason {
    pub fn is_pending(self) -> bool {
        matches!(self, VerdictReason::NeverRan | VerdictReason::ChecksumChanged)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerdictReason::AlwaysRunIgnored => "always-run (ignored)",
            VerdictReason::NeverRan => "never ran",
            VerdictReason::ChecksumChanged => "checksum changed",
            VerdictReason::Unchanged => "unchanged",
        }
    }
}

/// Classification of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict<'a> {
    pub changeset: &'a ChangeSet,
    pub reason: VerdictReason,
}

impl Verdict<'_> {
    pub fn is_pending(&self) -> bool {
        self.reason.is_pending()
    }
}

/// Decides whether a startup may proceed.
///
/// Holds only its policy and contexts; every pass reads its inputs fresh, so
/// repeated passes over the same inputs give the same answer.
#[derive(Debug, Clone, Default)]
pub struct MigrationGuard {
    policy: GuardPolicy,
    contexts: Vec<String>,
}

impl MigrationGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self {
            policy,
            contexts: Vec::new(),
        }
    }

    /// Contexts the engine restricts candidates to (empty = all).
    pub fn with_contexts(mut self, contexts: Vec<String>) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// The engine selection matching the policy.
    ///
    /// Under the strict policy the engine is asked for its list through the
    /// dirty filter, so unaltered `always_run` changesets never become
    /// candidates.
    pub fn candidate_selection(&self) -> CandidateSelection {
        if self.policy.always_ignoring_run_always {
            CandidateSelection::Default
        } else {
            CandidateSelection::Dirty
        }
    }

    /// Whether the `always_run` policy lets `changeset` reach the dirty
    /// filter at all.
    fn is_considered(&self, changeset: &ChangeSet) -> bool {
        if !changeset.always_run {
            return true;
        }
        !self.policy.always_ignoring_run_always && changeset.run_on_change
    }

    /// Classify every candidate against `history`, in candidate order.
    pub fn classify<'a>(
        &self,
        candidates: &'a [ChangeSet],
        history: &[RanChangeSet],
    ) -> Vec<Verdict<'a>> {
        let filter = DirtyChangesetFilter::new(history, self.policy.ignore_classpath_prefix);
        candidates
            .iter()
            .map(|changeset| {
                let reason = if !self.is_considered(changeset) {
                    VerdictReason::AlwaysRunIgnored
                } else {
                    match filter.state(changeset) {
                        DirtyState::NeverRan => VerdictReason::NeverRan,
                        DirtyState::ChecksumChanged => VerdictReason::ChecksumChanged,
                        DirtyState::Clean => VerdictReason::Unchanged,
                    }
                };
                log::debug!(
                    "{}: {}",
                    changeset.key(self.policy.ignore_classpath_prefix),
                    reason.as_str()
                );
                Verdict { changeset, reason }
            })
            .collect()
    }

    /// Fail with the pending candidates, if any.
    pub fn evaluate(
        &self,
        candidates: &[ChangeSet],
        history: &[RanChangeSet],
    ) -> Result<(), PendingMigrationsDetected> {
        let pending: Vec<PendingChangeSet> = self
            .classify(candidates, history)
            .into_iter()
            .filter(|v| v.is_pending())
            .map(|v| {
                PendingChangeSet::from_changeset(v.changeset, self.policy.ignore_classpath_prefix)
            })
            .collect();

        if pending.is_empty() {
            return Ok(());
        }
        Err(PendingMigrationsDetected::new(pending, self.policy.is_strict()))
    }

    /// Run a full pass against `engine`.
    ///
    /// Engine failures are returned as [`GuardError::Engine`] without retry.
    pub fn check<E: MigrationEngine + ?Sized>(&self, engine: &E) -> GuardResult<()> {
        let candidates = engine
            .list_unrun_changesets(&self.contexts, self.candidate_selection())
            .map_err(GuardError::Engine)?;
        if candidates.is_empty() {
            log::info!("No unrun changesets");
            return Ok(());
        }

        let history = engine.ran_changesets().map_err(GuardError::Engine)?;
        match self.evaluate(&candidates, &history) {
            Ok(()) => {
                log::info!(
                    "{} unrun changeset(s), none pending under the current policy",
                    candidates.len()
                );
                Ok(())
            }
            Err(pending) => Err(pending.into()),
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
