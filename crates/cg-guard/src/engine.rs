//! Migration engine capability interface.
//!
//! The guard never reads changelogs or history stores directly. It asks a
//! [`MigrationEngine`] for the changesets that would run and for the
//! execution history, and classifies what comes back.

use crate::error::EngineError;
use crate::filter::{
    ChangeSetFilter, ContextFilter, DbmsFilter, DirtyChangesetFilter, ShouldRunFilter,
};
use cg_core::{ChangeLog, ChangeSet, RanChangeSet};

/// Which history rule the engine applies when listing unrun changesets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSelection {
    /// The engine's own rule: `always_run` changesets are always listed
    Default,
    /// [`DirtyChangesetFilter`] in place of the engine's rule:
    /// `always_run` changesets are listed only when new or altered
    Dirty,
}

/// What the guard needs from a migration engine.
pub trait MigrationEngine {
    /// Changesets that would run for `contexts`, in changelog order.
    fn list_unrun_changesets(
        &self,
        contexts: &[String],
        selection: CandidateSelection,
    ) -> Result<Vec<ChangeSet>, EngineError>;

    /// The full execution history, in execution order.
    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError>;
}

/// Read side of a persisted execution history.
pub trait HistorySource {
    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError>;
}

impl HistorySource for Vec<RanChangeSet> {
    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError> {
        Ok(self.clone())
    }
}

impl<H: HistorySource + ?Sized> HistorySource for &H {
    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError> {
        (**self).ran_changesets()
    }
}

/// Engine over a loaded [`ChangeLog`] and a [`HistorySource`].
///
/// A changeset is listed when the history rule, the [`ContextFilter`] and the
/// [`DbmsFilter`] all accept it.
pub struct ChangeLogEngine<H> {
    changelog: ChangeLog,
    history: H,
    dbms: String,
    ignore_classpath_prefix: bool,
}

impl<H: HistorySource> ChangeLogEngine<H> {
    pub fn new(changelog: ChangeLog, history: H, dbms: impl Into<String>) -> Self {
        Self {
            changelog,
            history,
            dbms: dbms.into(),
            ignore_classpath_prefix: true,
        }
    }

    pub fn with_ignore_classpath_prefix(mut self, ignore_classpath_prefix: bool) -> Self {
        self.ignore_classpath_prefix = ignore_classpath_prefix;
        self
    }
}

impl<H: HistorySource> MigrationEngine for ChangeLogEngine<H> {
    fn list_unrun_changesets(
        &self,
        contexts: &[String],
        selection: CandidateSelection,
    ) -> Result<Vec<ChangeSet>, EngineError> {
        let history = self.history.ran_changesets()?;
        let run_filter: Box<dyn ChangeSetFilter + '_> = match selection {
            CandidateSelection::Default => {
                Box::new(ShouldRunFilter::new(&history, self.ignore_classpath_prefix))
            }
            CandidateSelection::Dirty => Box::new(DirtyChangesetFilter::new(
                &history,
                self.ignore_classpath_prefix,
            )),
        };
        let context_filter = ContextFilter::new(contexts);
        let dbms_filter = DbmsFilter::new(&self.dbms);
        let chain: [&dyn ChangeSetFilter; 3] = [run_filter.as_ref(), &context_filter, &dbms_filter];

        let unrun: Vec<ChangeSet> = self
            .changelog
            .iter()
            .filter(|changeset| chain.iter().all(|f| f.accepts(changeset)))
            .cloned()
            .collect();
        log::debug!(
            "{} of {} changeset(s) unrun ({:?} selection)",
            unrun.len(),
            self.changelog.len(),
            selection
        );
        Ok(unrun)
    }

    fn ran_changesets(&self) -> Result<Vec<RanChangeSet>, EngineError> {
        self.history.ran_changesets()
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
