//! Changeset filters.
//!
//! A migration engine builds its candidate list by passing each declared
//! changeset through a chain of [`ChangeSetFilter`]s; a changeset is a
//! candidate when every filter accepts it. [`DirtyChangesetFilter`] is also
//! used on its own by the guard.

use cg_core::{ChangeSet, RanChangeSet};
use std::collections::HashSet;

/// A yes/no decision over a single changeset.
pub trait ChangeSetFilter {
    fn accepts(&self, changeset: &ChangeSet) -> bool;
}

/// Result of comparing a changeset against the execution history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyState {
    /// No history entry with the same identity
    NeverRan,
    /// `run_on_change` and the body differs from the recorded checksum
    ChecksumChanged,
    /// Already ran, and either unchanged or not configured to re-run
    Clean,
}

impl DirtyState {
    pub fn is_dirty(self) -> bool {
        !matches!(self, DirtyState::Clean)
    }
}

/// First history entry with the same identity as `changeset`.
fn last_run<'h>(
    changeset: &ChangeSet,
    history: &'h [RanChangeSet],
    ignore_classpath_prefix: bool,
) -> Option<&'h RanChangeSet> {
    history
        .iter()
        .find(|ran| changeset.is_same_as(ran, ignore_classpath_prefix))
}

/// Keeps changesets that have never run, or that are `run_on_change` and
/// were altered since their recorded execution.
///
/// Does not look at `always_run`. The history is expected to hold at most one
/// entry per identity; when it holds more, the first one in history order is
/// the one compared.
pub struct DirtyChangesetFilter<'h> {
    history: &'h [RanChangeSet],
    ignore_classpath_prefix: bool,
}

impl<'h> DirtyChangesetFilter<'h> {
    pub fn new(history: &'h [RanChangeSet], ignore_classpath_prefix: bool) -> Self {
        warn_on_duplicate_history(history, ignore_classpath_prefix);
        Self {
            history,
            ignore_classpath_prefix,
        }
    }

    pub fn state(&self, changeset: &ChangeSet) -> DirtyState {
        match last_run(changeset, self.history, self.ignore_classpath_prefix) {
            None => DirtyState::NeverRan,
            Some(ran) if changeset.run_on_change && changeset.checksum() != ran.last_checksum => {
                DirtyState::ChecksumChanged
            }
            Some(_) => DirtyState::Clean,
        }
    }
}

impl ChangeSetFilter for DirtyChangesetFilter<'_> {
    fn accepts(&self, changeset: &ChangeSet) -> bool {
        self.state(changeset).is_dirty()
    }
}

fn warn_on_duplicate_history(history: &[RanChangeSet], ignore_classpath_prefix: bool) {
    let mut seen = HashSet::with_capacity(history.len());
    for ran in history {
        let key = ran.key(ignore_classpath_prefix);
        if !seen.insert(key) {
            log::warn!("History holds more than one entry for {key}; the first one is used");
        }
    }
}

/// The engine's default notion of "would run": never ran, `always_run`, or
/// `run_on_change` with an altered body.
pub struct ShouldRunFilter<'h> {
    history: &'h [RanChangeSet],
    ignore_classpath_prefix: bool,
}

impl<'h> ShouldRunFilter<'h> {
    pub fn new(history: &'h [RanChangeSet], ignore_classpath_prefix: bool) -> Self {
        Self {
            history,
            ignore_classpath_prefix,
        }
    }
}

impl ChangeSetFilter for ShouldRunFilter<'_> {
    fn accepts(&self, changeset: &ChangeSet) -> bool {
        match last_run(changeset, self.history, self.ignore_classpath_prefix) {
            None => true,
            Some(_) if changeset.always_run => true,
            Some(ran) => changeset.run_on_change && changeset.checksum() != ran.last_checksum,
        }
    }
}

/// Keeps changesets whose contexts intersect the runtime contexts.
///
/// An empty runtime set, or a changeset without contexts, always matches.
/// Labels compare case-insensitively.
pub struct ContextFilter {
    contexts: HashSet<String>,
}

impl ContextFilter {
    pub fn new(contexts: &[String]) -> Self {
        Self {
            contexts: contexts.iter().map(|c| c.trim().to_lowercase()).collect(),
        }
    }
}

impl ChangeSetFilter for ContextFilter {
    fn accepts(&self, changeset: &ChangeSet) -> bool {
        self.contexts.is_empty()
            || changeset.contexts.is_empty()
            || changeset
                .contexts
                .iter()
                .any(|c| self.contexts.contains(&c.trim().to_lowercase()))
    }
}

/// Keeps changesets that apply to the engine's database type.
///
/// A changeset without a `dbms` list, or listing `all`, always matches.
pub struct DbmsFilter {
    dbms: String,
}

impl DbmsFilter {
    pub fn new(dbms: &str) -> Self {
        Self {
            dbms: dbms.trim().to_string(),
        }
    }
}

impl ChangeSetFilter for DbmsFilter {
    fn accepts(&self, changeset: &ChangeSet) -> bool {
        changeset.dbms.is_empty()
            || changeset.dbms.iter().any(|d| {
                let d = d.trim();
                d.eq_ignore_ascii_case("all") || d.eq_ignore_ascii_case(&self.dbms)
            })
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
