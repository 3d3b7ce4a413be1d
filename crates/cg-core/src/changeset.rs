//! Declared changesets and their identity.

use crate::checksum::Checksum;
use crate::history::RanChangeSet;
use crate::newtype_string::{Author, ChangeSetId};
use serde::Serialize;
use std::fmt;

/// Logical prefix that changelog paths may carry when they were resolved
/// from an application classpath rather than the filesystem.
pub const CLASSPATH_PREFIX: &str = "classpath:";

/// Strip the [`CLASSPATH_PREFIX`] from `path` when `ignore_classpath_prefix`
/// is set, otherwise return it unchanged.
pub fn normalize_path(path: &str, ignore_classpath_prefix: bool) -> &str {
    if ignore_classpath_prefix {
        path.strip_prefix(CLASSPATH_PREFIX).unwrap_or(path)
    } else {
        path
    }
}

/// Borrowed `(id, author, path)` identity shared by [`ChangeSet`] and
/// [`RanChangeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeSetKey<'a> {
    pub id: &'a str,
    pub author: &'a str,
    pub path: &'a str,
}

impl fmt::Display for ChangeSetKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.path, self.id, self.author)
    }
}

/// A single declared migration unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// Identifier, unique together with `author` and `path`
    pub id: ChangeSetId,

    /// Author of the changeset
    pub author: Author,

    /// Logical path of the changelog file that declares it
    pub path: String,

    /// Body the checksum is computed from
    pub sql: String,

    /// Execute on every run regardless of history
    pub always_run: bool,

    /// Re-execute when the body changed since the recorded execution
    pub run_on_change: bool,

    /// Execution contexts this changeset is restricted to (empty = all)
    pub contexts: Vec<String>,

    /// Database types this changeset applies to (empty = all)
    pub dbms: Vec<String>,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ChangeSet {
    /// Create a changeset with both run-policy flags off and no restrictions.
    pub fn new(
        id: ChangeSetId,
        author: Author,
        path: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        Self {
            id,
            author,
            path: path.into(),
            sql: sql.into(),
            always_run: false,
            run_on_change: false,
            contexts: Vec::new(),
            dbms: Vec::new(),
            comment: None,
        }
    }

    pub fn with_always_run(mut self, always_run: bool) -> Self {
        self.always_run = always_run;
        self
    }

    pub fn with_run_on_change(mut self, run_on_change: bool) -> Self {
        self.run_on_change = run_on_change;
        self
    }

    pub fn with_contexts(mut self, contexts: Vec<String>) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn with_dbms(mut self, dbms: Vec<String>) -> Self {
        self.dbms = dbms;
        self
    }

    /// Checksum of the current declared body.
    pub fn checksum(&self) -> Checksum {
        Checksum::compute(&self.sql)
    }

    /// Identity of this changeset, with the path normalised per
    /// [`normalize_path`].
    pub fn key(&self, ignore_classpath_prefix: bool) -> ChangeSetKey<'_> {
        ChangeSetKey {
            id: self.id.as_str(),
            author: self.author.as_str(),
            path: normalize_path(&self.path, ignore_classpath_prefix),
        }
    }

    /// Whether `ran` records a previous execution of this changeset.
    ///
    /// Identity only; checksums are not compared here.
    pub fn is_same_as(&self, ran: &RanChangeSet, ignore_classpath_prefix: bool) -> bool {
        self.key(ignore_classpath_prefix) == ran.key(ignore_classpath_prefix)
    }
}

#[cfg(test)]
#[path = "changeset_test.rs"]
mod tests;
