//! Human-readable report of pending changesets.

use cg_core::{normalize_path, ChangeSet};
use serde::Serialize;

/// A pending changeset as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingChangeSet {
    pub id: String,
    pub author: String,
    /// Path after `classpath:` normalisation, if enabled
    pub path: String,
}

impl PendingChangeSet {
    pub fn from_changeset(changeset: &ChangeSet, ignore_classpath_prefix: bool) -> Self {
        Self {
            id: changeset.id.to_string(),
            author: changeset.author.to_string(),
            path: normalize_path(&changeset.path, ignore_classpath_prefix).to_string(),
        }
    }
}

/// Render the startup-failure report.
///
/// ```text
///
/// --
/// 2 changeset(s) has/have to run.
///     1 (db/changelog.yml)
///     2 (db/changelog.yml)
/// This does *NOT* include changesets marked as 'alwaysRun'.
/// --
/// ```
///
/// Under the strict policy the last note says that `always_run` changesets
/// marked `run_on_change` are counted once altered.
pub fn render(pending: &[PendingChangeSet], strict: bool) -> String {
    let mut out = format!("\n--\n{} changeset(s) has/have to run.\n", pending.len());
    for entry in pending {
        out.push_str(&format!("\t{} ({})\n", entry.id, entry.path));
    }
    if strict {
        out.push_str(
            "This does *NOT* include changesets marked as 'alwaysRun'...\n\
             \t...(unless they are marked as 'runOnChange' and have been altered).\n",
        );
    } else {
        out.push_str("This does *NOT* include changesets marked as 'alwaysRun'.\n");
    }
    out.push_str("--");
    out
}
