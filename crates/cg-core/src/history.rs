//! Execution history records.

use crate::changeset::{normalize_path, ChangeSetKey};
use crate::checksum::Checksum;
use crate::newtype_string::{Author, ChangeSetId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a changeset came to be recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecType {
    /// First execution
    #[default]
    Executed,
    /// Re-executed (always-run or run-on-change)
    Reran,
    /// Recorded as run without being executed
    MarkRan,
}

impl ExecType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecType::Executed => "EXECUTED",
            ExecType::Reran => "RERAN",
            ExecType::MarkRan => "MARK_RAN",
        }
    }
}

impl fmt::Display for ExecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXECUTED" => Ok(ExecType::Executed),
            "RERAN" => Ok(ExecType::Reran),
            "MARK_RAN" => Ok(ExecType::MarkRan),
            other => Err(format!("unknown exec type '{other}'")),
        }
    }
}

/// A recorded execution of a changeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RanChangeSet {
    pub id: ChangeSetId,
    pub author: Author,
    pub path: String,

    /// Checksum of the body at its last successful execution
    pub last_checksum: Checksum,

    pub executed_at: DateTime<Utc>,

    /// Position in the global execution order
    pub order_executed: i64,

    pub exec_type: ExecType,
}

impl RanChangeSet {
    /// Create a record executed now, first in order.
    pub fn new(
        id: ChangeSetId,
        author: Author,
        path: impl Into<String>,
        last_checksum: Checksum,
    ) -> Self {
        Self {
            id,
            author,
            path: path.into(),
            last_checksum,
            executed_at: Utc::now(),
            order_executed: 1,
            exec_type: ExecType::Executed,
        }
    }

    /// Identity of the recorded changeset, with the path normalised per
    /// [`normalize_path`].
    pub fn key(&self, ignore_classpath_prefix: bool) -> ChangeSetKey<'_> {
        ChangeSetKey {
            id: self.id.as_str(),
            author: self.author.as_str(),
            path: normalize_path(&self.path, ignore_classpath_prefix),
        }
    }
}
