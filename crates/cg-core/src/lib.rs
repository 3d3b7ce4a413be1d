//! cg-core - Core library for changeguard
//!
//! This crate provides the changeset and execution-history types, checksum
//! computation, changelog loading, and `changeguard.yml` configuration used
//! across all changeguard components.

pub mod changelog;
pub mod changeset;
pub mod checksum;
pub mod config;
pub mod error;
pub mod history;
mod newtype_string;
pub(crate) mod serde_helpers;

pub use changelog::ChangeLog;
pub use changeset::{normalize_path, ChangeSet, ChangeSetKey, CLASSPATH_PREFIX};
pub use checksum::Checksum;
pub use config::{Config, HistoryConfig};
pub use error::{CoreError, CoreResult};
pub use history::{ExecType, RanChangeSet};
pub use newtype_string::{Author, ChangeSetId};
