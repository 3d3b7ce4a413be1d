//! Configuration types and parsing for changeguard.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// In-memory history store path; nothing has ever run against it.
pub const MEMORY_PATH: &str = ":memory:";

/// Main project configuration from changeguard.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Root changelog file, relative to the project directory
    pub changelog: String,

    /// Execution history store
    #[serde(default)]
    pub history: HistoryConfig,

    /// Execution contexts passed to the migration engine (empty = all)
    #[serde(default)]
    pub contexts: Vec<String>,

    /// Never treat `always_run` changesets as pending, even when they are
    /// also `run_on_change` and have been altered
    #[serde(default = "default_true")]
    pub always_ignoring_run_always: bool,

    /// Strip a leading `classpath:` from changeset paths when matching
    /// history and when reporting
    #[serde(default = "default_true")]
    pub ignore_classpath_prefix: bool,
}

/// Execution history store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// DuckDB file holding the history, or `:memory:`
    #[serde(default = "default_history_path")]
    pub path: String,

    /// Database type matched against changeset `dbms` lists
    #[serde(default = "default_dbms")]
    pub dbms: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            dbms: default_dbms(),
        }
    }
}

fn default_history_path() -> String {
    MEMORY_PATH.to_string()
}

fn default_dbms() -> String {
    "duckdb".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for changeguard.yml or changeguard.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("changeguard.yml");
        let yaml_path = dir.join("changeguard.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.changelog.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "'changelog' must name the root changelog file".to_string(),
            });
        }
        if self.history.dbms.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "'history.dbms' cannot be empty".to_string(),
            });
        }
        if self.contexts.iter().any(|c| c.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "'contexts' cannot contain empty labels".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute path of the root changelog
    pub fn changelog_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.changelog)
    }

    /// Absolute path of the history store, or `None` for an in-memory store
    pub fn history_path_absolute(&self, root: &Path) -> Option<PathBuf> {
        if self.history.path == MEMORY_PATH {
            None
        } else {
            Some(root.join(&self.history.path))
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
