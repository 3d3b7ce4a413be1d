//! Changelog loading.
//!
//! A changelog is a YAML file declaring an ordered list of changesets and,
//! optionally, other changelog files to include. Includes are resolved
//! relative to the including file and are loaded before the including file's
//! own changesets, so declaration order is depth-first.

use crate::changeset::ChangeSet;
use crate::error::{CoreError, CoreResult};
use crate::newtype_string::{Author, ChangeSetId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// On-disk shape of a changelog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangeLogFile {
    /// Path recorded for this file's changesets instead of its location
    #[serde(default)]
    logical_path: Option<String>,

    #[serde(default)]
    includes: Vec<String>,

    #[serde(default)]
    changesets: Vec<ChangeSetDecl>,
}

/// On-disk shape of a single changeset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangeSetDecl {
    id: ChangeSetId,
    author: Author,
    sql: String,
    #[serde(default)]
    always_run: bool,
    #[serde(default)]
    run_on_change: bool,
    #[serde(default)]
    contexts: Vec<String>,
    #[serde(default)]
    dbms: Vec<String>,
    #[serde(default)]
    comment: Option<String>,
}

impl ChangeSetDecl {
    fn into_changeset(self, path: &str) -> ChangeSet {
        let mut changeset = ChangeSet::new(self.id, self.author, path, self.sql)
            .with_always_run(self.always_run)
            .with_run_on_change(self.run_on_change)
            .with_contexts(self.contexts)
            .with_dbms(self.dbms);
        changeset.comment = self.comment;
        changeset
    }
}

/// The declared changesets of a project, in execution order.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    /// Root changelog file (empty when parsed from a string)
    pub path: PathBuf,

    pub changesets: Vec<ChangeSet>,
}

impl ChangeLog {
    /// Load `file` and everything it includes.
    ///
    /// Changeset paths are recorded relative to `project_root` with `/`
    /// separators unless the file declares a `logical_path`.
    pub fn load(project_root: &Path, file: &Path) -> CoreResult<Self> {
        let mut loader = Loader {
            root: project_root,
            stack: Vec::new(),
            loaded: HashSet::new(),
            seen: HashSet::new(),
            changesets: Vec::new(),
        };
        loader.load_file(file)?;
        log::debug!(
            "Loaded {} changeset(s) from {}",
            loader.changesets.len(),
            file.display()
        );
        Ok(Self {
            path: file.to_path_buf(),
            changesets: loader.changesets,
        })
    }

    /// Parse a single changelog document that has no includes.
    pub fn from_yaml_str(logical_path: &str, content: &str) -> CoreResult<Self> {
        let parsed = parse(logical_path, content)?;
        if let Some(include) = parsed.includes.into_iter().next() {
            return Err(CoreError::IncludeUnresolvable {
                path: logical_path.to_string(),
                include,
            });
        }

        let path = parsed.logical_path.as_deref().unwrap_or(logical_path);
        let mut seen = HashSet::new();
        let mut changesets = Vec::with_capacity(parsed.changesets.len());
        for decl in parsed.changesets {
            push_unique(&mut changesets, &mut seen, decl.into_changeset(path))?;
        }
        Ok(Self {
            path: PathBuf::new(),
            changesets,
        })
    }

    pub fn len(&self) -> usize {
        self.changesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changesets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeSet> {
        self.changesets.iter()
    }
}

struct Loader<'a> {
    root: &'a Path,
    /// Canonical paths of the files currently being loaded
    stack: Vec<PathBuf>,
    /// Canonical paths of files already fully loaded
    loaded: HashSet<PathBuf>,
    seen: HashSet<(String, String, String)>,
    changesets: Vec<ChangeSet>,
}

impl Loader<'_> {
    fn load_file(&mut self, file: &Path) -> CoreResult<()> {
        if !file.exists() {
            return Err(CoreError::ChangeLogNotFound {
                path: file.display().to_string(),
            });
        }
        let canonical = std::fs::canonicalize(file).map_err(|e| CoreError::IoWithPath {
            path: file.display().to_string(),
            source: e,
        })?;

        if self.stack.contains(&canonical) {
            let mut chain: Vec<String> = self
                .stack
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            chain.push(canonical.display().to_string());
            return Err(CoreError::IncludeCycle {
                chain: chain.join(" -> "),
            });
        }
        if self.loaded.contains(&canonical) {
            log::warn!("Changelog {} included more than once, skipping", file.display());
            return Ok(());
        }

        let content = std::fs::read_to_string(file).map_err(|e| CoreError::IoWithPath {
            path: file.display().to_string(),
            source: e,
        })?;
        let relative = relative_path(self.root, file);
        let parsed = parse(&relative, &content)?;

        self.stack.push(canonical.clone());
        let base = file.parent().unwrap_or_else(|| Path::new(""));
        for include in &parsed.includes {
            self.load_file(&base.join(include))?;
        }
        self.stack.pop();
        self.loaded.insert(canonical);

        let path = parsed.logical_path.as_deref().unwrap_or(&relative);
        for decl in parsed.changesets {
            push_unique(
                &mut self.changesets,
                &mut self.seen,
                decl.into_changeset(path),
            )?;
        }
        Ok(())
    }
}

fn parse(path: &str, content: &str) -> CoreResult<ChangeLogFile> {
    serde_yaml::from_str(content).map_err(|e| CoreError::ChangeLogParseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Append `changeset` unless its identity is already declared.
///
/// Identities compare with the `classpath:` prefix stripped, the way history
/// matching does, so two declarations that would share one history row are
/// rejected.
fn push_unique(
    changesets: &mut Vec<ChangeSet>,
    seen: &mut HashSet<(String, String, String)>,
    changeset: ChangeSet,
) -> CoreResult<()> {
    let key = changeset.key(true);
    let identity = (
        key.id.to_string(),
        key.author.to_string(),
        key.path.to_string(),
    );
    if !seen.insert(identity) {
        return Err(CoreError::DuplicateChangeSet {
            id: changeset.id.to_string(),
            author: changeset.author.to_string(),
            path: changeset.path,
        });
    }
    changesets.push(changeset);
    Ok(())
}

/// `file` relative to `root` with `/` separators, or `file` as displayed when
/// it lies outside `root`.
fn relative_path(root: &Path, file: &Path) -> String {
    match file.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => file.display().to_string(),
    }
}

#[cfg(test)]
#[path = "changelog_test.rs"]
mod tests;
