//! Runtime context for CLI commands

use anyhow::{Context, Result};
use cg_core::{ChangeLog, Config};
use cg_guard::{ChangeLogEngine, GuardPolicy, MigrationGuard};
use cg_meta::HistoryDb;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalArgs, PolicyArgs};
use crate::commands::common::parse_contexts;

/// Loaded configuration, changelog and history store
pub(crate) struct RuntimeContext {
    pub config: Config,

    pub changelog: ChangeLog,

    pub history: HistoryDb,

    verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        let changelog_path = config.changelog_path_absolute(&root);
        let changelog = ChangeLog::load(&root, &changelog_path)
            .with_context(|| format!("Failed to load changelog {}", changelog_path.display()))?;

        let history = match config.history_path_absolute(&root) {
            Some(path) => HistoryDb::open(&path)
                .with_context(|| format!("Failed to open history store {}", path.display()))?,
            None => HistoryDb::open_memory().context("Failed to open in-memory history store")?,
        };

        let ctx = Self {
            config,
            changelog,
            history,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Loaded {} changeset(s) for project '{}' from {}",
            ctx.changelog.len(),
            ctx.config.name,
            root.display()
        ));
        Ok(ctx)
    }

    /// Print verbose output if enabled
    pub(crate) fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Guard configured from the project config, with CLI overrides applied
    pub(crate) fn guard(&self, overrides: &PolicyArgs) -> MigrationGuard {
        let mut policy = GuardPolicy::from_config(&self.config);
        if overrides.strict {
            policy.always_ignoring_run_always = false;
        }
        let contexts = match &overrides.contexts {
            Some(list) => parse_contexts(list),
            None => self.config.contexts.clone(),
        };
        self.verbose(&format!(
            "Policy: {}, contexts: [{}]",
            if policy.is_strict() { "strict" } else { "default" },
            contexts.join(", ")
        ));
        MigrationGuard::new(policy).with_contexts(contexts)
    }

    /// Engine over this project's changelog and history store
    pub(crate) fn engine(&self) -> ChangeLogEngine<&HistoryDb> {
        ChangeLogEngine::new(
            self.changelog.clone(),
            &self.history,
            self.config.history.dbms.clone(),
        )
        .with_ignore_classpath_prefix(self.config.ignore_classpath_prefix)
    }
}
