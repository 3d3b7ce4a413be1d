//! Status command implementation - per-changeset verdicts

use anyhow::Result;
use cg_core::normalize_path;
use cg_guard::{GuardError, MigrationEngine, VerdictReason};
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;

#[derive(Serialize)]
struct StatusEntry {
    id: String,
    author: String,
    path: String,
    always_run: bool,
    run_on_change: bool,
    reason: VerdictReason,
    pending: bool,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let guard = ctx.guard(&args.policy);
    let engine = ctx.engine();

    let candidates = engine
        .list_unrun_changesets(guard.contexts(), guard.candidate_selection())
        .map_err(GuardError::Engine)?;
    let history = engine.ran_changesets().map_err(GuardError::Engine)?;
    ctx.verbose(&format!(
        "{} unrun changeset(s), {} history record(s)",
        candidates.len(),
        history.len()
    ));

    let ignore_prefix = guard.policy().ignore_classpath_prefix;
    let entries: Vec<StatusEntry> = guard
        .classify(&candidates, &history)
        .into_iter()
        .map(|v| StatusEntry {
            id: v.changeset.id.to_string(),
            author: v.changeset.author.to_string(),
            path: normalize_path(&v.changeset.path, ignore_prefix).to_string(),
            always_run: v.changeset.always_run,
            run_on_change: v.changeset.run_on_change,
            reason: v.reason,
            pending: v.is_pending(),
        })
        .collect();

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No unrun changesets.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.id.clone(),
                        e.author.clone(),
                        e.path.clone(),
                        e.reason.as_str().to_string(),
                        if e.pending { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "AUTHOR", "PATH", "REASON", "PENDING"], &rows);
            let pending = entries.iter().filter(|e| e.pending).count();
            println!("\n{} of {} unrun changeset(s) pending", pending, entries.len());
        }
    }
    Ok(())
}
