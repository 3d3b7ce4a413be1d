//! Check command implementation - the startup gate

use anyhow::{Context, Result};
use cg_guard::GuardError;
use serde::Serialize;

use crate::cli::{CheckArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{ExitCode, PENDING_EXIT_CODE};
use crate::context::RuntimeContext;

#[derive(Serialize)]
struct CheckOutput<'a> {
    passed: bool,
    strict: bool,
    pending: &'a [cg_guard::PendingChangeSet],
}

/// Execute the check command
pub(crate) fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let guard = ctx.guard(&args.policy);
    let engine = ctx.engine();

    let pending = match guard.check(&engine) {
        Ok(()) => None,
        Err(GuardError::PendingMigrations(pending)) => Some(pending),
        Err(err) => return Err(err).context("Changeset check failed"),
    };

    match args.output {
        OutputFormat::Json => {
            let output = CheckOutput {
                passed: pending.is_none(),
                strict: guard.policy().is_strict(),
                pending: pending.as_ref().map(|p| p.pending()).unwrap_or(&[]),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => match &pending {
            None => println!("No pending changesets."),
            Some(pending) => eprintln!("{}", GuardError::from(pending.clone())),
        },
    }

    if pending.is_some() {
        return Err(ExitCode(PENDING_EXIT_CODE).into());
    }
    Ok(())
}
