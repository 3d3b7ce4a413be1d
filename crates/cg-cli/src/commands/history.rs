//! History command implementation - recorded executions

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, HistoryArgs, OutputFormat};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;

/// Execute the history command
pub(crate) fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let records = ctx
        .history
        .ran_changesets()
        .context("Failed to read execution history")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No recorded executions.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        r.order_executed.to_string(),
                        r.id.to_string(),
                        r.author.to_string(),
                        r.path.clone(),
                        r.exec_type.to_string(),
                        r.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                        r.last_checksum.as_str().chars().take(12).collect(),
                    ]
                })
                .collect();
            print_table(
                &["#", "ID", "AUTHOR", "PATH", "TYPE", "EXECUTED AT", "CHECKSUM"],
                &rows,
            );
        }
    }
    Ok(())
}
