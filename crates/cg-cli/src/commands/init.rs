//! Init command implementation - scaffolds a new changeguard project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

const CHANGELOG: &str = r#"# Root changelog. Changesets run in declaration order; included files are
# loaded in place, before this file's own changesets.
includes: []

changesets: []
# - id: "001"
#   author: you
#   sql: CREATE TABLE example (id INTEGER PRIMARY KEY);
#
# - id: "002"
#   author: you
#   sql: CREATE OR REPLACE VIEW example_view AS SELECT * FROM example;
#   always_run: true
#   run_on_change: true
"#;

/// Execute the init command
pub(crate) fn execute(args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = Path::new(&args.name);

    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    println!("Creating new changeguard project: {}\n", args.name);

    let db_dir = project_dir.join("db");
    fs::create_dir_all(&db_dir)
        .with_context(|| format!("Failed to create directory: {}", db_dir.display()))?;

    // Escape YAML special characters in interpolated values
    let safe_name = args.name.replace('"', "\\\"");
    let safe_history_path = args.history_path.replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{name}"
changelog: db/changelog.yml

# The history store is opened read-only and must already exist.
# ":memory:" means nothing has ever run.
history:
  path: "{history_path}"
  dbms: duckdb

# contexts: [prod]

# Set to false to also fail on altered changesets that are both
# always_run and run_on_change.
always_ignoring_run_always: true
ignore_classpath_prefix: true
"#,
        name = safe_name,
        history_path = safe_history_path,
    );
    fs::write(project_dir.join("changeguard.yml"), config_content)
        .context("Failed to write changeguard.yml")?;

    fs::write(db_dir.join("changelog.yml"), CHANGELOG)
        .context("Failed to write db/changelog.yml")?;

    println!("  Created changeguard.yml");
    println!("  Created db/changelog.yml");
    println!("\nNext: add changesets to db/changelog.yml, then run `cg check`.");
    Ok(())
}
