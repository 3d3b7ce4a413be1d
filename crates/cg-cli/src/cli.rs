//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// changeguard - Refuse to start when database changesets are pending
#[derive(Parser, Debug)]
#[command(name = "cg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fail if any changeset would run (startup gate)
    Check(CheckArgs),

    /// Show how every unrun changeset is classified
    Status(StatusArgs),

    /// List recorded changeset executions
    History(HistoryArgs),

    /// Scaffold changeguard.yml and an empty changelog
    Init(InitArgs),
}

/// Policy overrides shared by `check` and `status`
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Execution contexts (comma-separated), overriding `contexts` in config
    #[arg(long, env = "CG_CONTEXTS")]
    pub contexts: Option<String>,

    /// Count always-run changesets that are run-on-change and were altered
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name; also the directory created
    pub name: String,

    /// History store path written to changeguard.yml; point it at the
    /// DuckDB file your migration runner records executions in
    #[arg(long, default_value = ":memory:")]
    pub history_path: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
