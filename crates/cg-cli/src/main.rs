//! changeguard CLI - startup gate against pending database changesets

use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{check, history, init, status};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Init(args) => init::execute(args),
        cli::Commands::Check(args) => check::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::History(args) => history::execute(args, &cli.global),
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ec) => ec.0,
            None => {
                eprintln!("Error: {err:#}");
                1
            }
        };
        std::process::exit(code);
    }
}
