//! Treeshell CLI Binary

use clap::Parser;
use std::process;
use treeshell::logging::init_logging;
use treeshell::tooling::cli::{Cli, CliContext, Commands};

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&context.config().logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let command = cli.command.clone().unwrap_or(Commands::Shell);
    match context.execute(&command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
