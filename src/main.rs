//! suitegen CLI entry point.

use clap::Parser;
use suitegen::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Generate(args) => cli::run_generate(args),
        Commands::Inspect(args) => cli::run_inspect(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
