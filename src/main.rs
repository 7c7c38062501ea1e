mod cli;
mod commands;
mod error;
mod output;
mod pdf;
mod report;
mod sheet;
mod tiling;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::convert::ConvertOptions;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Convert(cli.convert)) {
        Commands::Convert(args) => {
            let options = ConvertOptions {
                input: args.input,
                output_dir: args.output_dir,
                date: chrono::Local::now().date_naive(),
                compress: true,
            };
            if !commands::convert::run(&options) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Plan { input, json } => {
            commands::plan::run(&input, json)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
