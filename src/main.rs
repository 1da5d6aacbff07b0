//! Lugal CLI - inspect deterministically generated conquest boards.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Lugal - a deterministic hex conquest turn engine
#[derive(Parser, Debug)]
#[command(name = "lugal")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a board from a seed and print it
    Map {
        /// Random seed (default: 0)
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Board width in cells
        #[arg(short = 'W', long, default_value = "24")]
        width: u16,

        /// Board height in cells
        #[arg(short = 'H', long, default_value = "16")]
        height: u16,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Map {
            seed,
            width,
            height,
            format,
        } => cli::map::execute(seed, width, height, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
