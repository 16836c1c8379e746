//! linegen command line
//!
//! This binary runs the full generation pipeline: build the generator, generate
//! every client package and the webhook package, and prune stale files. It exits
//! non-zero at the first failing command.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::process::ExitCode;

use clap::Parser;
use linegen_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match linegen_cli::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("linegen failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
