//! `clientes` command-line entry point.
//!
//! # Responsibility
//! - Own the single SQLite connection for the whole run.
//! - Dispatch to the demonstration sequence or a single repository command.

mod cli;
mod demo;
mod output;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
