//! # Dell Orders Tracker entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Initialize logging (stderr + rolling file); failures only warn
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   │
//!   ├─> No command: print usage, exit 0
//!   │
//!   └─> Command: run it, exit 1 on any error
//! ```
//!
//! Errors are worded the same way the interactive view words them: file not
//! found and missing columns get their own message, everything else is
//! "Error processing file".

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Reports go to stdout
#![expect(clippy::print_stderr)] // Logging setup failures

mod cli;

use clap::Parser as _;
use dell_orders::error::OrdersError;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = dell_orders::logging::init() {
        eprintln!("Warning: logging disabled: {err:#}");
    }

    let cli = cli::Cli::parse();

    let Some(command) = cli.command else {
        cli::print_usage();
        return ExitCode::SUCCESS;
    };

    match cli::run_command(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {err:#}");
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &anyhow::Error) {
    if let Some(reported) = err.downcast_ref::<cli::ReportedError>() {
        println!("{reported}");
        return;
    }

    match err.downcast_ref::<OrdersError>() {
        Some(OrdersError::NotFound(path)) => {
            println!("Error: File not found: {}", path.display());
        }
        Some(OrdersError::Schema { column }) => {
            println!("Error: Missing required column in file: {column}");
            println!("Make sure your file has the 'Service Tag Quantity' column");
        }
        _ => println!("Error processing file: {err:#}"),
    }
}
