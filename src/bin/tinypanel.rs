// src/bin/tinypanel.rs

use colored::Colorize;
use tinypanel::cli::dispatcher;

/// The entry point: set up logging, hand the raw arguments to the
/// dispatcher and centralize error reporting.
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = dispatcher::dispatch(args) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
