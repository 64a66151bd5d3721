//! lapd - Lambda packager and deployer
//!
//! Packages the files selected for a function into a zip archive, uploads
//! it to S3, points the Lambda function's code at it and optionally purges
//! the function's CloudWatch log streams.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod archive;
mod cli;
mod cloud;
mod commands;
mod config;
mod error;
mod operations;
mod progress;

use cli::Cli;

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "warn,lapd=debug"
    } else {
        "warn,lapd=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    init_logging(cli.verbose);

    if let Err(e) = commands::deploy::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
