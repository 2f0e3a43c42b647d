//! bbsift CLI
//!
//! Validates bracket-tag markup files against a tag dictionary.

mod cli;
mod commands;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::Context;
use crate::commands::check::run_check;
use crate::commands::tags::run_tags;
use crate::commands::tree::run_tree;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(has_invalid) => {
            if has_invalid {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs the selected command. Returns true if an input was invalid.
fn run(cli: &Cli) -> Result<bool> {
    let ctx = Context::load(cli)?;

    match &cli.command {
        Commands::Check { files, format } => run_check(&ctx, files, *format),
        Commands::Tree { file } => run_tree(&ctx, file),
        Commands::Tags => {
            run_tags(&ctx);
            Ok(false)
        }
    }
}
