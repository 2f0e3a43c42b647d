//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// bbsift - Validate bracket-tag markup
#[derive(Parser)]
#[command(name = "bbsift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Tag dictionary JSON file (overrides the configuration)
    #[arg(short, long, global = true)]
    pub dictionary: Option<PathBuf>,

    /// Do not escape <, > and " before parsing
    #[arg(long, global = true)]
    pub no_escape_html: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check files for markup errors
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the parsed tree of a file as JSON
    Tree {
        /// File to parse
        file: PathBuf,
    },

    /// List the tags of the active dictionary
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
