//! Command-line interface definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// papersearch CLI
#[derive(Parser, Debug)]
#[command(name = "papersearch")]
#[command(about = "Search a paper catalogue with ranked, highlighted results", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the search service
    #[arg(long, global = true, env = "PAPERSEARCH_ORACLE_URL")]
    pub oracle_url: Option<String>,

    /// Newline-separated suggestion list for the interactive prompt
    #[arg(long, global = true)]
    pub suggestions: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one search and print a page of results
    Search(SearchArgs),
    /// Interactive prompt with suggestions, recent searches and dictation
    Interactive,
}

/// Search command arguments
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Search terms (case-insensitive)
    #[arg(short = 'q', long)]
    pub query: String,

    /// Page to print, 1-based (out of range pages are clamped)
    #[arg(short = 'p', long, default_value_t = 1)]
    pub page: usize,

    /// Print the page as JSON with highlight spans
    #[arg(long)]
    pub json: bool,
}
