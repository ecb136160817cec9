//! Command-line interface definition for Graph Studio.
//!
//! # Command Structure
//!
//! - `gstudio snapshot` - Collect and print the full graph snapshot
//! - `gstudio routes` - Print the routes view
//! - `gstudio analyze` - Terminal report with overlays
//! - `gstudio redact` - Sample a JSON payload through the redaction engine
//! - `gstudio serve` - Serve the read endpoints over HTTP

mod commands;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{AnalyzeArgs, Command, ManifestArg, RedactArgs, RoutesArgs, ServeArgs, SnapshotArgs};

/// Graph Studio - inspect dependency-injection container graphs
#[derive(Parser, Debug)]
#[command(
    name = "gstudio",
    version,
    about = "Inspect dependency-injection container graphs",
    long_about = "Graph Studio collects a structural snapshot of a dependency-injection container\n\
                  (modules, providers, controllers, routes and their relationships) from a\n\
                  container manifest, and reports it as JSON, as a terminal analysis or over HTTP."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to ./gstudio.toml or ./gstudio.json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
