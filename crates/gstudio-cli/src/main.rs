//! Graph Studio CLI entry point.

use clap::Parser;
use gstudio_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let config = args.config.as_deref();
    let result = match args.command {
        cli::Command::Snapshot(snapshot_args) => commands::snapshot_execute(snapshot_args, config),
        cli::Command::Routes(routes_args) => commands::routes_execute(routes_args, config),
        cli::Command::Analyze(analyze_args) => commands::analyze_execute(analyze_args, config),
        cli::Command::Redact(redact_args) => commands::redact_execute(redact_args, config),
        cli::Command::Serve(serve_args) => commands::serve_execute(serve_args, config).await,
    };

    result.map_err(error::cli_error_to_miette)
}
