//! Logging setup for the Graph Studio CLI.
//!
//! Precedence: `--verbose`, then `--quiet`, then `RUST_LOG`, then the
//! default INFO level for the gstudio crates.
//!
//! ```rust,no_run
//! use gstudio_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("collecting snapshot");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "gstudio_graph=debug,gstudio_config=debug,gstudio_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "gstudio_graph=info,gstudio_config=info,gstudio_cli=info";

/// Initialize the global tracing subscriber. Call once, before logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
