//! Serve command implementation.

use std::path::Path;
use std::sync::Arc;

use gstudio_config::ConfigOverrides;

use crate::cli::ServeArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::{server, ui};

/// Serve the read endpoints until interrupted.
pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = ConfigOverrides {
        port: args.port,
        host: args.host,
        ..utils::manifest_overrides(&args.manifest)
    };
    let config = utils::load_config(config_path, &overrides)?;
    let collector = utils::load_collector(&config)?;

    if !config.enabled {
        ui::warning("Graph Studio is disabled; every path will answer 404");
    }

    server::serve(Arc::new(collector), &config).await
}
