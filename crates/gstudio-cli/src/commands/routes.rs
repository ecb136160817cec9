//! Routes command implementation.

use std::path::Path;

use crate::cli::RoutesArgs;
use crate::commands::utils;
use crate::error::Result;

/// Print the `{routes, stats}` view as JSON.
pub fn execute(args: RoutesArgs, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(config_path, &utils::manifest_overrides(&args.manifest))?;
    let collector = utils::load_collector(&config)?;

    utils::write_json(&collector.collect().routes_view(), args.pretty, None)
}
