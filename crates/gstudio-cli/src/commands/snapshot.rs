//! Snapshot command implementation.

use std::path::Path;

use gstudio_graph::NodeType;

use crate::cli::SnapshotArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Collect the graph and print it as JSON.
pub fn execute(args: SnapshotArgs, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(config_path, &utils::manifest_overrides(&args.manifest))?;
    let collector = utils::load_collector(&config)?;

    let snapshot = collector.collect();
    utils::write_json(&snapshot, args.pretty, args.output.as_deref())?;

    let missing = snapshot.nodes_of(NodeType::Missing).count();
    if missing > 0 {
        ui::warning(&format!("{} unresolved dependencies", missing));
    }
    if args.output.is_some() {
        ui::info(&ui::format_stats(&snapshot.stats));
    }
    Ok(())
}
