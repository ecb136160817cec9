//! Analyze command implementation.
//!
//! Filters framework-internal modules, applies the display toggles and
//! reports missing dependencies, request-scope propagation and cycles.

use std::fmt::Write as _;
use std::path::Path;

use gstudio_config::ConfigOverrides;
use gstudio_graph::analysis::{
    FileSettingsStore, MemorySettingsStore, SettingsStore, missing_dependencies,
};
use gstudio_graph::{
    FilteredGraph, GraphAnnotations, GraphDisplaySettings, GraphStats, annotate,
    filter_internal_modules,
};
use serde::Serialize;

use crate::cli::AnalyzeArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Analysis output, printed as text or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub stats: GraphStats,
    pub missing: Vec<MissingDependency>,
    pub settings: GraphDisplaySettings,
    pub annotations: GraphAnnotations,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDependency {
    pub token: String,
    pub required_by: Vec<String>,
}

impl AnalysisReport {
    pub fn new(graph: &FilteredGraph, settings: GraphDisplaySettings) -> Self {
        let missing = missing_dependencies(graph)
            .into_iter()
            .map(|node| MissingDependency {
                token: node.name.clone(),
                required_by: node
                    .missing
                    .as_ref()
                    .map(|info| info.required_by.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            stats: graph.stats,
            missing,
            settings,
            annotations: annotate(graph, &settings),
        }
    }

    /// Plain-text report. Disabled overlays are left out.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Graph: {}", ui::format_stats(&self.stats));

        let _ = writeln!(out, "\n{}", ui::section("Missing dependencies", self.missing.len()));
        for missing in &self.missing {
            let _ = writeln!(
                out,
                "  {} <- {}",
                missing.token,
                ui::format_id_list(&missing.required_by)
            );
        }

        if self.settings.highlight_request_scoped {
            let ids = &self.annotations.request_scoped;
            let _ = writeln!(out, "\n{}", ui::section("Request-scoped", ids.len()));
            for id in ids {
                let _ = writeln!(out, "  {}", id);
            }
        }

        if self.settings.highlight_implicit_request_scoped {
            let ids = &self.annotations.implicit_request_scoped;
            let _ = writeln!(
                out,
                "\n{}",
                ui::section("Implicitly request-scoped", ids.len())
            );
            for id in ids {
                let _ = writeln!(out, "  {}", id);
            }
        }

        if self.settings.detect_circular_deps {
            let cycles = &self.annotations.cycles;
            let _ = writeln!(
                out,
                "\n{}",
                ui::section("Provider cycles", cycles.providers.nodes.len())
            );
            let _ = writeln!(out, "  {}", ui::format_id_list(&cycles.providers.nodes));
            let _ = writeln!(
                out,
                "\n{}",
                ui::section("Module cycles", cycles.modules.nodes.len())
            );
            let _ = writeln!(out, "  {}", ui::format_id_list(&cycles.modules.nodes));
        }

        out
    }
}

/// Print the analysis report for the configured manifest.
pub fn execute(args: AnalyzeArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = ConfigOverrides {
        settings_file: args.settings.clone(),
        ..utils::manifest_overrides(&args.manifest)
    };
    let config = utils::load_config(config_path, &overrides)?;
    let collector = utils::load_collector(&config)?;
    let snapshot = collector.collect();

    let graph = if args.include_internal {
        FilteredGraph::unfiltered(&snapshot)
    } else {
        filter_internal_modules(&snapshot, &config.excluded_modules)
    };

    let store: Box<dyn SettingsStore> = match &config.settings_file {
        Some(path) => Box::new(FileSettingsStore::new(path)),
        None => Box::new(MemorySettingsStore::default()),
    };
    let settings = apply_flags(store.load(), &args);
    if args.save_settings {
        store.save(&settings)?;
        ui::success("Saved display settings");
    }

    let report = AnalysisReport::new(&graph, settings);
    if args.json {
        utils::write_json(&report, true, None)?;
    } else {
        print!("{}", report.render());
    }

    if !report.missing.is_empty() {
        ui::warning(&format!("{} unresolved dependencies", report.missing.len()));
    }
    Ok(())
}

/// Flags switch overlays on; they never switch a saved toggle off.
fn apply_flags(mut settings: GraphDisplaySettings, args: &AnalyzeArgs) -> GraphDisplaySettings {
    settings.highlight_request_scoped |= args.request_scoped;
    settings.highlight_implicit_request_scoped |= args.implicit_request;
    settings.detect_circular_deps |= args.cycles;
    settings
}
