//! Analysis over collected graphs.
//!
//! Everything here works on a `{nodes, edges}` pair and never touches the
//! container. The typical flow mirrors what a viewer does with a snapshot:
//!
//! 1. [`filter_internal_modules`] hides framework plumbing.
//! 2. [`annotate`] applies the overlays enabled in [`GraphDisplaySettings`]:
//!    explicit and implicit request scope, provider and module cycles.

mod cycles;
mod filter;
mod scope;
mod settings;

pub use cycles::{CircularDependencies, CycleSet, detect_module_cycles, detect_provider_cycles};
pub use filter::{
    DEFAULT_EXCLUDED_MODULES, FilteredGraph, filter_internal_modules, missing_dependencies,
};
pub use scope::{implicit_request_scoped, request_scoped};
pub use settings::{
    FileSettingsStore, GraphDisplaySettings, MemorySettingsStore, SettingsError, SettingsStore,
};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::collector::PartialGraph;
use crate::model::{GraphEdge, GraphNode, GraphSnapshot};

/// Read access to a node and edge list.
pub trait GraphData {
    fn nodes(&self) -> &[GraphNode];
    fn edges(&self) -> &[GraphEdge];
}

impl GraphData for GraphSnapshot {
    fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }
}

impl GraphData for FilteredGraph {
    fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }
}

impl GraphData for PartialGraph {
    fn nodes(&self) -> &[GraphNode] {
        PartialGraph::nodes(self)
    }

    fn edges(&self) -> &[GraphEdge] {
        PartialGraph::edges(self)
    }
}

/// Overlay sets produced by [`annotate`]. Disabled overlays stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnnotations {
    pub request_scoped: IndexSet<String>,
    pub implicit_request_scoped: IndexSet<String>,
    pub cycles: CircularDependencies,
}

/// Run the analyses enabled in `settings`.
pub fn annotate(graph: &impl GraphData, settings: &GraphDisplaySettings) -> GraphAnnotations {
    let mut annotations = GraphAnnotations::default();

    if settings.highlight_request_scoped {
        annotations.request_scoped = request_scoped(graph);
    }
    if settings.highlight_implicit_request_scoped {
        annotations.implicit_request_scoped = implicit_request_scoped(graph);
    }
    if settings.detect_circular_deps {
        annotations.cycles = CircularDependencies::detect(graph);
    }

    annotations
}
