//! Snapshot collection over a resolved DI container.
//!
//! Collection runs as an explicit two-phase pipeline:
//!
//! ```text
//! ModulesContainer ──collect_structure──▶ PartialGraph ──collect_edges──▶ GraphSnapshot
//!                    (modules, providers,                (injects edges, missing
//!                     controllers, routes)                nodes, timestamp)
//! ```
//!
//! Every node exists before the second phase starts, because a dependency may
//! live in a module that is visited after its consumer. Both phases only read
//! the container; each call builds its own working collections.

mod dependencies;
mod structure;

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::container::{InstanceWrapper, MetadataReader, ModulesContainer};
use crate::model::{GraphEdge, GraphNode, GraphSnapshot, GraphStats, RouteMeta};

/// Class name of the controller that serves the diagnostics API itself.
pub const DIAGNOSTICS_CONTROLLER: &str = "GraphStudioController";

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// Controller whose routes are never walked.
    pub diagnostics_controller: String,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            diagnostics_controller: DIAGNOSTICS_CONTROLLER.to_string(),
        }
    }
}

/// Builds [`GraphSnapshot`]s from a container and a metadata reader.
///
/// The collector is cheap to clone and safe to share between threads when
/// the reader is; every [`collect`](Self::collect) call is independent.
#[derive(Debug, Clone)]
pub struct SnapshotCollector<R> {
    container: Arc<ModulesContainer>,
    reader: R,
    options: CollectorOptions,
}

impl<R: MetadataReader> SnapshotCollector<R> {
    pub fn new(container: Arc<ModulesContainer>, reader: R) -> Self {
        Self {
            container,
            reader,
            options: CollectorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CollectorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn container(&self) -> &ModulesContainer {
        &self.container
    }

    pub fn options(&self) -> &CollectorOptions {
        &self.options
    }

    /// Collect a complete snapshot.
    pub fn collect(&self) -> GraphSnapshot {
        let structure = self.collect_structure();
        let snapshot = self.collect_edges(structure);

        tracing::debug!(
            modules = snapshot.stats.modules,
            providers = snapshot.stats.providers,
            controllers = snapshot.stats.controllers,
            routes = snapshot.stats.routes,
            edges = snapshot.edges.len(),
            "collected graph snapshot"
        );

        snapshot
    }
}

/// Output of the structural pass: every node, the structural edges and the
/// route table, without dependency edges.
#[derive(Debug, Clone, Default)]
pub struct PartialGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    routes: Vec<RouteMeta>,
    stats: GraphStats,
    node_ids: FxHashSet<String>,
}

impl PartialGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn routes(&self) -> &[RouteMeta] {
        &self.routes
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    /// Append a node unless its id is already taken. Stats only move on
    /// first insertion.
    fn insert_node(&mut self, node: GraphNode) -> bool {
        if !self.node_ids.insert(node.id.clone()) {
            return false;
        }
        self.stats.record(node.node_type);
        self.nodes.push(node);
        true
    }

    fn push_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }
}

/// Name under which a provider or controller registration is shown.
fn display_name(wrapper: &InstanceWrapper) -> &str {
    wrapper.resolved_name().unwrap_or("Anonymous")
}
