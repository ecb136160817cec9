//! Removal of framework-internal modules before display or analysis.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::GraphData;
use crate::model::{GraphEdge, GraphNode, GraphSnapshot, GraphStats, NodeType};

/// Modules hidden from the graph unless explicitly requested.
pub const DEFAULT_EXCLUDED_MODULES: &[&str] =
    &["GraphStudioModule", "InternalCoreModule", "DiscoveryModule"];

/// Nodes and edges left after filtering, with stats recounted from the nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: GraphStats,
}

impl FilteredGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let stats = GraphStats::from_nodes(&nodes);
        Self {
            nodes,
            edges,
            stats,
        }
    }

    /// Whole snapshot, nothing removed.
    pub fn unfiltered(snapshot: &GraphSnapshot) -> Self {
        Self::new(snapshot.nodes.clone(), snapshot.edges.clone())
    }
}

/// Drop every node owned by (or, for MODULE nodes, named after) an excluded
/// module. Only edges whose ends are both kept nodes survive.
pub fn filter_internal_modules<S: AsRef<str>>(
    snapshot: &GraphSnapshot,
    excluded: &[S],
) -> FilteredGraph {
    let excluded: FxHashSet<&str> = excluded.iter().map(|name| name.as_ref()).collect();

    let is_excluded = |node: &GraphNode| {
        if let Some(module) = node.module.as_deref() {
            if excluded.contains(module) {
                return true;
            }
        }
        node.node_type == NodeType::Module && excluded.contains(node.name.as_str())
    };

    let nodes: Vec<GraphNode> = snapshot
        .nodes
        .iter()
        .filter(|node| !is_excluded(node))
        .cloned()
        .collect();

    let kept: FxHashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let edges: Vec<GraphEdge> = snapshot
        .edges
        .iter()
        .filter(|edge| kept.contains(edge.from.as_str()) && kept.contains(edge.to.as_str()))
        .cloned()
        .collect();

    tracing::debug!(
        dropped = snapshot.nodes.len() - nodes.len(),
        kept = nodes.len(),
        edges = edges.len(),
        "filtered internal modules"
    );

    FilteredGraph::new(nodes, edges)
}

/// MISSING nodes of a graph, in node order.
pub fn missing_dependencies(graph: &impl GraphData) -> Vec<&GraphNode> {
    graph
        .nodes()
        .iter()
        .filter(|node| node.node_type == NodeType::Missing)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeKind, Scope};

    fn snapshot(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> GraphSnapshot {
        GraphSnapshot {
            created_at: "2024-01-01T00:00:00.000Z".into(),
            stats: GraphStats::from_nodes(&nodes),
            nodes,
            edges,
            routes: vec![],
        }
    }

    #[test]
    fn drops_internal_modules_and_their_members() {
        let app = GraphNode::module("AppModule");
        let studio = GraphNode::module("GraphStudioModule");
        let studio_controller =
            GraphNode::controller("GraphStudioModule", "GraphStudioController", Scope::Singleton);
        let service = GraphNode::provider("AppModule", "AppService", Scope::Singleton);

        let snapshot = snapshot(
            vec![
                app.clone(),
                studio.clone(),
                studio_controller.clone(),
                service.clone(),
            ],
            vec![
                GraphEdge::new(app.id.as_str(), studio.id.as_str(), EdgeKind::Import),
                GraphEdge::new(
                    studio.id.as_str(),
                    studio_controller.id.as_str(),
                    EdgeKind::Export,
                ),
                GraphEdge::new(app.id.as_str(), service.id.as_str(), EdgeKind::Export),
            ],
        );

        let filtered = filter_internal_modules(&snapshot, DEFAULT_EXCLUDED_MODULES);

        let ids: Vec<_> = filtered.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, [app.id.as_str(), service.id.as_str()]);
        assert_eq!(filtered.edges.len(), 1);
        assert_eq!(filtered.edges[0].to, service.id);
        assert_eq!(filtered.stats.modules, 1);
        assert_eq!(filtered.stats.providers, 1);
        assert_eq!(filtered.stats.controllers, 0);
    }

    #[test]
    fn drops_edges_to_nodes_outside_the_graph() {
        let app = GraphNode::module("AppModule");
        let service = GraphNode::provider("AppModule", "AppService", Scope::Singleton);

        let snapshot = snapshot(
            vec![app.clone(), service.clone()],
            vec![
                GraphEdge::new(app.id.as_str(), "module:UnknownModule", EdgeKind::Import),
                GraphEdge::new(service.id.as_str(), "provider:AppModule:CONFIG", EdgeKind::Injects),
                GraphEdge::new(app.id.as_str(), service.id.as_str(), EdgeKind::Export),
            ],
        );

        let filtered = filter_internal_modules::<&str>(&snapshot, &[]);
        assert_eq!(filtered.nodes.len(), 2);
        assert_eq!(filtered.edges.len(), 1);
        assert_eq!(filtered.edges[0].kind, EdgeKind::Export);
    }

    #[test]
    fn empty_exclusion_list_keeps_everything() {
        let snapshot = snapshot(
            vec![GraphNode::module("DiscoveryModule")],
            vec![],
        );

        let filtered = filter_internal_modules::<&str>(&snapshot, &[]);
        assert_eq!(filtered.nodes.len(), 1);
        assert_eq!(filtered, FilteredGraph::unfiltered(&snapshot));
    }

    #[test]
    fn missing_nodes_are_listed() {
        let graph = FilteredGraph::new(
            vec![
                GraphNode::module("A"),
                GraphNode::missing("LOGGER", vec!["provider:A:S".into()]),
            ],
            vec![],
        );

        let missing = missing_dependencies(&graph);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "LOGGER");
    }
}
