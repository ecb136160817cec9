//! Circular dependency detection over module imports and injections.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::GraphData;
use crate::model::{EdgeKind, NodeType, edge_key};

/// Nodes and `{from}-{to}` edge keys that lie on a detected cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSet {
    pub nodes: IndexSet<String>,
    pub edges: IndexSet<String>,
}

impl CycleSet {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edges.contains(&edge_key(from, to))
    }
}

/// Provider-level and module-level cycles of one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependencies {
    pub providers: CycleSet,
    pub modules: CycleSet,
}

impl CircularDependencies {
    pub fn detect(graph: &impl GraphData) -> Self {
        Self {
            providers: detect_provider_cycles(graph),
            modules: detect_module_cycles(graph),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty() && self.modules.is_empty()
    }
}

/// Cycles along `injects` edges, starting from every node.
///
/// Controllers take part in injection, so the walk is not limited to
/// providers. A node injecting itself is a one-node cycle.
pub fn detect_provider_cycles(graph: &impl GraphData) -> CycleSet {
    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for edge in graph.edges().iter().filter(|e| e.kind == EdgeKind::Injects) {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
    }

    let starts = graph.nodes().iter().map(|node| node.id.as_str());
    CycleWalker::new(adjacency).run(starts)
}

/// Cycles along `import` edges between MODULE nodes.
pub fn detect_module_cycles(graph: &impl GraphData) -> CycleSet {
    let modules: FxHashSet<&str> = graph
        .nodes()
        .iter()
        .filter(|node| node.node_type == NodeType::Module)
        .map(|node| node.id.as_str())
        .collect();

    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for edge in graph.edges().iter().filter(|e| e.kind == EdgeKind::Import) {
        if modules.contains(edge.from.as_str()) && modules.contains(edge.to.as_str()) {
            adjacency
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }
    }

    let starts = graph
        .nodes()
        .iter()
        .filter(|node| node.node_type == NodeType::Module)
        .map(|node| node.id.as_str());
    CycleWalker::new(adjacency).run(starts)
}

/// Depth-first walk that marks the stack segment closed by a back edge.
struct CycleWalker<'a> {
    adjacency: FxHashMap<&'a str, Vec<&'a str>>,
    visited: FxHashSet<&'a str>,
    on_stack: FxHashSet<&'a str>,
    path: Vec<&'a str>,
    found: CycleSet,
}

impl<'a> CycleWalker<'a> {
    fn new(adjacency: FxHashMap<&'a str, Vec<&'a str>>) -> Self {
        Self {
            adjacency,
            visited: FxHashSet::default(),
            on_stack: FxHashSet::default(),
            path: Vec::new(),
            found: CycleSet::default(),
        }
    }

    fn run(mut self, starts: impl Iterator<Item = &'a str>) -> CycleSet {
        for start in starts {
            if !self.visited.contains(start) {
                self.visit(start);
            }
        }
        self.found
    }

    fn visit(&mut self, node: &'a str) {
        if self.on_stack.contains(node) {
            self.mark_cycle(node);
            return;
        }
        if !self.visited.insert(node) {
            return;
        }

        self.on_stack.insert(node);
        self.path.push(node);

        let neighbors = self.adjacency.get(node).cloned().unwrap_or_default();
        for neighbor in neighbors {
            self.visit(neighbor);
        }

        self.path.pop();
        self.on_stack.remove(node);
    }

    /// `node` is on the current path: everything from its position to the end
    /// forms a cycle, closed by the edge from the path's tail back to `node`.
    fn mark_cycle(&mut self, node: &str) {
        let Some(start) = self.path.iter().position(|id| *id == node) else {
            return;
        };
        let cycle = &self.path[start..];

        for window in cycle.windows(2) {
            self.found.edges.insert(edge_key(window[0], window[1]));
        }
        for id in cycle {
            self.found.nodes.insert((*id).to_string());
        }
        if let Some(last) = cycle.last() {
            self.found.edges.insert(edge_key(last, node));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FilteredGraph;
    use crate::model::{GraphEdge, GraphNode, Scope};

    fn provider(name: &str) -> GraphNode {
        GraphNode::provider("M", name, Scope::Singleton)
    }

    fn injects(from: &GraphNode, to: &GraphNode) -> GraphEdge {
        GraphEdge::new(from.id.as_str(), to.id.as_str(), EdgeKind::Injects)
    }

    #[test]
    fn three_node_injection_cycle() {
        let (a, b, c) = (provider("A"), provider("B"), provider("C"));
        let graph = FilteredGraph::new(
            vec![a.clone(), b.clone(), c.clone()],
            vec![injects(&a, &b), injects(&b, &c), injects(&c, &a)],
        );

        let cycles = detect_provider_cycles(&graph);

        assert_eq!(cycles.nodes.len(), 3);
        for node in [&a, &b, &c] {
            assert!(cycles.contains_node(&node.id));
        }
        assert!(cycles.contains_edge(&a.id, &b.id));
        assert!(cycles.contains_edge(&b.id, &c.id));
        assert!(cycles.contains_edge(&c.id, &a.id));
        assert_eq!(cycles.edges.len(), 3);
    }

    #[test]
    fn self_injection_is_a_one_node_cycle() {
        let a = provider("A");
        let graph = FilteredGraph::new(vec![a.clone()], vec![injects(&a, &a)]);

        let cycles = detect_provider_cycles(&graph);

        assert_eq!(cycles.nodes.len(), 1);
        assert!(cycles.contains_node(&a.id));
        assert!(cycles.contains_edge(&a.id, &a.id));
    }

    #[test]
    fn acyclic_prefix_is_not_marked() {
        // X -> A -> B -> A: X leads into the cycle but is not on it.
        let (x, a, b) = (provider("X"), provider("A"), provider("B"));
        let graph = FilteredGraph::new(
            vec![x.clone(), a.clone(), b.clone()],
            vec![injects(&x, &a), injects(&a, &b), injects(&b, &a)],
        );

        let cycles = detect_provider_cycles(&graph);

        assert!(!cycles.contains_node(&x.id));
        assert!(!cycles.contains_edge(&x.id, &a.id));
        assert!(cycles.contains_node(&a.id));
        assert!(cycles.contains_node(&b.id));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let (a, b, c, d) = (provider("A"), provider("B"), provider("C"), provider("D"));
        let graph = FilteredGraph::new(
            vec![a.clone(), b.clone(), c.clone(), d.clone()],
            vec![
                injects(&a, &b),
                injects(&a, &c),
                injects(&b, &d),
                injects(&c, &d),
            ],
        );

        assert!(detect_provider_cycles(&graph).is_empty());
    }

    #[test]
    fn controllers_participate_in_injection_cycles() {
        let controller = GraphNode::controller("M", "C", Scope::Singleton);
        let service = provider("S");
        let graph = FilteredGraph::new(
            vec![service.clone(), controller.clone()],
            vec![injects(&controller, &service), injects(&service, &controller)],
        );

        let cycles = detect_provider_cycles(&graph);
        assert!(cycles.contains_node(&controller.id));
        assert!(cycles.contains_node(&service.id));
    }

    #[test]
    fn module_cycles_follow_imports_only() {
        let (a, b, c) = (
            GraphNode::module("A"),
            GraphNode::module("B"),
            GraphNode::module("C"),
        );
        let import = |from: &GraphNode, to: &GraphNode| {
            GraphEdge::new(from.id.as_str(), to.id.as_str(), EdgeKind::Import)
        };
        let graph = FilteredGraph::new(
            vec![a.clone(), b.clone(), c.clone()],
            vec![
                import(&a, &b),
                import(&b, &a),
                // Injection edges never form module cycles.
                GraphEdge::new(c.id.as_str(), a.id.as_str(), EdgeKind::Injects),
                GraphEdge::new(a.id.as_str(), c.id.as_str(), EdgeKind::Injects),
            ],
        );

        let cycles = detect_module_cycles(&graph);

        assert!(cycles.contains_node(&a.id));
        assert!(cycles.contains_node(&b.id));
        assert!(!cycles.contains_node(&c.id));
        assert!(cycles.contains_edge(&a.id, &b.id));
        assert!(cycles.contains_edge(&b.id, &a.id));
    }

    #[test]
    fn module_imports_of_unknown_nodes_are_ignored() {
        let a = GraphNode::module("A");
        let graph = FilteredGraph::new(
            vec![a.clone()],
            vec![
                GraphEdge::new(a.id.as_str(), "module:Ghost", EdgeKind::Import),
                GraphEdge::new("module:Ghost", a.id.as_str(), EdgeKind::Import),
            ],
        );

        assert!(detect_module_cycles(&graph).is_empty());
    }
}
