//! Request-scope propagation.
//!
//! A singleton that injects a request-scoped dependency is effectively
//! request-scoped too. These helpers surface such nodes.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use super::GraphData;
use crate::model::{EdgeKind, Scope};

/// Ids of nodes declared with `REQUEST` scope, in node order.
pub fn request_scoped(graph: &impl GraphData) -> IndexSet<String> {
    graph
        .nodes()
        .iter()
        .filter(|node| node.scope == Some(Scope::Request))
        .map(|node| node.id.clone())
        .collect()
}

/// Ids of nodes that reach an explicitly request-scoped node through
/// outgoing `injects` edges, excluding the explicit ones themselves.
pub fn implicit_request_scoped(graph: &impl GraphData) -> IndexSet<String> {
    let explicit = request_scoped(graph);
    if explicit.is_empty() {
        return IndexSet::new();
    }

    let mut dependencies: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for edge in graph.edges().iter().filter(|e| e.kind == EdgeKind::Injects) {
        dependencies
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
    }

    graph
        .nodes()
        .iter()
        .filter(|node| !explicit.contains(&node.id))
        .filter(|node| reaches_any(&node.id, &dependencies, &explicit))
        .map(|node| node.id.clone())
        .collect()
}

fn reaches_any(
    start: &str,
    dependencies: &FxHashMap<&str, Vec<&str>>,
    targets: &IndexSet<String>,
) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if targets.contains(id) {
            return true;
        }
        if let Some(next) = dependencies.get(id) {
            stack.extend(next.iter().copied());
        }
    }

    false
}
