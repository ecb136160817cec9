//! Smoke tests for snapshot invariants.
//!
//! Fast, deterministic checks that every snapshot must satisfy regardless of
//! the container it came from.

use std::collections::HashSet;
use std::sync::Arc;

use super::fixtures::{collector, shop_container, shop_reader, shop_snapshot};
use crate::container::ModulesContainer;
use crate::model::{EdgeKind, GraphSnapshot, GraphStats, NodeType};
use crate::registry::StaticMetadataReader;
use crate::SnapshotCollector;

fn assert_invariants(snapshot: &GraphSnapshot) {
    // Node uniqueness
    let ids: HashSet<_> = snapshot.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids.len(), snapshot.nodes.len(), "duplicate node ids");

    // Stats consistency
    assert_eq!(snapshot.stats, GraphStats::from_nodes(&snapshot.nodes));

    // Missing-dependency closure
    for node in snapshot.nodes_of(NodeType::Missing) {
        let required_by = &node.missing.as_ref().expect("missing payload").required_by;
        let incoming: Vec<_> = snapshot
            .edges_of(EdgeKind::Missing)
            .filter(|edge| edge.to == node.id)
            .collect();

        assert_eq!(incoming.len(), required_by.len());
        for consumer in required_by {
            assert_eq!(
                incoming.iter().filter(|edge| &edge.from == consumer).count(),
                1,
                "{} should have exactly one missing edge to {}",
                consumer,
                node.id
            );
        }
    }
}

#[test]
fn test_shop_snapshot_invariants() {
    assert_invariants(&shop_snapshot());
}

#[test]
fn test_empty_container() {
    let snapshot = collector(ModulesContainer::new(), StaticMetadataReader::new()).collect();

    assert!(snapshot.nodes.is_empty());
    assert!(snapshot.edges.is_empty());
    assert!(snapshot.routes.is_empty());
    assert_eq!(snapshot.stats, GraphStats::default());
    assert_invariants(&snapshot);
}

#[test]
fn test_collect_is_deterministic() {
    let collector = collector(shop_container(), shop_reader());

    let first = collector.collect();
    let second = collector.collect();

    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.routes, second.routes);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_concurrent_collection() {
    let collector = Arc::new(SnapshotCollector::new(
        Arc::new(shop_container()),
        Arc::new(shop_reader()),
    ));
    let expected = collector.collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let collector = Arc::clone(&collector);
            std::thread::spawn(move || collector.collect())
        })
        .collect();

    for handle in handles {
        let snapshot = handle.join().expect("collector thread panicked");
        assert_eq!(snapshot.nodes, expected.nodes);
        assert_eq!(snapshot.edges, expected.edges);
    }
}

#[test]
fn test_snapshot_json_shape() {
    let snapshot = shop_snapshot();
    let json = serde_json::to_value(&snapshot).expect("snapshot serializes");

    assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(json["stats"]["routes"], 4);

    let route = json["routes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|route| route["handler"] == "findOne")
        .unwrap();
    assert_eq!(route["method"], "GET");
    assert_eq!(route["path"], "/users/:id");
    assert_eq!(route["chain"]["guards"][0], "AuthGuard");

    let kinds: HashSet<_> = json["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|edge| edge["kind"].as_str().unwrap().to_string())
        .collect();
    for kind in ["import", "export", "injects", "handles", "missing"] {
        assert!(kinds.contains(kind), "missing edge kind {}", kind);
    }

    let back: GraphSnapshot = serde_json::from_value(json).expect("snapshot deserializes");
    assert_eq!(back, snapshot);
}

#[test]
fn test_routes_view() {
    let snapshot = shop_snapshot();
    let view = snapshot.routes_view();

    assert_eq!(view.routes, snapshot.routes);
    assert_eq!(view.stats, snapshot.stats);

    let json = serde_json::to_value(&view).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["routes", "stats"]);
}
