//! Graph snapshot data model.
//!
//! These types are the JSON contract between the collector and every consumer
//! of a snapshot (HTTP shell, analysis layer, visualisation front end). Field
//! names serialize in camelCase and enum values use the literal strings the
//! front end expects.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::container::HttpMethod;

/// Lifetime policy of a provider or controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    #[default]
    Singleton,
    Request,
    Transient,
}

/// Kind of a graph node. A node never changes kind after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Module,
    Provider,
    Controller,
    Route,
    Missing,
}

impl NodeType {
    /// Id namespace used for nodes of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeType::Module => "module",
            NodeType::Provider => "provider",
            NodeType::Controller => "controller",
            NodeType::Route => "route",
            NodeType::Missing => "missing",
        }
    }
}

/// Relationship carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Module imports module.
    Import,
    /// Module owns a provider or controller.
    Export,
    /// Consumer depends on a dependency.
    Injects,
    /// Controller owns a route.
    Handles,
    /// Node depends on a token that resolves nowhere.
    Missing,
}

/// Method and full path of a ROUTE node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub method: HttpMethod,
    pub path: String,
}

/// Payload of a MISSING node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingInfo {
    /// Ids of every node that declared the unresolved dependency.
    pub required_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

/// A unit in the DI/routing graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingInfo>,
}

impl GraphNode {
    pub fn module(name: &str) -> Self {
        Self {
            id: module_node_id(name),
            name: name.to_string(),
            node_type: NodeType::Module,
            scope: None,
            module: None,
            route: None,
            missing: None,
        }
    }

    pub fn provider(module: &str, name: &str, scope: Scope) -> Self {
        Self {
            id: provider_node_id(module, name),
            name: name.to_string(),
            node_type: NodeType::Provider,
            scope: Some(scope),
            module: Some(module.to_string()),
            route: None,
            missing: None,
        }
    }

    pub fn controller(module: &str, name: &str, scope: Scope) -> Self {
        Self {
            id: controller_node_id(module, name),
            name: name.to_string(),
            node_type: NodeType::Controller,
            scope: Some(scope),
            module: Some(module.to_string()),
            route: None,
            missing: None,
        }
    }

    pub fn route(module: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            id: route_node_id(method, path),
            name: format!("{} {}", method, path),
            node_type: NodeType::Route,
            scope: None,
            module: Some(module.to_string()),
            route: Some(RouteInfo {
                method,
                path: path.to_string(),
            }),
            missing: None,
        }
    }

    /// Placeholder for a dependency token that no module provides.
    pub fn missing(token: &str, required_by: Vec<String>) -> Self {
        Self {
            id: missing_node_id(token),
            name: token.to_string(),
            node_type: NodeType::Missing,
            scope: None,
            module: None,
            route: None,
            missing: Some(MissingInfo {
                required_by,
                suggested_fix: Some(format!(
                    "Add {} to the module's providers or import the module that exports it",
                    token
                )),
            }),
        }
    }

    /// Effective scope, treating an absent scope as singleton.
    pub fn effective_scope(&self) -> Option<Scope> {
        match self.node_type {
            NodeType::Provider | NodeType::Controller => Some(self.scope.unwrap_or_default()),
            _ => None,
        }
    }
}

pub fn module_node_id(module: &str) -> String {
    format!("module:{}", module)
}

pub fn provider_node_id(module: &str, name: &str) -> String {
    format!("provider:{}:{}", module, name)
}

pub fn controller_node_id(module: &str, name: &str) -> String {
    format!("controller:{}:{}", module, name)
}

pub fn route_node_id(method: HttpMethod, path: &str) -> String {
    format!("route:{}:{}", method, path)
}

pub fn missing_node_id(token: &str) -> String {
    format!("missing:{}", token)
}

/// Directed relationship between two node ids.
///
/// Edges are resolved by id, so `to` may name a node appended later in the
/// snapshot (or one that a consumer filtered away).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// Composite `{from}-{to}` key used by the analysis overlays.
    pub fn key(&self) -> String {
        edge_key(&self.from, &self.to)
    }
}

pub fn edge_key(from: &str, to: &str) -> String {
    format!("{}-{}", from, to)
}

/// Guards, pipes, interceptors and filters wrapping a route handler.
///
/// Each list holds class-level entries followed by method-level entries in
/// encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChain {
    pub guards: Vec<String>,
    pub pipes: Vec<String>,
    pub interceptors: Vec<String>,
    pub filters: Vec<String>,
}

impl RouteChain {
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
            && self.pipes.is_empty()
            && self.interceptors.is_empty()
            && self.filters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub method: HttpMethod,
    pub path: String,
    pub controller: String,
    pub handler: String,
    pub chain: RouteChain,
}

/// Node counts, incremented once per node creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub modules: usize,
    pub providers: usize,
    pub controllers: usize,
    pub routes: usize,
}

impl GraphStats {
    /// Recount stats from a node list.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a GraphNode>) -> Self {
        let mut stats = Self::default();
        for node in nodes {
            stats.record(node.node_type);
        }
        stats
    }

    pub(crate) fn record(&mut self, node_type: NodeType) {
        match node_type {
            NodeType::Module => self.modules += 1,
            NodeType::Provider => self.providers += 1,
            NodeType::Controller => self.controllers += 1,
            NodeType::Route => self.routes += 1,
            NodeType::Missing => {}
        }
    }
}

/// Root aggregate returned by one collection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub created_at: String,
    pub stats: GraphStats,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub routes: Vec<RouteMeta>,
}

impl GraphSnapshot {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |node| node.node_type == node_type)
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    /// `{routes, stats}` subset served by the routes endpoint.
    pub fn routes_view(&self) -> RoutesView {
        RoutesView {
            routes: self.routes.clone(),
            stats: self.stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesView {
    pub routes: Vec<RouteMeta>,
    pub stats: GraphStats,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: iso_timestamp(),
        }
    }
}

/// Current instant as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
