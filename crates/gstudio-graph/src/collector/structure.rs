//! Structural pass: module, provider, controller and route nodes.

use super::{PartialGraph, SnapshotCollector, display_name};
use crate::container::{
    ChainMetadata, ClassMetadata, ClassRef, EnhancerRef, InstanceWrapper, MetadataReader,
    ModuleRef, module_name,
};
use crate::model::{EdgeKind, GraphEdge, GraphNode, RouteChain, RouteMeta, module_node_id};

impl<R: MetadataReader> SnapshotCollector<R> {
    /// Emit every structural node and edge, plus the route table.
    pub fn collect_structure(&self) -> PartialGraph {
        let mut graph = PartialGraph::default();
        for module in self.container.modules() {
            self.collect_module(module, &mut graph);
        }
        graph
    }

    fn collect_module(&self, module: &ModuleRef, graph: &mut PartialGraph) {
        let name = module.name();
        let module_id = module_node_id(name);

        graph.insert_node(GraphNode::module(name));

        // Import targets may not have a node yet; edges resolve by id.
        for import in &module.imports {
            let imported = module_name(import.as_ref());
            graph.push_edge(GraphEdge::new(
                module_id.as_str(),
                module_node_id(imported),
                EdgeKind::Import,
            ));
        }

        for wrapper in module.providers.values() {
            self.collect_provider(wrapper, name, &module_id, graph);
        }

        for wrapper in module.controllers.values() {
            self.collect_controller(wrapper, name, &module_id, graph);
        }
    }

    fn collect_provider(
        &self,
        wrapper: &InstanceWrapper,
        module_name: &str,
        module_id: &str,
        graph: &mut PartialGraph,
    ) {
        // Value and alias providers have no backing class.
        if wrapper.metatype.is_none() {
            return;
        }

        let node = GraphNode::provider(
            module_name,
            display_name(wrapper),
            wrapper.effective_scope(),
        );
        let provider_id = node.id.clone();

        if graph.insert_node(node) {
            graph.push_edge(GraphEdge::new(module_id, provider_id, EdgeKind::Export));
        }
    }

    fn collect_controller(
        &self,
        wrapper: &InstanceWrapper,
        module_name: &str,
        module_id: &str,
        graph: &mut PartialGraph,
    ) {
        let Some(class) = wrapper.metatype.as_ref() else {
            return;
        };

        let controller_name = display_name(wrapper);
        let node = GraphNode::controller(module_name, controller_name, wrapper.effective_scope());
        let controller_id = node.id.clone();

        if !graph.insert_node(node) {
            return;
        }
        graph.push_edge(GraphEdge::new(
            module_id,
            controller_id.as_str(),
            EdgeKind::Export,
        ));

        if controller_name == self.options.diagnostics_controller {
            return;
        }

        let class_meta = self.reader.class_metadata(class);
        self.collect_routes(
            class,
            &class_meta,
            controller_name,
            &controller_id,
            module_name,
            graph,
        );
    }

    /// Walk the handler methods of a newly created controller node.
    fn collect_routes(
        &self,
        class: &ClassRef,
        class_meta: &ClassMetadata,
        controller_name: &str,
        controller_id: &str,
        module_name: &str,
        graph: &mut PartialGraph,
    ) {
        let prefix = class_meta.path.as_deref().unwrap_or("");

        for handler in &class_meta.methods {
            let method_meta = self.reader.method_metadata(class, handler);
            let (Some(path), Some(method)) = (method_meta.path.as_deref(), method_meta.method)
            else {
                continue;
            };

            let full_path = normalize_path(prefix, path);
            let node = GraphNode::route(module_name, method, &full_path);
            let route_id = node.id.clone();

            if !graph.insert_node(node) {
                tracing::debug!(
                    route = %route_id,
                    controller = controller_name,
                    "route already registered by another controller"
                );
            }
            graph.push_edge(GraphEdge::new(controller_id, route_id, EdgeKind::Handles));

            graph.routes.push(RouteMeta {
                method,
                path: full_path,
                controller: controller_name.to_string(),
                handler: handler.clone(),
                chain: build_chain(&class_meta.chain, &method_meta.chain),
            });
        }
    }
}

/// Class-level entries run before method-level ones.
fn build_chain(class_level: &ChainMetadata, method_level: &ChainMetadata) -> RouteChain {
    fn names(class_level: &[EnhancerRef], method_level: &[EnhancerRef]) -> Vec<String> {
        class_level
            .iter()
            .chain(method_level)
            .map(EnhancerRef::display_name)
            .collect()
    }

    RouteChain {
        guards: names(&class_level.guards, &method_level.guards),
        pipes: names(&class_level.pipes, &method_level.pipes),
        interceptors: names(&class_level.interceptors, &method_level.interceptors),
        filters: names(&class_level.filters, &method_level.filters),
    }
}

/// Join a controller prefix and a handler path.
///
/// Duplicate slashes collapse, a trailing slash is dropped and an empty
/// result becomes `/`.
pub(crate) fn normalize_path(prefix: &str, path: &str) -> String {
    let joined = format!("/{}/{}", prefix, path);
    let mut normalized = String::with_capacity(joined.len());

    for ch in joined.chars() {
        if ch == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(ch);
    }

    if normalized.ends_with('/') {
        normalized.pop();
    }

    if normalized.is_empty() {
        "/".to_string()
    } else {
        normalized
    }
}
