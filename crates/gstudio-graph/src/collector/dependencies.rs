//! Dependency pass: injection edges and missing-dependency placeholders.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use super::{PartialGraph, SnapshotCollector, display_name};
use crate::container::{ClassRef, InstanceWrapper, MetadataReader, ProviderKey, Token};
use crate::model::{
    EdgeKind, GraphEdge, GraphNode, GraphSnapshot, controller_node_id, iso_timestamp,
    provider_node_id,
};

/// Dependency token after forward-reference resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Dependency {
    Class(String),
    Named(String),
}

impl Dependency {
    /// Resolve a deferred token once. Tokens that resolve to nothing usable
    /// yield `None` and are skipped.
    fn from_token(token: Token) -> Option<Self> {
        let token = match token {
            Token::Deferred(deferred) => deferred.resolve()?,
            other => other,
        };

        match token {
            Token::Class(class) if !class.name().is_empty() => {
                Some(Dependency::Class(class.name().to_string()))
            }
            Token::Named(name) if !name.is_empty() => Some(Dependency::Named(name)),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        match self {
            Dependency::Class(name) | Dependency::Named(name) => name,
        }
    }
}

/// Unresolved tokens mapped to the ids of their consumers, in encounter order.
type MissingDependencies = IndexMap<String, IndexSet<String>>;

impl<R: MetadataReader> SnapshotCollector<R> {
    /// Add `injects` edges between every consumer and its resolved
    /// dependencies, then one MISSING node per unresolved token.
    pub fn collect_edges(&self, structure: PartialGraph) -> GraphSnapshot {
        let mut graph = structure;
        let mut missing = MissingDependencies::default();

        for module in self.container.modules() {
            let module_name = module.name();
            let wrappers = module.providers.values().chain(module.controllers.values());
            for wrapper in wrappers {
                self.collect_dependencies(wrapper, module_name, &mut graph, &mut missing);
            }
        }

        for (token, consumers) in missing {
            let node = GraphNode::missing(&token, consumers.iter().cloned().collect());
            let missing_id = node.id.clone();

            if !graph.insert_node(node) {
                tracing::warn!(token = %token, "missing dependency node already present");
            }
            for consumer in consumers {
                graph.push_edge(GraphEdge::new(consumer, missing_id.as_str(), EdgeKind::Missing));
            }
        }

        GraphSnapshot {
            created_at: iso_timestamp(),
            stats: graph.stats,
            nodes: graph.nodes,
            edges: graph.edges,
            routes: graph.routes,
        }
    }

    fn collect_dependencies(
        &self,
        wrapper: &InstanceWrapper,
        module_name: &str,
        graph: &mut PartialGraph,
        missing: &mut MissingDependencies,
    ) {
        let Some(class) = wrapper.metatype.as_ref() else {
            return;
        };

        let name = display_name(wrapper);
        let consumer_id = if self.reader.class_metadata(class).is_controller {
            controller_node_id(module_name, name)
        } else {
            provider_node_id(module_name, name)
        };

        for token in self.constructor_dependencies(class) {
            let Some(dependency) = Dependency::from_token(token) else {
                continue;
            };

            match self.resolve_dependency(&dependency) {
                Some(target_id) => {
                    graph.push_edge(GraphEdge::new(
                        consumer_id.as_str(),
                        target_id,
                        EdgeKind::Injects,
                    ));
                }
                None => {
                    tracing::trace!(
                        consumer = %consumer_id,
                        dependency = dependency.name(),
                        "unresolved dependency"
                    );
                    missing
                        .entry(dependency.name().to_string())
                        .or_default()
                        .insert(consumer_id.clone());
                }
            }
        }
    }

    /// Constructor dependencies in parameter order.
    ///
    /// An explicitly declared token wins over the reflected parameter type at
    /// the same position.
    fn constructor_dependencies(&self, class: &ClassRef) -> Vec<Token> {
        let mut declared: FxHashMap<usize, Token> = FxHashMap::default();
        for dependency in self.reader.declared_dependencies(class) {
            declared.insert(dependency.index, dependency.token);
        }
        let mut parameter_types = self.reader.parameter_types(class);

        let declared_width = declared.keys().max().map_or(0, |index| index + 1);
        let width = declared_width.max(parameter_types.len());

        (0..width)
            .filter_map(|index| {
                declared.remove(&index).or_else(|| {
                    parameter_types
                        .get_mut(index)
                        .and_then(Option::take)
                })
            })
            .collect()
    }

    /// Id of the node that satisfies `dependency`, searching modules in
    /// registration order. The first match wins.
    fn resolve_dependency(&self, dependency: &Dependency) -> Option<String> {
        match dependency {
            Dependency::Named(token) => self.container.modules().find_map(|module| {
                let key = ProviderKey::Named(token.clone());
                module
                    .providers
                    .contains_key(&key)
                    .then(|| provider_node_id(module.name(), token))
            }),
            Dependency::Class(class_name) => self.container.modules().find_map(|module| {
                let matches = |wrapper: &&InstanceWrapper| {
                    wrapper.resolved_name() == Some(class_name.as_str())
                };

                if let Some(provider) = module.providers.values().find(matches) {
                    return Some(provider_node_id(module.name(), display_name(provider)));
                }
                module
                    .controllers
                    .values()
                    .find(matches)
                    .map(|controller| controller_node_id(module.name(), display_name(controller)))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::DeferredToken;

    #[test]
    fn deferred_tokens_resolve_once() {
        let token = Token::forward_ref("UsersService");
        assert_eq!(
            Dependency::from_token(token),
            Some(Dependency::Class("UsersService".into()))
        );
    }

    #[test]
    fn unusable_tokens_are_skipped() {
        assert_eq!(Dependency::from_token(Token::named("")), None);
        assert_eq!(Dependency::from_token(Token::class("")), None);
        assert_eq!(
            Dependency::from_token(Token::Deferred(DeferredToken::new(|| None))),
            None
        );
        // A forward reference to another forward reference is not chased.
        let nested = Token::Deferred(DeferredToken::new(|| Some(Token::forward_ref("A"))));
        assert_eq!(Dependency::from_token(nested), None);
    }

    #[test]
    fn named_tokens_keep_their_string() {
        assert_eq!(
            Dependency::from_token(Token::named("CONFIG")),
            Some(Dependency::Named("CONFIG".into()))
        );
    }
}
