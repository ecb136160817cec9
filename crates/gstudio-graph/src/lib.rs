//! # gstudio-graph
//!
//! Dependency-injection graph snapshots for Graph Studio.
//!
//! The crate reads a resolved DI container (modules, providers, controllers
//! and their route handlers) and produces a serializable [`GraphSnapshot`]
//! that a visualiser can render. It also ships the analyses a viewer runs over
//! a snapshot and the redaction helpers used before request payloads leave
//! the process.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │  ModulesContainer    │      │  MetadataReader      │
//! │  (modules, wrappers) │      │  (routes, injection) │
//! └──────────┬───────────┘      └──────────┬───────────┘
//!            │                             │
//!            └──────────────┬──────────────┘
//!                           ▼
//!               ┌──────────────────────┐
//!               │  SnapshotCollector   │
//!               │  structure ─▶ edges  │
//!               └──────────┬───────────┘
//!                          ▼
//!               ┌──────────────────────┐
//!               │    GraphSnapshot     │
//!               └──────────┬───────────┘
//!                          │
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!    ┌───────────┐   ┌───────────┐   ┌───────────┐
//!    │  filter   │   │  cycles   │   │  request  │
//!    │ internals │   │           │   │   scope   │
//!    └───────────┘   └───────────┘   └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gstudio_graph::{
//!     ClassDescriptor, ModuleRef, ModulesContainer, SnapshotCollector, StaticMetadataReader,
//!     Token,
//! };
//!
//! let container = ModulesContainer::new().with_module(
//!     ModuleRef::new("UsersModule")
//!         .with_class_provider("UsersService", None)
//!         .with_class_provider("UsersRepository", None),
//! );
//! let reader = StaticMetadataReader::new().with_class(
//!     "UsersService",
//!     ClassDescriptor::provider().with_parameter(Token::class("UsersRepository")),
//! );
//!
//! let snapshot = SnapshotCollector::new(Arc::new(container), reader).collect();
//! assert_eq!(snapshot.stats.providers, 2);
//! assert_eq!(snapshot.edges.len(), 3);
//! ```
//!
//! ## Thread Safety
//!
//! Collection only reads the container. A [`SnapshotCollector`] can be shared
//! across request handlers and every `collect` call builds its own working
//! state. Analysis and redaction are plain functions over owned or borrowed
//! values.

pub mod analysis;
pub mod collector;
pub mod container;
pub mod manifest;
pub mod model;
pub mod redact;
pub mod registry;
pub mod trace;

pub use analysis::{
    CircularDependencies, CycleSet, FilteredGraph, GraphAnnotations, GraphData,
    GraphDisplaySettings, SettingsStore, annotate, filter_internal_modules,
};
pub use collector::{CollectorOptions, PartialGraph, SnapshotCollector};
pub use container::{
    ClassRef, DeferredToken, HttpMethod, InstanceWrapper, MetadataReader, ModuleRef,
    ModulesContainer, ProviderKey, Token,
};
pub use manifest::{ContainerManifest, ManifestError};
pub use model::{
    EdgeKind, GraphEdge, GraphNode, GraphSnapshot, GraphStats, HealthStatus, NodeType, RouteMeta,
    RoutesView, Scope,
};
pub use redact::{RedactionOptions, RedactionPattern, redact_payload, sample_payload};
pub use registry::{ClassDescriptor, MethodDescriptor, StaticMetadataReader};
pub use trace::{SerializedError, Stage, TraceEvent};

#[cfg(test)]
mod tests;
