//! Declarative container manifests.
//!
//! A manifest describes a resolved container and the metadata of its classes
//! in JSON or TOML. [`ContainerManifest::build`] turns it into the
//! [`ModulesContainer`] and [`StaticMetadataReader`] pair the collector needs.
//!
//! ```json
//! {
//!   "modules": [
//!     {
//!       "name": "UsersModule",
//!       "imports": ["DatabaseModule"],
//!       "providers": ["UsersService", { "token": "CONFIG", "value": true }],
//!       "controllers": ["UsersController"]
//!     }
//!   ],
//!   "classes": {
//!     "UsersController": {
//!       "controller": true,
//!       "path": "users",
//!       "guards": ["AuthGuard"],
//!       "methods": [{ "name": "findOne", "method": "GET", "path": ":id" }],
//!       "dependencies": ["UsersService", { "token": "CONFIG" }]
//!     }
//!   }
//! }
//! ```
//!
//! Dependencies are positional. A bare string is a reflected class type,
//! `{"token": ..}` and `{"forwardRef": ..}` are explicitly declared tokens and
//! `null` is a parameter without type information.
//!
//! Every class registered under a module's `controllers` is a controller,
//! whether or not its `classes` entry sets `"controller": true`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::container::{
    ChainMetadata, ClassRef, EnhancerRef, HttpMethod, InstanceWrapper, ModuleRef,
    ModulesContainer, ProviderKey, Token,
};
use crate::model::Scope;
use crate::registry::{ClassDescriptor, MethodDescriptor, StaticMetadataReader};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported manifest extension '{0}' (expected .json or .toml)")]
    UnsupportedExtension(String),

    #[error("module '{0}' is declared more than once")]
    DuplicateModule(String),

    #[error("module '{module}' imports unknown module '{import}'")]
    UnknownImport { module: String, import: String },

    #[error("{kind} in module '{module}' needs a class or a token")]
    InvalidEntry { module: String, kind: &'static str },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerManifest {
    pub modules: Vec<ModuleEntry>,
    pub classes: IndexMap<String, ClassEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleEntry {
    pub name: String,
    /// `null` entries stand for imports whose module class is unknown.
    pub imports: Vec<Option<String>>,
    pub providers: Vec<ProviderEntry>,
    pub controllers: Vec<ProviderEntry>,
}

/// A provider or controller registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderEntry {
    /// Class registered under its own name.
    Class(String),
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scope: Option<Scope>,
        /// Value provider without a backing class.
        #[serde(default)]
        value: bool,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassEntry {
    pub controller: bool,
    pub path: Option<String>,
    #[serde(flatten)]
    pub chain: ChainEntry,
    pub methods: Vec<MethodEntry>,
    /// `None` is an untyped parameter slot.
    pub dependencies: Vec<Option<DependencyEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainEntry {
    pub guards: Vec<EnhancerEntry>,
    pub pipes: Vec<EnhancerEntry>,
    pub interceptors: Vec<EnhancerEntry>,
    pub filters: Vec<EnhancerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnhancerEntry {
    Class(String),
    Instance { instance: String },
    Literal { literal: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodEntry {
    pub name: String,
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    #[serde(flatten)]
    pub chain: ChainEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyEntry {
    Class(String),
    Token {
        token: String,
    },
    ForwardRef {
        #[serde(rename = "forwardRef")]
        forward_ref: String,
    },
}

impl ContainerManifest {
    /// Read a manifest, choosing the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if extension != "json" && extension != "toml" {
            return Err(ManifestError::UnsupportedExtension(extension));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if extension == "json" {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the container and its metadata reader.
    pub fn build(&self) -> Result<(ModulesContainer, StaticMetadataReader), ManifestError> {
        let mut declared = FxHashSet::default();
        for module in &self.modules {
            if !declared.insert(module.name.as_str()) {
                return Err(ManifestError::DuplicateModule(module.name.clone()));
            }
        }

        let mut container = ModulesContainer::new();
        for entry in &self.modules {
            container.add_module(entry.to_module(&declared)?);
        }

        let controllers: FxHashSet<&str> = container
            .modules()
            .flat_map(|module| module.controllers.values())
            .filter_map(|wrapper| wrapper.metatype.as_ref().map(ClassRef::name))
            .collect();

        let mut reader = StaticMetadataReader::new();
        for (name, class) in &self.classes {
            let mut descriptor = class.to_descriptor();
            descriptor.is_controller |= controllers.contains(name.as_str());
            reader.register(name.clone(), descriptor);
        }
        for name in controllers {
            if !self.classes.contains_key(name) {
                reader.register(
                    name,
                    ClassDescriptor {
                        is_controller: true,
                        ..ClassDescriptor::default()
                    },
                );
            }
        }

        tracing::debug!(
            modules = container.len(),
            classes = reader.len(),
            "built container from manifest"
        );

        Ok((container, reader))
    }
}

impl ModuleEntry {
    fn to_module(&self, declared: &FxHashSet<&str>) -> Result<ModuleRef, ManifestError> {
        let mut module = ModuleRef::new(self.name.as_str());

        for import in &self.imports {
            match import {
                Some(name) if !declared.contains(name.as_str()) => {
                    return Err(ManifestError::UnknownImport {
                        module: self.name.clone(),
                        import: name.clone(),
                    });
                }
                Some(name) => module.imports.push(Some(ClassRef::new(name.as_str()))),
                None => module.imports.push(None),
            }
        }

        for provider in &self.providers {
            let (key, wrapper) = provider.registration(&self.name, "provider")?;
            module.providers.insert(key, wrapper);
        }

        for controller in &self.controllers {
            let (key, wrapper) = controller.registration(&self.name, "controller")?;
            if wrapper.metatype.is_none() {
                return Err(ManifestError::InvalidEntry {
                    module: self.name.clone(),
                    kind: "controller",
                });
            }
            module.controllers.insert(key, wrapper);
        }

        Ok(module)
    }
}

impl ProviderEntry {
    fn registration(
        &self,
        module: &str,
        kind: &'static str,
    ) -> Result<(ProviderKey, InstanceWrapper), ManifestError> {
        match self {
            ProviderEntry::Class(class) => Ok((
                ProviderKey::Class(ClassRef::new(class.as_str())),
                InstanceWrapper::class(class.as_str()),
            )),
            ProviderEntry::Custom {
                token,
                class,
                scope,
                value,
            } => {
                let metatype = if *value {
                    None
                } else {
                    class.as_deref().map(ClassRef::new)
                };

                let (key, wrapper) = match (token, metatype) {
                    (Some(token), metatype) => (
                        ProviderKey::Named(token.clone()),
                        InstanceWrapper::named(token.as_str(), metatype),
                    ),
                    (None, Some(class)) => (
                        ProviderKey::Class(class.clone()),
                        InstanceWrapper::class(class),
                    ),
                    (None, None) => {
                        return Err(ManifestError::InvalidEntry {
                            module: module.to_string(),
                            kind,
                        });
                    }
                };

                Ok((
                    key,
                    InstanceWrapper {
                        scope: *scope,
                        ..wrapper
                    },
                ))
            }
        }
    }
}

impl ClassEntry {
    fn to_descriptor(&self) -> ClassDescriptor {
        let mut descriptor = ClassDescriptor {
            is_controller: self.controller,
            path: self.path.clone(),
            chain: self.chain.to_metadata(),
            methods: self
                .methods
                .iter()
                .map(|method| MethodDescriptor {
                    name: method.name.clone(),
                    path: method.path.clone(),
                    method: method.method,
                    chain: method.chain.to_metadata(),
                })
                .collect(),
            ..ClassDescriptor::default()
        };

        for (index, dependency) in self.dependencies.iter().enumerate() {
            descriptor = match dependency {
                None => descriptor.with_untyped_parameter(),
                Some(DependencyEntry::Class(class)) => {
                    descriptor.with_parameter(Token::class(class.as_str()))
                }
                Some(DependencyEntry::Token { token }) => descriptor
                    .with_untyped_parameter()
                    .with_declared(index, Token::named(token.as_str())),
                Some(DependencyEntry::ForwardRef { forward_ref }) => descriptor
                    .with_untyped_parameter()
                    .with_declared(index, Token::forward_ref(forward_ref.as_str())),
            };
        }

        descriptor
    }
}

impl ChainEntry {
    fn to_metadata(&self) -> ChainMetadata {
        fn refs(entries: &[EnhancerEntry]) -> Vec<EnhancerRef> {
            entries.iter().map(EnhancerEntry::to_ref).collect()
        }

        ChainMetadata {
            guards: refs(&self.guards),
            pipes: refs(&self.pipes),
            interceptors: refs(&self.interceptors),
            filters: refs(&self.filters),
        }
    }
}

impl EnhancerEntry {
    fn to_ref(&self) -> EnhancerRef {
        match self {
            EnhancerEntry::Class(class) => EnhancerRef::Class(ClassRef::new(class.as_str())),
            EnhancerEntry::Instance { instance } => {
                EnhancerRef::Instance(ClassRef::new(instance.as_str()))
            }
            EnhancerEntry::Literal { literal } => EnhancerRef::Literal(literal.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MetadataReader;
    use std::io::Write;

    const MANIFEST: &str = r#"{
        "modules": [
            {
                "name": "AppModule",
                "imports": ["UsersModule", null],
                "providers": [
                    "AppService",
                    { "token": "CONFIG", "value": true },
                    { "token": "CACHE", "class": "RedisCache", "scope": "TRANSIENT" },
                    { "class": "RequestContext", "scope": "REQUEST" }
                ],
                "controllers": ["AppController"]
            },
            { "name": "UsersModule", "providers": ["UsersService"] }
        ],
        "classes": {
            "AppController": {
                "controller": true,
                "path": "app",
                "guards": ["AuthGuard", { "instance": "ThrottleGuard" }],
                "methods": [
                    { "name": "index", "method": "GET", "path": "/", "pipes": [{ "literal": "custom" }] }
                ],
                "dependencies": ["AppService", { "token": "CONFIG" }, { "forwardRef": "UsersService" }]
            }
        }
    }"#;

    #[test]
    fn builds_modules_in_declaration_order() {
        let (container, _) = ContainerManifest::from_json(MANIFEST).unwrap().build().unwrap();

        let names: Vec<_> = container.modules().map(ModuleRef::name).collect();
        assert_eq!(names, ["AppModule", "UsersModule"]);

        let app = container.get("AppModule").unwrap();
        assert_eq!(app.imports.len(), 2);
        assert!(app.imports[1].is_none());
        assert_eq!(app.providers.len(), 4);
        assert_eq!(app.controllers.len(), 1);
    }

    #[test]
    fn provider_entries_map_to_wrappers() {
        let (container, _) = ContainerManifest::from_json(MANIFEST).unwrap().build().unwrap();
        let app = container.get("AppModule").unwrap();

        let config = &app.providers[&ProviderKey::Named("CONFIG".into())];
        assert!(config.metatype.is_none());

        let cache = &app.providers[&ProviderKey::Named("CACHE".into())];
        assert_eq!(cache.resolved_name(), Some("CACHE"));
        assert_eq!(cache.metatype.as_ref().map(ClassRef::name), Some("RedisCache"));
        assert_eq!(cache.effective_scope(), Scope::Transient);

        let context = &app.providers[&ProviderKey::Class("RequestContext".into())];
        assert_eq!(context.effective_scope(), Scope::Request);
    }

    #[test]
    fn class_entries_map_to_metadata() {
        let (_, reader) = ContainerManifest::from_json(MANIFEST).unwrap().build().unwrap();
        let class = ClassRef::new("AppController");

        let meta = reader.class_metadata(&class);
        assert!(meta.is_controller);
        assert_eq!(meta.chain.guards.len(), 2);
        assert_eq!(meta.chain.guards[1].display_name(), "ThrottleGuard");

        let index = reader.method_metadata(&class, "index");
        assert_eq!(index.method, Some(HttpMethod::Get));
        assert_eq!(index.chain.pipes[0].display_name(), "custom");

        assert_eq!(reader.parameter_types(&class).len(), 3);
        let declared = reader.declared_dependencies(&class);
        assert_eq!(declared.len(), 2);
        assert_eq!(declared[0].index, 1);
        assert!(matches!(declared[1].token, Token::Deferred(_)));
    }

    #[test]
    fn null_dependencies_are_untyped_slots() {
        let manifest =
            ContainerManifest::from_json(r#"{"classes":{"A":{"dependencies":[null,"B"]}}}"#)
                .unwrap();
        let (_, reader) = manifest.build().unwrap();

        let parameters = reader.parameter_types(&ClassRef::new("A"));
        assert_eq!(parameters.len(), 2);
        assert!(parameters[0].is_none());
        assert!(matches!(&parameters[1], Some(Token::Class(class)) if class.name() == "B"));
    }

    #[test]
    fn registered_controllers_are_controllers_without_the_flag() {
        let manifest = ContainerManifest::from_json(
            r#"{
                "modules": [{ "name": "M", "controllers": ["Flagless", "Undescribed"] }],
                "classes": { "Flagless": { "path": "users" } }
            }"#,
        )
        .unwrap();
        let (_, reader) = manifest.build().unwrap();

        let flagless = reader.class_metadata(&ClassRef::new("Flagless"));
        assert!(flagless.is_controller);
        assert_eq!(flagless.path.as_deref(), Some("users"));
        assert!(reader.class_metadata(&ClassRef::new("Undescribed")).is_controller);
    }

    #[test]
    fn rejects_duplicate_modules() {
        let manifest = ContainerManifest::from_json(
            r#"{ "modules": [{ "name": "A" }, { "name": "A" }] }"#,
        )
        .unwrap();

        assert!(matches!(
            manifest.build(),
            Err(ManifestError::DuplicateModule(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_unknown_imports() {
        let manifest =
            ContainerManifest::from_json(r#"{ "modules": [{ "name": "A", "imports": ["B"] }] }"#)
                .unwrap();

        let err = manifest.build().unwrap_err();
        assert!(err.to_string().contains("unknown module 'B'"));
    }

    #[test]
    fn rejects_controllers_without_class() {
        let manifest = ContainerManifest::from_json(
            r#"{ "modules": [{ "name": "A", "controllers": [{ "token": "X", "value": true }] }] }"#,
        )
        .unwrap();

        assert!(matches!(
            manifest.build(),
            Err(ManifestError::InvalidEntry { kind: "controller", .. })
        ));
    }

    #[test]
    fn reads_toml_files() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[modules]]
name = "CatsModule"
providers = ["CatsService"]
controllers = ["CatsController"]

[classes.CatsController]
controller = true
path = "cats"
dependencies = ["CatsService"]

[[classes.CatsController.methods]]
name = "findAll"
method = "GET"
path = ""
"#
        )
        .unwrap();

        let manifest = ContainerManifest::from_path(file.path()).unwrap();
        let (container, reader) = manifest.build().unwrap();

        assert_eq!(container.len(), 1);
        let meta = reader.class_metadata(&ClassRef::new("CatsController"));
        assert_eq!(meta.methods, ["findAll"]);
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = ContainerManifest::from_path("container.yaml").unwrap_err();
        assert!(matches!(err, ManifestError::UnsupportedExtension(ext) if ext == "yaml"));
    }

    #[test]
    fn reports_missing_files() {
        let err = ContainerManifest::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }
}
