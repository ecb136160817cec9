//! Read-only model of a resolved DI container and the metadata seam.
//!
//! The collector never talks to a framework directly. A host describes its
//! resolved module registry with [`ModulesContainer`] and answers reflective
//! questions through a [`MetadataReader`] implementation. Hosts without
//! runtime reflection can use [`crate::registry::StaticMetadataReader`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::Scope;

/// Name used for a module whose class cannot be resolved.
pub const UNKNOWN_MODULE: &str = "UnknownModule";

/// Handle to a class, identified by its name.
///
/// The name may be empty for anonymous classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRef(String);

impl ClassRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP method attached to a route handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    All,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::All => "ALL",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            "ALL" => Ok(HttpMethod::All),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

/// Lazily resolved token, used to break reference cycles at declaration time.
#[derive(Clone)]
pub struct DeferredToken(Arc<dyn Fn() -> Option<Token> + Send + Sync>);

impl DeferredToken {
    pub fn new(resolve: impl Fn() -> Option<Token> + Send + Sync + 'static) -> Self {
        Self(Arc::new(resolve))
    }

    /// Invoke the resolver. `None` means the reference produced nothing.
    pub fn resolve(&self) -> Option<Token> {
        (self.0)()
    }
}

impl fmt::Debug for DeferredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredToken(..)")
    }
}

/// Key used to look up a dependency.
#[derive(Debug, Clone)]
pub enum Token {
    /// A class reference.
    Class(ClassRef),
    /// An explicit string identifier.
    Named(String),
    /// A forward reference that must be resolved before use.
    Deferred(DeferredToken),
}

impl Token {
    pub fn class(name: impl Into<String>) -> Self {
        Token::Class(ClassRef::new(name))
    }

    pub fn named(token: impl Into<String>) -> Self {
        Token::Named(token.into())
    }

    /// Forward reference to a class, resolved when the collector asks for it.
    pub fn forward_ref(name: impl Into<String>) -> Self {
        let class = ClassRef::new(name);
        Token::Deferred(DeferredToken::new(move || Some(Token::Class(class.clone()))))
    }
}

/// Key of an entry in a module's provider or controller map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKey {
    Class(ClassRef),
    Named(String),
}

/// Container-side view of one provider or controller registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceWrapper {
    /// Registration name; for custom providers this is the token.
    pub name: Option<String>,
    /// Backing class. Value and alias providers have none.
    pub metatype: Option<ClassRef>,
    /// Declared scope; absent means singleton.
    pub scope: Option<Scope>,
}

impl InstanceWrapper {
    /// Registration backed by a class and named after it.
    pub fn class(class: impl Into<ClassRef>) -> Self {
        let class = class.into();
        Self {
            name: Some(class.name().to_string()),
            metatype: Some(class),
            scope: None,
        }
    }

    /// Registration under a string token, optionally backed by a class.
    pub fn named(token: impl Into<String>, metatype: Option<ClassRef>) -> Self {
        Self {
            name: Some(token.into()),
            metatype,
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Registration name, falling back to the class name.
    pub fn resolved_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.metatype.as_ref().map(ClassRef::name))
            .filter(|name| !name.is_empty())
    }

    pub fn effective_scope(&self) -> Scope {
        self.scope.unwrap_or_default()
    }
}

/// One module of the resolved container.
#[derive(Debug, Clone, Default)]
pub struct ModuleRef {
    pub metatype: Option<ClassRef>,
    /// Imported modules, by class. `None` for an import whose class is unknown.
    pub imports: Vec<Option<ClassRef>>,
    pub providers: IndexMap<ProviderKey, InstanceWrapper>,
    pub controllers: IndexMap<ProviderKey, InstanceWrapper>,
}

impl ModuleRef {
    pub fn new(metatype: impl Into<ClassRef>) -> Self {
        Self {
            metatype: Some(metatype.into()),
            ..Self::default()
        }
    }

    /// Module name, or [`UNKNOWN_MODULE`] when the class is missing or anonymous.
    pub fn name(&self) -> &str {
        module_name(self.metatype.as_ref())
    }

    pub fn with_import(mut self, module: impl Into<ClassRef>) -> Self {
        self.imports.push(Some(module.into()));
        self
    }

    pub fn with_provider(mut self, key: ProviderKey, wrapper: InstanceWrapper) -> Self {
        self.providers.insert(key, wrapper);
        self
    }

    /// Register a class provider keyed by its class.
    pub fn with_class_provider(self, class: impl Into<ClassRef>, scope: Option<Scope>) -> Self {
        let class = class.into();
        let wrapper = InstanceWrapper {
            scope,
            ..InstanceWrapper::class(class.clone())
        };
        self.with_provider(ProviderKey::Class(class), wrapper)
    }

    /// Register a provider under a string token.
    pub fn with_named_provider(self, token: impl Into<String>, metatype: Option<ClassRef>) -> Self {
        let token = token.into();
        let wrapper = InstanceWrapper::named(token.clone(), metatype);
        self.with_provider(ProviderKey::Named(token), wrapper)
    }

    pub fn with_controller(mut self, class: impl Into<ClassRef>) -> Self {
        let class = class.into();
        self.controllers
            .insert(ProviderKey::Class(class.clone()), InstanceWrapper::class(class));
        self
    }
}

pub(crate) fn module_name(metatype: Option<&ClassRef>) -> &str {
    metatype
        .map(ClassRef::name)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_MODULE)
}

/// Registry of resolved modules, iterated in registration order.
#[derive(Debug, Clone, Default)]
pub struct ModulesContainer {
    modules: IndexMap<String, ModuleRef>,
}

impl ModulesContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under an explicit key. Re-registering a key
    /// replaces the module but keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, module: ModuleRef) {
        self.modules.insert(key.into(), module);
    }

    /// Register a module keyed by its name.
    pub fn add_module(&mut self, module: ModuleRef) {
        let key = module.name().to_string();
        self.insert(key, module);
    }

    pub fn with_module(mut self, module: ModuleRef) -> Self {
        self.add_module(module);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ModuleRef> {
        self.modules.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleRef)> {
        self.modules.iter().map(|(key, module)| (key.as_str(), module))
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleRef> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// A guard, pipe, interceptor or filter attached to a class or handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancerRef {
    /// Referenced by class.
    Class(ClassRef),
    /// Referenced by an instance of a class.
    Instance(ClassRef),
    /// Anything else, displayed verbatim.
    Literal(String),
}

impl EnhancerRef {
    pub fn display_name(&self) -> String {
        match self {
            EnhancerRef::Class(class) | EnhancerRef::Instance(class) => {
                if class.name().is_empty() {
                    "Anonymous".to_string()
                } else {
                    class.name().to_string()
                }
            }
            EnhancerRef::Literal(value) => value.clone(),
        }
    }
}

/// Enhancers declared at one level (class or method).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainMetadata {
    pub guards: Vec<EnhancerRef>,
    pub pipes: Vec<EnhancerRef>,
    pub interceptors: Vec<EnhancerRef>,
    pub filters: Vec<EnhancerRef>,
}

/// Class-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMetadata {
    pub is_controller: bool,
    /// Controller path prefix.
    pub path: Option<String>,
    /// Method names declared on the class, in declaration order.
    pub methods: Vec<String>,
    pub chain: ChainMetadata,
}

/// Method-level metadata. A method is a route handler only when both
/// `path` and `method` are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodMetadata {
    pub path: Option<String>,
    pub method: Option<HttpMethod>,
    pub chain: ChainMetadata,
}

/// Injection token declared explicitly for one constructor parameter.
#[derive(Debug, Clone)]
pub struct DeclaredDependency {
    pub index: usize,
    pub token: Token,
}

/// Reflective capability supplied by the host framework.
///
/// Unknown classes or methods answer with empty metadata rather than an error.
pub trait MetadataReader {
    fn class_metadata(&self, class: &ClassRef) -> ClassMetadata;

    fn method_metadata(&self, class: &ClassRef, method: &str) -> MethodMetadata;

    /// Explicitly declared injection tokens, with parameter indices.
    fn declared_dependencies(&self, class: &ClassRef) -> Vec<DeclaredDependency>;

    /// Constructor parameter types; `None` marks a position with no type.
    fn parameter_types(&self, class: &ClassRef) -> Vec<Option<Token>>;
}

impl<T: MetadataReader + ?Sized> MetadataReader for Arc<T> {
    fn class_metadata(&self, class: &ClassRef) -> ClassMetadata {
        (**self).class_metadata(class)
    }

    fn method_metadata(&self, class: &ClassRef, method: &str) -> MethodMetadata {
        (**self).method_metadata(class, method)
    }

    fn declared_dependencies(&self, class: &ClassRef) -> Vec<DeclaredDependency> {
        (**self).declared_dependencies(class)
    }

    fn parameter_types(&self, class: &ClassRef) -> Vec<Option<Token>> {
        (**self).parameter_types(class)
    }
}
