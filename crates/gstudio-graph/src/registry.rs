//! Explicitly populated class metadata.
//!
//! [`StaticMetadataReader`] answers [`MetadataReader`] queries from a table of
//! [`ClassDescriptor`]s registered up front, for hosts that cannot reflect
//! over their classes at runtime.

use rustc_hash::FxHashMap;

use crate::container::{
    ChainMetadata, ClassMetadata, ClassRef, DeclaredDependency, EnhancerRef, HttpMethod,
    MetadataReader, MethodMetadata, Token,
};

/// One method of a registered class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub path: Option<String>,
    pub method: Option<HttpMethod>,
    pub chain: ChainMetadata,
}

impl MethodDescriptor {
    /// Route handler bound to `method` and `path`.
    pub fn handler(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            method: Some(method),
            chain: ChainMetadata::default(),
        }
    }

    /// Method without routing metadata.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_chain(mut self, chain: ChainMetadata) -> Self {
        self.chain = chain;
        self
    }
}

/// Everything the collector may ask about one class.
#[derive(Debug, Clone, Default)]
pub struct ClassDescriptor {
    pub is_controller: bool,
    /// Controller path prefix.
    pub path: Option<String>,
    pub chain: ChainMetadata,
    pub methods: Vec<MethodDescriptor>,
    pub declared: Vec<DeclaredDependency>,
    pub parameter_types: Vec<Option<Token>>,
}

impl ClassDescriptor {
    pub fn provider() -> Self {
        Self::default()
    }

    pub fn controller(path: impl Into<String>) -> Self {
        Self {
            is_controller: true,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Append a constructor parameter whose type is `token`.
    pub fn with_parameter(mut self, token: Token) -> Self {
        self.parameter_types.push(Some(token));
        self
    }

    /// Append a constructor parameter with no reflected type.
    pub fn with_untyped_parameter(mut self) -> Self {
        self.parameter_types.push(None);
        self
    }

    /// Declare an explicit injection token for parameter `index`.
    pub fn with_declared(mut self, index: usize, token: Token) -> Self {
        self.declared.push(DeclaredDependency { index, token });
        self
    }

    pub fn with_guard(mut self, guard: EnhancerRef) -> Self {
        self.chain.guards.push(guard);
        self
    }

    pub fn with_chain(mut self, chain: ChainMetadata) -> Self {
        self.chain = chain;
        self
    }

    fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticMetadataReader {
    classes: FxHashMap<String, ClassDescriptor>,
}

impl StaticMetadataReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any previous descriptor under that name.
    pub fn register(&mut self, class: impl Into<String>, descriptor: ClassDescriptor) {
        self.classes.insert(class.into(), descriptor);
    }

    pub fn with_class(mut self, class: impl Into<String>, descriptor: ClassDescriptor) -> Self {
        self.register(class, descriptor);
        self
    }

    pub fn descriptor(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataReader for StaticMetadataReader {
    fn class_metadata(&self, class: &ClassRef) -> ClassMetadata {
        let Some(descriptor) = self.classes.get(class.name()) else {
            return ClassMetadata::default();
        };

        ClassMetadata {
            is_controller: descriptor.is_controller,
            path: descriptor.path.clone(),
            methods: descriptor.methods.iter().map(|m| m.name.clone()).collect(),
            chain: descriptor.chain.clone(),
        }
    }

    fn method_metadata(&self, class: &ClassRef, method: &str) -> MethodMetadata {
        self.classes
            .get(class.name())
            .and_then(|descriptor| descriptor.method(method))
            .map(|method| MethodMetadata {
                path: method.path.clone(),
                method: method.method,
                chain: method.chain.clone(),
            })
            .unwrap_or_default()
    }

    fn declared_dependencies(&self, class: &ClassRef) -> Vec<DeclaredDependency> {
        self.classes
            .get(class.name())
            .map(|descriptor| descriptor.declared.clone())
            .unwrap_or_default()
    }

    fn parameter_types(&self, class: &ClassRef) -> Vec<Option<Token>> {
        self.classes
            .get(class.name())
            .map(|descriptor| descriptor.parameter_types.clone())
            .unwrap_or_default()
    }
}
