//! Named converter lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::converter::{BuiltinConverter, TargetType, TypeConverter};

/// Built-in type names and the targets they resolve to.
const BUILTINS: &[(&str, TargetType)] = &[
    ("string", TargetType::String),
    ("int", TargetType::Integer),
    ("long", TargetType::Integer),
    ("double", TargetType::Float),
    ("bool", TargetType::Boolean),
    ("file", TargetType::File),
    ("directory", TargetType::Directory),
];

/// Registry mapping type constraint names to converters.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    converters: HashMap<String, Arc<dyn TypeConverter>>,
}

impl TypeRegistry {
    /// An empty registry. Every typed pattern will fail to resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in scalar and path types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, target) in BUILTINS {
            registry.register(*name, BuiltinConverter::new(target.clone()));
        }
        registry
    }

    /// Returns true if `name` is one of the built-in type names.
    pub fn is_builtin(name: &str) -> bool {
        BUILTINS.iter().any(|(builtin, _)| builtin.eq_ignore_ascii_case(name))
    }

    /// Register a converter, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl AsRef<str>, converter: impl TypeConverter + 'static) {
        self.register_shared(name, Arc::new(converter));
    }

    /// Register an already type-erased converter.
    pub fn register_shared(&mut self, name: impl AsRef<str>, converter: Arc<dyn TypeConverter>) {
        self.converters
            .insert(name.as_ref().to_ascii_lowercase(), converter);
    }

    /// Look up the converter for a type constraint.
    pub fn converter_for(&self, type_constraint: &str) -> Option<&dyn TypeConverter> {
        self.converters
            .get(&type_constraint.to_ascii_lowercase())
            .map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}
