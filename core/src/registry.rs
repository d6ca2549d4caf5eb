//! # TYPE REGISTRY
//!
//! Startup-time table of constructible types and their supertypes. Stands in
//! for runtime class reflection: existence checks, subtype checks and
//! constructors for autowiring all come from here.

use crate::container::Container;
use crate::invocation::Invocable;
use crate::matching::normalize_id;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

/// **REGISTERED TYPE**
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
    parents: Vec<String>,
    constructor: Option<Invocable>,
}

impl TypeInfo {
    pub fn class(name: impl Into<String>, constructor: Invocable) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            parents: Vec::new(),
            constructor: Some(constructor),
        }
    }

    /// A class that exists but cannot be built by the container.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            parents: Vec::new(),
            constructor: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            parents: Vec::new(),
            constructor: None,
        }
    }

    /// Declare a parent class or implemented interface.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn constructor(&self) -> Option<&Invocable> {
        self.constructor.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeInfo>,
}

impl TypeRegistry {
    /// The container's own type is always registered.
    pub fn new() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        registry.register(TypeInfo::opaque(Container::TYPE_NAME));
        registry
    }

    /// Later registrations under the same name replace earlier ones.
    pub fn register(&mut self, info: TypeInfo) -> &mut Self {
        self.types.insert(normalize_id(&info.name), info);
        self
    }

    pub fn with(mut self, info: TypeInfo) -> Self {
        self.register(info);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(&normalize_id(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.get(name).map_or(false, |t| t.kind == TypeKind::Class)
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.get(name).map_or(false, |t| t.kind == TypeKind::Interface)
    }

    /// True if `name` extends or implements `ancestor`, directly or
    /// transitively. A type is not its own subtype.
    pub fn is_subtype_of(&self, name: &str, ancestor: &str) -> bool {
        let target = normalize_id(ancestor);
        let mut seen = HashSet::new();
        let mut pending: Vec<String> = match self.get(name) {
            Some(info) => info.parents.iter().map(|p| normalize_id(p)).collect(),
            None => return false,
        };

        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(info) = self.types.get(&current) {
                pending.extend(info.parents.iter().map(|p| normalize_id(p)));
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
