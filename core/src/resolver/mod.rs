//! # RESOLVERS
//!
//! **ARCHITECTURE**: One matching + factory-construction algorithm
//! (`DefinitionResolver`), two interchangeable parameter injectors.
//!
//! ## MATCH PRECEDENCE
//!
//! 1. **EXACT** - normalized identifier
//! 2. **SUBTYPE / PATTERN** - declared definitions in registration order, wildcard skipped
//! 3. **WILDCARD** - existing type, or any identifier when the wildcard has a substitute
//!
//! ## FACTORY PIPELINE
//!
//! substitute (invocable / existing / reference / absent) -> parameter
//! injection -> post-call hook
//!
//! A reference back to the requested identifier itself fails with
//! `DI_CONFIG_CIRCULAR_DEPENDENCY`. Longer runtime chains are not detected:
//! a wildcard or pattern redirect that loops through other identifiers, or
//! autowired classes that need each other, recurse until the stack overflows.

pub mod autowiring;
pub mod explicit;

pub use autowiring::AutowiringInjector;
pub use explicit::ExplicitInjector;

use crate::container::{ContainerInterface, ContainerRef};
use crate::definitions::{Definition, DefinitionMap, Factory, ResolvedFactory, Substitute};
use crate::errors::{error_codes, ContainerError};
use crate::invocation::Invocable;
use crate::matching::{normalize_id, Pattern, WILDCARD};
use crate::registry::TypeRegistry;
use crate::types::{value, Param, Value};
use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// **RESOLVER CAPABILITY**
///
/// Pluggable matching strategy composed into a `Container`.
pub trait Resolver: Send + Sync {
    fn has(&self, id: &str) -> bool;

    /// Fails `NotFound` when nothing matches `id`.
    fn resolve(&self, id: &str, container: &ContainerRef) -> Result<ResolvedFactory, ContainerError>;
}

/// **PARAMETER INJECTION STRATEGY**
pub trait ParameterInjector: Send + Sync {
    /// Whether the resolver also answers for every registered class.
    fn autowires_types(&self) -> bool {
        false
    }

    /// Wrap `target` into a thunk that supplies its parameters.
    fn inject(
        &self,
        target: Invocable,
        definition: &Definition,
        container: &ContainerRef,
    ) -> Result<Factory, ContainerError>;
}

pub type ExplicitResolver = DefinitionResolver<ExplicitInjector>;
pub type AutowiringResolver = DefinitionResolver<AutowiringInjector>;

struct Entry {
    definition: Arc<Definition>,
    pattern: Option<Pattern>,
}

pub struct DefinitionResolver<I> {
    entries: IndexMap<String, Entry>,
    types: Arc<TypeRegistry>,
    injector: I,
    lookup: RwLock<HashMap<String, ResolvedFactory>>,
}

impl<I: ParameterInjector + Default> DefinitionResolver<I> {
    pub fn new(definitions: DefinitionMap, types: Arc<TypeRegistry>) -> Self {
        Self::with_injector(definitions, types, I::default())
    }
}

impl<I: ParameterInjector> DefinitionResolver<I> {
    /// Identifiers are normalized and patterns compiled here, once.
    pub fn with_injector(definitions: DefinitionMap, types: Arc<TypeRegistry>, injector: I) -> Self {
        let entries = definitions
            .into_iter()
            .map(|(id, definition)| {
                let normal = normalize_id(&id);
                let entry = Entry {
                    pattern: Pattern::parse(&normal),
                    definition: Arc::new(definition),
                };
                (normal, entry)
            })
            .collect();

        Self {
            entries,
            types,
            injector,
            lookup: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matching definition for `id`, without a factory.
    pub fn find(&self, id: &str) -> Option<ResolvedFactory> {
        let normal = normalize_id(id);
        if let Some(entry) = self.entries.get(&normal) {
            return Some(ResolvedFactory::matched(Some(normal), Arc::clone(&entry.definition)));
        }

        for (def_id, entry) in &self.entries {
            if def_id == WILDCARD {
                continue;
            }
            let subtype = !entry.definition.strict && self.types.is_subtype_of(id, def_id);
            let pattern = entry.pattern.as_ref().map_or(false, |p| p.is_match(id));
            if subtype || pattern {
                debug!("'{}' matched definition '{}'", id, def_id);
                return Some(ResolvedFactory::matched(
                    Some(def_id.clone()),
                    Arc::clone(&entry.definition),
                ));
            }
        }

        let wildcard = self.entries.get(WILDCARD)?;
        let has_substitute = !matches!(wildcard.definition.substitute, Substitute::Absent);
        if self.types.exists(id) || has_substitute {
            debug!("'{}' fell through to the wildcard definition", id);
            return Some(ResolvedFactory::matched(
                Some(WILDCARD.to_string()),
                Arc::clone(&wildcard.definition),
            ));
        }
        None
    }

    fn make_factory(
        &self,
        id: &str,
        definition: &Definition,
        container: &ContainerRef,
    ) -> Result<Factory, ContainerError> {
        let working = match &definition.substitute {
            Substitute::Invocable(invocable) => {
                let base = self.injector.inject(invocable.clone(), definition, container)?;
                return Ok(with_post_call(base, definition, container));
            }
            Substitute::Existing(existing) => {
                let existing = Arc::clone(existing);
                let base: Factory = Arc::new(move || Ok(Arc::clone(&existing)));
                return Ok(with_post_call(base, definition, container));
            }
            // Wildcard and pattern matches escape the build-time cycle check.
            Substitute::Reference(target) if normalize_id(target) == normalize_id(id) => {
                return Err(ContainerError::configuration(
                    error_codes::CIRCULAR_DEPENDENCY,
                    format!("Circular substitution dependency detected: {} -> {}", id, target),
                ));
            }
            Substitute::Reference(target) if container.has(target) => {
                let handle = Arc::downgrade(container);
                let target = target.clone();
                let base: Factory = Arc::new(move || upgrade(&handle)?.get(&target));
                return Ok(with_post_call(base, definition, container));
            }
            Substitute::Reference(target) => {
                if !self.types.is_class(target) {
                    return Err(ContainerError::not_found(
                        error_codes::SUBSTITUTE_NOT_FOUND,
                        format!("Substitute '{}' not found for definition '{}'", target, id),
                    ));
                }
                target.as_str()
            }
            Substitute::Absent => id,
        };

        // A shared request for the container's own type yields the live container.
        if definition.shared && normalize_id(working) == normalize_id(container.type_name()) {
            let handle = Arc::downgrade(container);
            let base: Factory = Arc::new(move || Ok(upgrade(&handle)?.into_value()));
            return Ok(with_post_call(base, definition, container));
        }

        let info = self.types.get(working).ok_or_else(|| {
            ContainerError::not_found(
                error_codes::UNKNOWN_TYPE,
                format!("No constructible type named '{}'", working),
            )
        })?;
        let constructor = info.constructor().ok_or_else(|| {
            ContainerError::configuration(
                error_codes::NOT_INSTANTIABLE,
                format!("Type '{}' cannot be instantiated", info.name()),
            )
        })?;

        let base = self.injector.inject(constructor.clone(), definition, container)?;
        Ok(with_post_call(base, definition, container))
    }
}

impl<I: ParameterInjector> Resolver for DefinitionResolver<I> {
    fn has(&self, id: &str) -> bool {
        if self.lookup.read().contains_key(id) {
            return true;
        }
        if let Some(found) = self.find(id) {
            self.lookup.write().insert(id.to_string(), found);
            return true;
        }
        self.injector.autowires_types() && self.types.is_class(id)
    }

    fn resolve(&self, id: &str, container: &ContainerRef) -> Result<ResolvedFactory, ContainerError> {
        if !self.has(id) {
            return Err(ContainerError::not_found(
                error_codes::NO_DEFINITION,
                format!("No definition found for identifier: {}", id),
            ));
        }

        let matched = self
            .lookup
            .read()
            .get(id)
            .cloned()
            .unwrap_or_else(|| ResolvedFactory::matched(None, Arc::new(Definition::new())));

        let factory = self.make_factory(id, &matched.definition, container)?;
        Ok(matched.with_factory(factory))
    }
}

/// Wrap `base` so the definition's post-call hook sees every product.
fn with_post_call(base: Factory, definition: &Definition, container: &ContainerRef) -> Factory {
    let Some(hook) = definition.call.clone() else {
        return base;
    };
    let handle = Arc::downgrade(container);
    Arc::new(move || {
        let produced = base()?;
        let container = upgrade(&handle)?;
        let replaced = hook(Arc::clone(&produced), container.as_ref())?;
        Ok(replaced.unwrap_or(produced))
    })
}

pub(crate) fn upgrade(handle: &Weak<dyn ContainerInterface>) -> Result<ContainerRef, ContainerError> {
    handle.upgrade().ok_or_else(|| {
        ContainerError::configuration(
            error_codes::CONTAINER_DROPPED,
            "Container was dropped before the factory ran",
        )
    })
}

/// Identifier params resolve through the container when it knows them;
/// otherwise the identifier string itself is the argument.
pub(crate) fn resolve_param(param: &Param, container: &dyn ContainerInterface) -> Result<Value, ContainerError> {
    match param {
        Param::Value(v) => Ok(Arc::clone(v)),
        Param::Id(id) if container.has(id) => container.get(id),
        Param::Id(id) => Ok(value(id.clone())),
    }
}
