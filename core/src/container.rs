//! # CONTAINER
//!
//! **ARCHITECTURE**: Ordered resolvers + two production caches
//!
//! 1. **INSTANCE CACHE** - identifier to value, shared definitions only
//! 2. **FACTORY CACHE** - identifier to thunk, non-shared definitions after first use
//!
//! Caches sit behind mutexes that are never held while a thunk runs, so a
//! thunk may resolve further entries through the same container. There is
//! no single-flight guard: two threads resolving the same shared entry for
//! the first time may both construct it, and the later insert wins.
//!
//! Both caches are keyed by the identifier exactly as requested. Resolvers
//! normalize before matching, so `get("Logger")` and `get("logger")` reach
//! the same definition but fill separate cache slots: a shared definition
//! yields one instance per spelling.

use crate::definitions::Factory;
use crate::errors::{error_codes, ContainerError};
use crate::invocation::{Args, Invocable};
use crate::resolver::Resolver;
use crate::types::{Arguments, ParamKey, Value};
use log::{debug, trace};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// **CONTAINER CAPABILITY**
///
/// What resolvers, thunks and post-call hooks see of a container. Parent
/// containers only need to provide this.
pub trait ContainerInterface: Send + Sync {
    fn get(&self, id: &str) -> Result<Value, ContainerError>;

    fn has(&self, id: &str) -> bool;

    /// Identifier naming this container's concrete type.
    fn type_name(&self) -> &str;

    /// The container itself as a produced value.
    fn into_value(self: Arc<Self>) -> Value;
}

pub type ContainerRef = Arc<dyn ContainerInterface>;

pub struct Container {
    resolvers: Vec<Arc<dyn Resolver>>,
    instances: Mutex<HashMap<String, Value>>,
    factories: Mutex<HashMap<String, Factory>>,
    parent: OnceCell<ContainerRef>,
    this: Weak<Container>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container").finish_non_exhaustive()
    }
}

impl Container {
    pub const TYPE_NAME: &'static str = "wirebox::Container";

    /// Resolvers are consulted in the given order. An empty list is allowed.
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            resolvers,
            instances: Mutex::new(HashMap::new()),
            factories: Mutex::new(HashMap::new()),
            parent: OnceCell::new(),
            this: this.clone(),
        })
    }

    pub fn get(&self, id: &str) -> Result<Value, ContainerError> {
        let shared = self.instances.lock().get(id).cloned();
        if let Some(instance) = shared {
            trace!("Instance cache hit for '{}'", id);
            return Ok(instance);
        }

        let cached = self.factories.lock().get(id).cloned();
        if let Some(factory) = cached {
            trace!("Factory cache hit for '{}'", id);
            return factory();
        }

        self.resolve(id)
    }

    /// True if any resolver can produce `id`. The parent is not consulted.
    pub fn has(&self, id: &str) -> bool {
        self.resolvers.iter().any(|resolver| resolver.has(id))
    }

    /// **AD-HOC INVOCATION**
    ///
    /// Per parameter: supplied argument by name, then by position; else the
    /// first class-like declared type the container can produce; else the
    /// default of an optional parameter; else failure.
    pub fn call(&self, invocable: &Invocable, args: &Arguments) -> Result<Value, ContainerError> {
        let mut values = Vec::with_capacity(invocable.params().len());

        for param in invocable.params() {
            let supplied = args
                .get(&ParamKey::Name(param.name().to_string()))
                .or_else(|| args.get(&ParamKey::Position(param.position())));
            if let Some(v) = supplied {
                values.push(Some(Arc::clone(v)));
                continue;
            }

            let candidates = param.ty().class_names();
            if candidates.is_empty() && !param.has_default() {
                return Err(ContainerError::configuration(
                    error_codes::UNRESOLVABLE_PARAMETER,
                    format!(
                        "Required parameter '{}' must be manually supplied or typed with a class name.",
                        param.name()
                    ),
                ));
            }

            let mut resolved = None;
            for candidate in candidates {
                match self.get(candidate) {
                    Ok(v) => {
                        resolved = Some(v);
                        break;
                    }
                    Err(e) if e.is_not_found() => {
                        debug!("Candidate '{}' for parameter '{}' not found", candidate, param.name());
                    }
                    Err(e) => return Err(e),
                }
            }

            match resolved {
                Some(v) => values.push(Some(v)),
                None if param.has_default() => values.push(param.default_value().cloned()),
                None => {
                    return Err(ContainerError::configuration(
                        error_codes::UNRESOLVABLE_PARAMETER,
                        format!("Unable to resolve parameter '{}'.", param.name()),
                    ))
                }
            }
        }

        invocable.invoke(Args::from_values(values))
    }

    /// Settable exactly once.
    pub fn set_parent(&self, parent: ContainerRef) -> Result<(), ContainerError> {
        self.parent.set(parent).map_err(|_| {
            ContainerError::configuration(
                error_codes::PARENT_ALREADY_SET,
                "Parent container is already set.",
            )
        })
    }

    pub fn parent(&self) -> Option<&ContainerRef> {
        self.parent.get()
    }

    fn handle(&self) -> Result<ContainerRef, ContainerError> {
        match self.this.upgrade() {
            Some(this) => Ok(this as ContainerRef),
            None => Err(ContainerError::configuration(
                error_codes::CONTAINER_DROPPED,
                "Container is no longer alive",
            )),
        }
    }

    fn resolve(&self, id: &str) -> Result<Value, ContainerError> {
        let resolver = self
            .resolvers
            .iter()
            .find(|resolver| resolver.has(id))
            .ok_or_else(|| {
                ContainerError::not_found(
                    error_codes::NO_ENTRY,
                    format!("No entry was found for '{}'.", id),
                )
            })?;

        let target = match self.parent.get() {
            Some(parent) => Arc::clone(parent),
            None => self.handle()?,
        };

        let resolution = resolver.resolve(id, &target)?;
        let factory = resolution.factory.ok_or_else(|| {
            ContainerError::configuration(
                error_codes::INCOMPLETE_FACTORY,
                format!("Resolver returned no factory for '{}'", id),
            )
        })?;

        if resolution.definition.shared {
            let instance = factory()?;
            debug!("Caching shared instance for '{}'", id);
            self.instances.lock().insert(id.to_string(), Arc::clone(&instance));
            return Ok(instance);
        }

        debug!("Caching factory for '{}'", id);
        self.factories.lock().insert(id.to_string(), Arc::clone(&factory));
        factory()
    }
}

impl ContainerInterface for Container {
    fn get(&self, id: &str) -> Result<Value, ContainerError> {
        Container::get(self, id)
    }

    fn has(&self, id: &str) -> bool {
        Container::has(self, id)
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn into_value(self: Arc<Self>) -> Value {
        self
    }
}
