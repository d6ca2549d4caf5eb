use crate::container::ContainerInterface;
use crate::errors::ContainerError;
use crate::invocation::Invocable;
use crate::types::{Param, ParamKey, Params, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Post-construction hook. A `Some` return replaces the produced value.
pub type PostCall = Arc<
    dyn Fn(Value, &dyn ContainerInterface) -> Result<Option<Value>, ContainerError> + Send + Sync,
>;

/// Zero-argument production thunk.
pub type Factory = Arc<dyn Fn() -> Result<Value, ContainerError> + Send + Sync>;

/// Declared identifiers in registration order.
pub type DefinitionMap = IndexMap<String, Definition>;

/// **PRIMARY PRODUCTION RULE**
#[derive(Clone, Default)]
pub enum Substitute {
    /// Treat the owning identifier itself as a constructible type.
    #[default]
    Absent,
    /// Call this to produce the value.
    Invocable(Invocable),
    /// Hand back this value.
    Existing(Value),
    /// Another identifier, or a constructible type name.
    Reference(String),
}

impl fmt::Debug for Substitute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Substitute::Absent => f.write_str("Absent"),
            Substitute::Invocable(inv) => f.debug_tuple("Invocable").field(inv).finish(),
            Substitute::Existing(_) => f.write_str("Existing(..)"),
            Substitute::Reference(id) => f.debug_tuple("Reference").field(id).finish(),
        }
    }
}

/// **DEFINITION**
///
/// **PURPOSE**: Immutable declaration of how to produce the value for an identifier.
/// **DEFAULTS**: not shared, strict, no substitute, no params, no hook.
#[derive(Clone)]
pub struct Definition {
    pub substitute: Substitute,
    pub with_params: Params,
    pub call: Option<PostCall>,
    pub shared: bool,
    /// When false the definition also matches subtypes of its identifier.
    pub strict: bool,
}

impl Definition {
    pub fn new() -> Self {
        Self {
            substitute: Substitute::Absent,
            with_params: IndexMap::new(),
            call: None,
            shared: false,
            strict: true,
        }
    }

    /// Definition whose substitute is a parameterless closure.
    pub fn from_fn<F>(body: F) -> Self
    where
        F: Fn() -> Result<Value, ContainerError> + Send + Sync + 'static,
    {
        Self::new().with_invocable(Invocable::from_fn(body))
    }

    pub fn with_substitute(mut self, substitute: Substitute) -> Self {
        self.substitute = substitute;
        self
    }

    pub fn with_invocable(self, invocable: Invocable) -> Self {
        self.with_substitute(Substitute::Invocable(invocable))
    }

    pub fn with_instance(self, instance: Value) -> Self {
        self.with_substitute(Substitute::Existing(instance))
    }

    pub fn with_reference(self, id: impl Into<String>) -> Self {
        self.with_substitute(Substitute::Reference(id.into()))
    }

    pub fn with_param(mut self, key: impl Into<ParamKey>, param: Param) -> Self {
        self.with_params.insert(key.into(), param);
        self
    }

    pub fn with_call<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value, &dyn ContainerInterface) -> Result<Option<Value>, ContainerError>
            + Send
            + Sync
            + 'static,
    {
        self.call = Some(Arc::new(hook));
        self
    }

    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn substitute_reference(&self) -> Option<&str> {
        match &self.substitute {
            Substitute::Reference(id) => Some(id),
            _ => None,
        }
    }

    /// Identifiers named by `with_params`, in declaration order.
    pub fn param_references(&self) -> impl Iterator<Item = &str> {
        self.with_params.values().filter_map(Param::reference)
    }
}

impl Default for Definition {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("substitute", &self.substitute)
            .field("with_params", &self.with_params)
            .field("call", &self.call.is_some())
            .field("shared", &self.shared)
            .field("strict", &self.strict)
            .finish()
    }
}

/// **RESOLVED FACTORY**
///
/// Matched definition plus its production thunk. A resolver first produces
/// the match alone and completes it with `with_factory`.
#[derive(Clone)]
pub struct ResolvedFactory {
    /// `None` when no declared definition matched (autowired type).
    pub definition_id: Option<String>,
    pub definition: Arc<Definition>,
    pub factory: Option<Factory>,
}

impl ResolvedFactory {
    pub fn matched(definition_id: Option<String>, definition: Arc<Definition>) -> Self {
        Self {
            definition_id,
            definition,
            factory: None,
        }
    }

    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.factory.is_some()
    }
}

impl fmt::Debug for ResolvedFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFactory")
            .field("definition_id", &self.definition_id)
            .field("definition", &self.definition)
            .field("complete", &self.is_complete())
            .finish()
    }
}
