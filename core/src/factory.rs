//! # CONTAINER FACTORY
//!
//! **BUILD SEQUENCE**
//!
//! 1. **COLLECT** - definitions from the configured provider
//! 2. **VALIDATE** - `CycleValidator` over the whole map
//! 3. **COMPOSE** - one resolver per configured kind, in order
//! 4. **RETURN** - a ready `Arc<Container>`
//!
//! A validation failure aborts before any resolver or container exists.

use crate::container::Container;
use crate::definitions::DefinitionMap;
use crate::errors::ContainerError;
use crate::registry::TypeRegistry;
use crate::resolver::{AutowiringResolver, ExplicitResolver, Resolver};
use crate::validation::{CycleValidator, Validator};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source of declared definitions.
pub trait DefinitionProvider: Send + Sync {
    fn definitions(&self) -> DefinitionMap;
}

/// Provider over a fixed map.
#[derive(Debug, Clone, Default)]
pub struct StaticDefinitions {
    definitions: DefinitionMap,
}

impl StaticDefinitions {
    pub fn new(definitions: DefinitionMap) -> Self {
        Self { definitions }
    }
}

impl DefinitionProvider for StaticDefinitions {
    fn definitions(&self) -> DefinitionMap {
        self.definitions.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    Explicit,
    Autowiring,
}

/// **FACTORY CONFIGURATION**
///
/// Missing fields take their defaults, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Resolver chain, consulted in this order.
    pub resolvers: Vec<ResolverKind>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            resolvers: vec![ResolverKind::Autowiring],
        }
    }
}

pub struct ContainerFactory {
    provider: Option<Box<dyn DefinitionProvider>>,
    config: FactoryConfig,
    types: Arc<TypeRegistry>,
}

impl ContainerFactory {
    /// No provider, default configuration, registry holding only the container type.
    pub fn new() -> Self {
        Self {
            provider: None,
            config: FactoryConfig::default(),
            types: Arc::new(TypeRegistry::new()),
        }
    }

    pub fn with_provider(mut self, provider: impl DefinitionProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Shorthand for a `StaticDefinitions` provider.
    pub fn with_definitions(self, definitions: DefinitionMap) -> Self {
        self.with_provider(StaticDefinitions::new(definitions))
    }

    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = Arc::new(types);
        self
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn build(&self) -> Result<Arc<Container>, ContainerError> {
        let collected = self
            .provider
            .as_ref()
            .map(|provider| provider.definitions())
            .unwrap_or_default();
        let definitions = CycleValidator::new().validate(collected)?;

        let resolvers: Vec<Arc<dyn Resolver>> = self
            .config
            .resolvers
            .iter()
            .map(|kind| -> Arc<dyn Resolver> {
                let definitions = definitions.clone();
                let types = Arc::clone(&self.types);
                match kind {
                    ResolverKind::Explicit => Arc::new(ExplicitResolver::new(definitions, types)),
                    ResolverKind::Autowiring => Arc::new(AutowiringResolver::new(definitions, types)),
                }
            })
            .collect();

        debug!(
            "Building container from {} definitions with resolvers {:?}",
            definitions.len(),
            self.config.resolvers
        );
        Ok(Container::new(resolvers))
    }
}

impl Default for ContainerFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::Definition;
    use crate::errors::error_codes;
    use crate::invocation::Invocable;
    use crate::registry::TypeInfo;
    use crate::types::value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn definitions(defs: Vec<(&str, Definition)>) -> DefinitionMap {
        defs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl DefinitionProvider for Counting {
        fn definitions(&self) -> DefinitionMap {
            self.calls.fetch_add(1, Ordering::SeqCst);
            definitions(vec![("answer", Definition::new().with_instance(value(42u32)))])
        }
    }

    #[test]
    fn test_default_config_is_autowiring() {
        let factory = ContainerFactory::new();
        assert_eq!(factory.config().resolvers, vec![ResolverKind::Autowiring]);
    }

    #[test]
    fn test_config_from_json() {
        let config: FactoryConfig =
            serde_json::from_str(r#"{"resolvers": ["explicit", "autowiring"]}"#).unwrap();
        assert_eq!(config.resolvers, vec![ResolverKind::Explicit, ResolverKind::Autowiring]);

        let empty: FactoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, FactoryConfig::default());

        assert!(serde_json::from_str::<FactoryConfig>(r#"{"resolvers": ["magic"]}"#).is_err());
    }

    #[test]
    fn test_config_serializes_snake_case() {
        let json = serde_json::to_string(&FactoryConfig::default()).unwrap();
        assert_eq!(json, r#"{"resolvers":["autowiring"]}"#);
    }

    #[test]
    fn test_build_without_provider() {
        let container = ContainerFactory::new().build().unwrap();
        assert!(!container.has("anything"));
    }

    #[test]
    fn test_build_queries_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let container = ContainerFactory::new()
            .with_provider(Counting { calls: Arc::clone(&calls) })
            .build()
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let answer = container.get("answer").unwrap();
        assert_eq!(answer.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_build_rejects_cycles() {
        let err = ContainerFactory::new()
            .with_definitions(definitions(vec![
                ("a", Definition::new().with_reference("b")),
                ("b", Definition::new().with_reference("a")),
            ]))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), error_codes::CIRCULAR_DEPENDENCY);
    }

    #[test]
    fn test_explicit_only_does_not_autowire() {
        let types = TypeRegistry::new()
            .with(TypeInfo::class("app::Clock", Invocable::from_fn(|| Ok(value(7u8)))));

        let explicit = ContainerFactory::new()
            .with_config(FactoryConfig { resolvers: vec![ResolverKind::Explicit] })
            .with_types(types.clone())
            .build()
            .unwrap();
        assert!(!explicit.has("app::Clock"));

        let autowiring = ContainerFactory::new().with_types(types).build().unwrap();
        assert!(autowiring.has("app::Clock"));
    }

    #[test]
    fn test_empty_resolver_chain() {
        let container = ContainerFactory::new()
            .with_config(FactoryConfig { resolvers: Vec::new() })
            .with_definitions(definitions(vec![("x", Definition::new().with_instance(value(1u8)))]))
            .build()
            .unwrap();
        assert!(container.get("x").unwrap_err().is_not_found());
    }
}
