pub use crate::container::{Container, ContainerInterface, ContainerRef};
pub use crate::definitions::{Definition, DefinitionMap, Factory, PostCall, ResolvedFactory, Substitute};
pub use crate::errors::{error_codes, ContainerError};
pub use crate::factory::{ContainerFactory, DefinitionProvider, FactoryConfig, ResolverKind, StaticDefinitions};
pub use crate::invocation::{Args, Invocable, ParamType, ParameterDescriptor};
pub use crate::matching::{is_pattern, normalize_id, Pattern, WILDCARD};
pub use crate::registry::{TypeInfo, TypeKind, TypeRegistry};
pub use crate::resolver::{
    AutowiringInjector, AutowiringResolver, DefinitionResolver, ExplicitInjector, ExplicitResolver,
    ParameterInjector, Resolver,
};
pub use crate::types::{value, Arguments, Param, ParamKey, Params, Value};
pub use crate::validation::{CycleValidator, Validator};
