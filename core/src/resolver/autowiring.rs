use super::{resolve_param, ParameterInjector};
use crate::container::ContainerRef;
use crate::definitions::{Definition, Factory};
use crate::errors::{error_codes, ContainerError};
use crate::invocation::{Args, Invocable, ParamType};
use crate::types::ParamKey;
use log::debug;
use std::sync::Arc;

/// **AUTOWIRING INJECTION**
///
/// Walks the target's descriptors: named override, positional override,
/// then inference from the declared type. The argument list is resolved
/// once, here, and reused by every call of the thunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutowiringInjector;

impl ParameterInjector for AutowiringInjector {
    fn autowires_types(&self) -> bool {
        true
    }

    fn inject(
        &self,
        target: Invocable,
        definition: &Definition,
        container: &ContainerRef,
    ) -> Result<Factory, ContainerError> {
        let mut values = Vec::with_capacity(target.params().len());

        for param in target.params() {
            let name = param.name();
            let pos = param.position();
            let declared = definition
                .with_params
                .get(&ParamKey::Name(name.to_string()))
                .or_else(|| definition.with_params.get(&ParamKey::Position(pos)));

            if let Some(declared) = declared {
                values.push(Some(resolve_param(declared, container.as_ref())?));
                continue;
            }

            if param.ty().is_compound() {
                return Err(ContainerError::configuration(
                    error_codes::AMBIGUOUS_PARAMETER,
                    format!(
                        "Cannot autowire parameter {} \"{}\" with union or intersect type",
                        pos, name
                    ),
                ));
            }

            match param.ty() {
                ParamType::Class(class) => {
                    debug!("Autowiring parameter \"{}\" as '{}'", name, class);
                    values.push(Some(container.get(class)?));
                }
                _ => {
                    if !param.has_default() {
                        return Err(ContainerError::configuration(
                            error_codes::UNRESOLVABLE_PARAMETER,
                            format!(
                                "Cannot autowire parameter {} \"{}\" without class type hint",
                                pos, name
                            ),
                        ));
                    }
                    values.push(param.default_value().cloned());
                }
            }
        }

        let args = Args::from_values(values);
        Ok(Arc::new(move || target.invoke(args.clone())))
    }
}

#[cfg(test)]
mod tests {
    use crate::container::Container;
    use crate::definitions::{Definition, DefinitionMap};
    use crate::errors::error_codes;
    use crate::invocation::{Invocable, ParamType, ParameterDescriptor};
    use crate::registry::{TypeInfo, TypeRegistry};
    use crate::resolver::{AutowiringResolver, Resolver};
    use crate::types::{value, Param, Value};
    use std::sync::Arc;

    struct Clock;

    struct Greeter {
        name: String,
        clock: Arc<Clock>,
    }

    fn types() -> Arc<TypeRegistry> {
        Arc::new(
            TypeRegistry::new()
                .with(TypeInfo::class("app::Clock", Invocable::from_fn(|| Ok(value(Clock)))))
                .with(TypeInfo::class(
                    "app::Greeter",
                    Invocable::new(
                        vec![
                            ParameterDescriptor::new("name")
                                .builtin("string")
                                .with_default(value(String::from("default"))),
                            ParameterDescriptor::new("clock").class("app::Clock"),
                        ],
                        |args| {
                            Ok(value(Greeter {
                                name: args.get::<String>(0)?.as_ref().clone(),
                                clock: args.get::<Clock>(1)?,
                            }))
                        },
                    ),
                ))
                .with(TypeInfo::class(
                    "app::Named",
                    Invocable::new(
                        vec![ParameterDescriptor::new("name").builtin("string")],
                        |args| Ok(Arc::clone(args.value(0).unwrap_or(&value(String::new())))),
                    ),
                )),
        )
    }

    fn container(defs: Vec<(&str, Definition)>) -> Arc<Container> {
        let map: DefinitionMap = defs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        let resolver: Arc<dyn Resolver> = Arc::new(AutowiringResolver::new(map, types()));
        Container::new(vec![resolver])
    }

    fn greeter(v: &Value) -> &Greeter {
        v.downcast_ref::<Greeter>().unwrap()
    }

    #[test]
    fn test_has_registered_classes_without_definitions() {
        let resolver = AutowiringResolver::new(DefinitionMap::new(), types());
        assert!(resolver.has("app::Clock"));
        assert!(!resolver.has("app::NonExistent"));
    }

    #[test]
    fn test_builtin_default_and_class_inference() {
        let c = container(Vec::new());
        let v = c.get("app::Greeter").unwrap();
        assert_eq!(greeter(&v).name, "default");
    }

    #[test]
    fn test_positional_override() {
        let c = container(vec![(
            "app::Greeter",
            Definition::new().with_param(0usize, Param::value(String::from("explicit value"))),
        )]);
        let v = c.get("app::Greeter").unwrap();
        assert_eq!(greeter(&v).name, "explicit value");
    }

    #[test]
    fn test_named_override() {
        let c = container(vec![(
            "app::Greeter",
            Definition::new().with_param("name", Param::value(String::from("named value"))),
        )]);
        let v = c.get("app::Greeter").unwrap();
        assert_eq!(greeter(&v).name, "named value");
    }

    #[test]
    fn test_builtin_without_default_fails() {
        let c = container(vec![("app::Named", Definition::new())]);
        let err = c.get("app::Named").unwrap_err();
        assert_eq!(err.code(), error_codes::UNRESOLVABLE_PARAMETER);
        assert!(err.message().contains("without class type hint"));
    }

    #[test]
    fn test_union_without_override_fails_even_if_member_resolvable() {
        let c = container(vec![(
            "callable",
            Definition::new().with_invocable(Invocable::new(
                vec![ParameterDescriptor::new("param").typed(ParamType::Union(vec![
                    ParamType::class("app::Clock"),
                    ParamType::builtin("array"),
                ]))],
                |_| Ok(value(())),
            )),
        )]);
        let err = c.get("callable").unwrap_err();
        assert_eq!(err.code(), error_codes::AMBIGUOUS_PARAMETER);
        assert!(err.message().contains("union or intersect type"));
    }

    #[test]
    fn test_intersection_without_override_fails() {
        let c = container(vec![(
            "callable",
            Definition::new().with_invocable(Invocable::new(
                vec![ParameterDescriptor::new("param")
                    .typed(ParamType::Intersection(vec![ParamType::class("app::Clock")]))],
                |_| Ok(value(())),
            )),
        )]);
        let err = c.get("callable").unwrap_err();
        assert_eq!(err.code(), error_codes::AMBIGUOUS_PARAMETER);
    }

    #[test]
    fn test_compound_param_accepts_named_override() {
        let c = container(vec![(
            "callable",
            Definition::new()
                .with_invocable(Invocable::new(
                    vec![ParameterDescriptor::new("param").typed(ParamType::Intersection(vec![
                        ParamType::class("app::Clock"),
                        ParamType::class("app::Greeter"),
                    ]))],
                    |args| Ok(Arc::clone(args.value(0).unwrap_or(&value(String::new())))),
                ))
                .with_param("param", Param::value(String::from("given"))),
        )]);
        let v = c.get("callable").unwrap();
        assert_eq!(v.downcast_ref::<String>().map(String::as_str), Some("given"));
    }

    #[test]
    fn test_argument_list_fixed_once() {
        let c = container(Vec::new());
        let a = c.get("app::Greeter").unwrap();
        let b = c.get("app::Greeter").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&greeter(&a).clock, &greeter(&b).clock));
    }

    #[test]
    fn test_autowired_closure() {
        let c = container(vec![(
            "closure",
            Definition::new().with_invocable(Invocable::new(
                vec![ParameterDescriptor::new("clock").class("app::Clock")],
                |args| Ok(args.get::<Clock>(0)? as Value),
            )),
        )]);
        assert!(c.get("closure").unwrap().downcast_ref::<Clock>().is_some());
    }

    #[test]
    fn test_unknown_class_parameter_is_not_found() {
        let c = container(vec![(
            "needs-missing",
            Definition::new().with_invocable(Invocable::new(
                vec![ParameterDescriptor::new("missing").class("app::Missing")],
                |_| Ok(value(())),
            )),
        )]);
        assert!(c.get("needs-missing").unwrap_err().is_not_found());
    }
}
