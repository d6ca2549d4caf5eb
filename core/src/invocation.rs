//! # INVOCABLES AND PARAMETER DESCRIPTORS
//!
//! Rust has no runtime signature reflection, so every callable target
//! (factory closure or type constructor) is registered together with an
//! explicit `ParameterDescriptor` list. Autowiring and `Container::call`
//! consume only these descriptors.

use crate::errors::{error_codes, ContainerError};
use crate::types::{Arguments, ParamKey, Value};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// **DECLARED PARAMETER TYPE**
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Untyped,
    /// Primitive or builtin type (`string`, `int`, `bool`, ...)
    Builtin(String),
    /// Class or interface name, usable as an identifier
    Class(String),
    Union(Vec<ParamType>),
    Intersection(Vec<ParamType>),
}

impl ParamType {
    pub fn builtin(name: impl Into<String>) -> Self {
        ParamType::Builtin(name.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        ParamType::Class(name.into())
    }

    /// Union or intersection of several types.
    pub fn is_compound(&self) -> bool {
        matches!(self, ParamType::Union(_) | ParamType::Intersection(_))
    }

    /// Class-like member types, in declaration order.
    pub fn class_names(&self) -> Vec<&str> {
        match self {
            ParamType::Class(name) => vec![name.as_str()],
            ParamType::Union(members) | ParamType::Intersection(members) => {
                members.iter().flat_map(ParamType::class_names).collect()
            }
            ParamType::Untyped | ParamType::Builtin(_) => Vec::new(),
        }
    }
}

/// **PARAMETER DESCRIPTOR**
///
/// **PURPOSE**: One entry of a target's expected parameter list.
/// `default` of `None` together with `has_default` means a null default.
#[derive(Clone)]
pub struct ParameterDescriptor {
    name: String,
    position: usize,
    ty: ParamType,
    has_default: bool,
    default: Option<Value>,
}

impl ParameterDescriptor {
    /// Untyped, required parameter. The position is assigned by `Invocable::new`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            ty: ParamType::Untyped,
            has_default: false,
            default: None,
        }
    }

    pub fn typed(mut self, ty: ParamType) -> Self {
        self.ty = ty;
        self
    }

    pub fn class(self, name: impl Into<String>) -> Self {
        self.typed(ParamType::class(name))
    }

    pub fn builtin(self, name: impl Into<String>) -> Self {
        self.typed(ParamType::builtin(name))
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.has_default = true;
        self.default = Some(default);
        self
    }

    pub fn with_null_default(mut self) -> Self {
        self.has_default = true;
        self.default = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("ty", &self.ty)
            .field("has_default", &self.has_default)
            .finish()
    }
}

/// **BOUND ARGUMENTS**
///
/// Positional values handed to an invocable body. `None` slots are nulls.
#[derive(Clone, Default)]
pub struct Args {
    values: Vec<Option<Value>>,
}

impl Args {
    pub fn from_values(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`, `None` when null or absent.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.value(index).is_none()
    }

    /// Typed, non-null argument.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ContainerError> {
        self.opt::<T>(index)?.ok_or_else(|| {
            ContainerError::configuration(
                error_codes::ARGUMENT_TYPE_MISMATCH,
                format!("Argument {} is null, expected {}", index, type_name::<T>()),
            )
        })
    }

    /// Typed argument that may be null.
    pub fn opt<T: Any + Send + Sync>(&self, index: usize) -> Result<Option<Arc<T>>, ContainerError> {
        match self.value(index) {
            None => Ok(None),
            Some(v) => Arc::clone(v).downcast::<T>().map(Some).map_err(|_| {
                ContainerError::configuration(
                    error_codes::ARGUMENT_TYPE_MISMATCH,
                    format!("Argument {} is not a {}", index, type_name::<T>()),
                )
            }),
        }
    }
}

pub type InvocableFn = dyn Fn(&Args) -> Result<Value, ContainerError> + Send + Sync;

/// **INVOCABLE**
///
/// **PURPOSE**: A callable body plus the descriptor list it expects.
/// **GUARANTEE**: Cheap to clone, body and descriptors are shared.
#[derive(Clone)]
pub struct Invocable {
    params: Arc<[ParameterDescriptor]>,
    body: Arc<InvocableFn>,
}

impl Invocable {
    /// Descriptor positions are assigned from their order in `params`.
    pub fn new<F>(params: Vec<ParameterDescriptor>, body: F) -> Self
    where
        F: Fn(&Args) -> Result<Value, ContainerError> + Send + Sync + 'static,
    {
        let params: Vec<ParameterDescriptor> = params
            .into_iter()
            .enumerate()
            .map(|(position, mut param)| {
                param.position = position;
                param
            })
            .collect();
        Self {
            params: params.into(),
            body: Arc::new(body),
        }
    }

    /// Parameterless invocable.
    pub fn from_fn<F>(body: F) -> Self
    where
        F: Fn() -> Result<Value, ContainerError> + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| body())
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    pub fn invoke(&self, args: Args) -> Result<Value, ContainerError> {
        (self.body)(&args)
    }

    /// **ARGUMENT BINDING**
    ///
    /// For each descriptor: named argument, else positional argument, else
    /// default, else failure. Extra positional arguments are ignored.
    pub fn bind(&self, args: &Arguments) -> Result<Args, ContainerError> {
        for key in args.keys() {
            if let ParamKey::Name(name) = key {
                if !self.params.iter().any(|p| &p.name == name) {
                    return Err(ContainerError::configuration(
                        error_codes::UNKNOWN_ARGUMENT,
                        format!("Unknown named parameter \"{}\"", name),
                    ));
                }
            }
        }

        let mut values = Vec::with_capacity(self.params.len());
        for param in self.params.iter() {
            let supplied = args
                .get(&ParamKey::Name(param.name.clone()))
                .or_else(|| args.get(&ParamKey::Position(param.position)));
            match supplied {
                Some(v) => values.push(Some(Arc::clone(v))),
                None if param.has_default => values.push(param.default.clone()),
                None => {
                    return Err(ContainerError::configuration(
                        error_codes::MISSING_ARGUMENT,
                        format!(
                            "Missing required parameter {} \"{}\"",
                            param.position, param.name
                        ),
                    ))
                }
            }
        }
        Ok(Args::from_values(values))
    }

    pub fn call_with(&self, args: &Arguments) -> Result<Value, ContainerError> {
        let bound = self.bind(args)?;
        self.invoke(bound)
    }
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocable")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
