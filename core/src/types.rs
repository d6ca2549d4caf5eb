//! # WIREBOX VALUE TYPES
//!
//! **CRITICAL**: Type-erased values and parameter maps shared by every module
//! **MANDATE**: ALL produced entries travel through the container as `Value`

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// **PRODUCED VALUE**
///
/// Reference-counted and type-erased. Shared entries hand out clones of the
/// same `Arc`, so identity can be checked with `Arc::ptr_eq`.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Wrap a concrete value.
pub fn value<T: Any + Send + Sync>(inner: T) -> Value {
    Arc::new(inner)
}

/// **PARAMETER KEY** - name or zero-based position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Name(String),
    Position(usize),
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Name(name)
    }
}

impl From<usize> for ParamKey {
    fn from(position: usize) -> Self {
        ParamKey::Position(position)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Name(name) => write!(f, "\"{}\"", name),
            ParamKey::Position(pos) => write!(f, "#{}", pos),
        }
    }
}

/// **DECLARED PARAMETER VALUE**
///
/// `Id` names another entry. It is resolved through the container when the
/// container knows it, and passed on as a plain `String` otherwise.
#[derive(Clone)]
pub enum Param {
    Value(Value),
    Id(String),
}

impl Param {
    pub fn value<T: Any + Send + Sync>(inner: T) -> Self {
        Param::Value(value(inner))
    }

    pub fn id(id: impl Into<String>) -> Self {
        Param::Id(id.into())
    }

    /// Identifier this parameter refers to, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Param::Id(id) => Some(id),
            Param::Value(_) => None,
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(_) => f.write_str("Value(..)"),
            Param::Id(id) => f.debug_tuple("Id").field(id).finish(),
        }
    }
}

/// Declared parameters, in declaration order.
pub type Params = IndexMap<ParamKey, Param>;

/// Ready-made arguments for `Container::call` and `Invocable::call_with`.
pub type Arguments = IndexMap<ParamKey, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_key_conversions() {
        assert_eq!(ParamKey::from("name"), ParamKey::Name("name".to_string()));
        assert_eq!(ParamKey::from(2usize), ParamKey::Position(2));
        assert_eq!(ParamKey::from(1usize).to_string(), "#1");
    }

    #[test]
    fn test_param_reference() {
        assert_eq!(Param::id("logger").reference(), Some("logger"));
        assert!(Param::value(42u32).reference().is_none());
    }

    #[test]
    fn test_value_downcast() {
        let v = value(String::from("hello"));
        assert_eq!(v.downcast_ref::<String>().map(String::as_str), Some("hello"));
    }
}
