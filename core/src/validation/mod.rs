//! # VALIDATION MODULE
//!
//! **BUILD-TIME CHECKS OVER DECLARED DEFINITIONS**
//!
//! Validators run once, before any resolver or container exists. Nothing
//! here runs during steady-state `get`/`call`.
//!
//! ## USAGE
//!
//! ```rust
//! use wirebox::definitions::{Definition, DefinitionMap};
//! use wirebox::validation::{CycleValidator, Validator};
//!
//! let mut definitions = DefinitionMap::new();
//! definitions.insert("a".into(), Definition::new().with_reference("b"));
//! definitions.insert("b".into(), Definition::new().with_reference("a"));
//! assert!(CycleValidator::new().validate(definitions).is_err());
//! ```

use crate::errors::ContainerError;

pub mod cycles;

pub use cycles::CycleValidator;

/// **CORE VALIDATOR TRAIT**
///
/// **GUARANTEE**: MUST NOT panic. Every failure is a `ContainerError`.
pub trait Validator {
    /// **INPUT TYPE** - Data accepted by this validator
    type Input;

    /// **OUTPUT TYPE** - Validated data returned on success
    type Output;

    fn validate(&self, input: Self::Input) -> ValidationResult<Self::Output>;
}

pub type ValidationResult<T> = Result<T, ContainerError>;
