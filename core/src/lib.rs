//! # WIREBOX CORE LIBRARY
//!
//! **IDENTIFIER-DRIVEN DEPENDENCY RESOLUTION**
//!
//! **ARCHITECTURE**: Definitions -> build-time validation -> ordered resolvers -> caching container
//! **GUARANTEE**: Cycles in declared references are rejected before anything is constructed
//!
//! ## USAGE
//!
//! ```rust
//! use wirebox::api::*;
//!
//! let mut definitions = DefinitionMap::new();
//! definitions.insert(
//!     "greeting".into(),
//!     Definition::from_fn(|| Ok(value(String::from("hello")))).with_shared(true),
//! );
//!
//! let container = ContainerFactory::new()
//!     .with_definitions(definitions)
//!     .build()?;
//! let greeting = container.get("greeting")?;
//! assert_eq!(greeting.downcast_ref::<String>().map(String::as_str), Some("hello"));
//! # Ok::<(), ContainerError>(())
//! ```

pub mod api;
pub mod container;
pub mod definitions;
pub mod errors;
pub mod factory;
pub mod invocation;
pub mod matching;
pub mod registry;
pub mod resolver;
pub mod types;

// **BUILD-TIME VALIDATION**
pub mod validation;
