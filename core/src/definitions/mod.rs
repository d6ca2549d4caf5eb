pub mod types;

pub use types::{Definition, DefinitionMap, Factory, PostCall, ResolvedFactory, Substitute};
