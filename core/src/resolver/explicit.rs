use super::{resolve_param, upgrade, ParameterInjector};
use crate::container::ContainerRef;
use crate::definitions::{Definition, Factory};
use crate::errors::ContainerError;
use crate::invocation::Invocable;
use crate::types::Arguments;
use std::sync::Arc;

/// **EXPLICIT INJECTION**
///
/// Forwards `with_params` verbatim. Identifier params are resolved on every
/// call; missing required parameters fail only when the thunk runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitInjector;

impl ParameterInjector for ExplicitInjector {
    fn inject(
        &self,
        target: Invocable,
        definition: &Definition,
        container: &ContainerRef,
    ) -> Result<Factory, ContainerError> {
        if definition.with_params.is_empty() {
            return Ok(Arc::new(move || target.call_with(&Arguments::new())));
        }

        let params = definition.with_params.clone();
        let handle = Arc::downgrade(container);
        Ok(Arc::new(move || {
            let container = upgrade(&handle)?;
            let mut args = Arguments::with_capacity(params.len());
            for (key, param) in &params {
                args.insert(key.clone(), resolve_param(param, container.as_ref())?);
            }
            target.call_with(&args)
        }))
    }
}
