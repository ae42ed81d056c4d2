//! Execution of step argument transformations

use super::StepArgumentTransformationBinding;
use crate::types::Value;
use crate::{Error, Result};

/// Executes a selected binding with its assembled argument list
pub trait BindingInvoker: Send + Sync {
    fn invoke(&self, binding: &StepArgumentTransformationBinding, arguments: &[Value]) -> Result<Value>;
}

/// Invoker that calls the binding's handler in place
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectInvoker;

impl BindingInvoker for DirectInvoker {
    fn invoke(&self, binding: &StepArgumentTransformationBinding, arguments: &[Value]) -> Result<Value> {
        log::debug!(
            "Invoking step argument transformation '{}' with {} argument(s)",
            binding.name(),
            arguments.len()
        );
        (binding.handler())(arguments).map_err(|source| Error::Invocation {
            binding: binding.name().to_string(),
            source,
        })
    }
}
